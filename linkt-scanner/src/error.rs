use linkt_core::TreeError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("HTTP request failed for {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP client error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Sitemap error: {0}")]
    Tree(#[from] TreeError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Screenshot of {url} failed: {message}")]
    Capture { url: String, message: String },
}

pub type Result<T> = std::result::Result<T, ScanError>;
