pub mod capture;
pub mod error;
pub mod handler;
pub mod spider;

pub use capture::Capture;
#[cfg(feature = "browser")]
pub use capture::ChromeCapture;
pub use error::ScanError;
pub use handler::{CrawlMode, LinkTestHandler, LinkTestScope, PageHandler, ScreenshotHandler, SitemapHandler};
pub use spider::{CrawlOptions, ProgressCallback, Spider};
