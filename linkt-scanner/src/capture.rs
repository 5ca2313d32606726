//! Render-and-capture service used by the screenshot mode.
//!
//! The spider only needs "give me JPEG bytes for this URL". The real
//! implementation drives headless Chromium over CDP and is compiled with the
//! `browser` feature.

use crate::error::Result;
use async_trait::async_trait;
use url::Url;

#[async_trait]
pub trait Capture: Send + Sync {
    /// Renders `url` and returns the encoded image.
    async fn capture(&self, url: &Url) -> Result<Vec<u8>>;
}

#[cfg(feature = "browser")]
pub use chrome::ChromeCapture;

#[cfg(feature = "browser")]
mod chrome {
    use super::Capture;
    use crate::error::{Result, ScanError};
    use async_trait::async_trait;
    use chromiumoxide::cdp::browser_protocol::page::CaptureScreenshotFormat;
    use chromiumoxide::page::ScreenshotParams;
    use chromiumoxide::{Browser, BrowserConfig};
    use futures::StreamExt;
    use tokio::task::JoinHandle;
    use tracing::{debug, warn};
    use url::Url;

    const JPEG_QUALITY: i64 = 90;

    /// Full-page JPEG screenshots from a headless Chromium instance.
    pub struct ChromeCapture {
        browser: Browser,
        handler: JoinHandle<()>,
    }

    impl ChromeCapture {
        pub async fn launch() -> Result<Self> {
            let config = BrowserConfig::builder().build().map_err(|message| ScanError::Capture {
                url: String::new(),
                message,
            })?;
            let (browser, mut handler) = Browser::launch(config).await.map_err(|e| ScanError::Capture {
                url: String::new(),
                message: format!("failed to launch browser: {}", e),
            })?;

            // CDP events must be drained for the browser to make progress
            let handler = tokio::spawn(async move {
                while let Some(event) = handler.next().await {
                    if let Err(e) = event {
                        warn!("browser handler error: {}", e);
                        break;
                    }
                }
            });

            Ok(Self { browser, handler })
        }

        pub async fn shutdown(mut self) {
            if let Err(e) = self.browser.close().await {
                warn!("failed to close browser: {}", e);
            }
            self.handler.abort();
        }
    }

    #[async_trait]
    impl Capture for ChromeCapture {
        async fn capture(&self, url: &Url) -> Result<Vec<u8>> {
            let err = |e: chromiumoxide::error::CdpError| ScanError::Capture {
                url: url.to_string(),
                message: e.to_string(),
            };
            debug!(url = %url, "capturing screenshot");
            let page = self.browser.new_page(url.as_str()).await.map_err(err)?;
            page.wait_for_navigation().await.map_err(err)?;
            let bytes = page
                .screenshot(
                    ScreenshotParams::builder()
                        .format(CaptureScreenshotFormat::Jpeg)
                        .quality(JPEG_QUALITY)
                        .full_page(true)
                        .build(),
                )
                .await
                .map_err(err)?;
            if let Err(e) = page.close().await {
                warn!(url = %url, "failed to close tab: {}", e);
            }
            Ok(bytes)
        }
    }
}
