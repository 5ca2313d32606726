// Console animation shown while the spider works

use indicatif::{ProgressBar, ProgressStyle};
use linkt_scanner::ProgressCallback;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use url::Url;

/// Spinner ticked from a background task until [`Progress::finish`] sends
/// the completion signal.
pub struct Progress {
    bar: ProgressBar,
    done: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

impl Progress {
    pub fn start(message: &str) -> Self {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::default_spinner()
                .template("{prefix:.yellow.bold} {msg} {spinner:.yellow}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(&[".  ", ".. ", "...", " ..", "  .", "   "]),
        );
        bar.set_prefix("[PENDING]");
        bar.set_message(message.to_string());

        let (done, mut rx) = oneshot::channel::<()>();
        let ticker = bar.clone();
        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_millis(250));
            loop {
                tokio::select! {
                    _ = &mut rx => break,
                    _ = interval.tick() => ticker.tick(),
                }
            }
        });

        Self { bar, done, task }
    }

    /// Callback for the spider that shows the path being fetched.
    pub fn callback(&self, message: &str) -> ProgressCallback {
        let bar = self.bar.clone();
        let message = message.to_string();
        Arc::new(move |url: String| {
            bar.set_message(format!("{} {}", message, extract_url_path(&url)));
        })
    }

    pub async fn finish(self) {
        let _ = self.done.send(());
        let _ = self.task.await;
        self.bar.finish_and_clear();
    }
}

/// Extract the path component from a URL
pub fn extract_url_path(url: &str) -> String {
    Url::parse(url)
        .ok()
        .map(|u| {
            let path = u.path().to_string();
            if path.is_empty() || path == "/" {
                "/".to_string()
            } else {
                path
            }
        })
        .unwrap_or_else(|| url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_url_path() {
        assert_eq!(extract_url_path("https://example.com/api/users"), "/api/users");
        assert_eq!(extract_url_path("https://example.com/"), "/");
        assert_eq!(extract_url_path("https://example.com"), "/");
        assert_eq!(extract_url_path("https://example.com/api?key=value#top"), "/api");
        assert_eq!(extract_url_path("not a url"), "not a url");
    }

    #[tokio::test]
    async fn test_finish_stops_ticker() {
        let progress = Progress::start("collecting links");
        let callback = progress.callback("collecting links");
        callback("https://example.com/about".to_string());
        progress.finish().await;
    }
}
