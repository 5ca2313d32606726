use crate::link_set::{LinkKind, LinkSet};
use std::time::Duration;
use url::Url;

/// The request used to fetch a page. Pages are always fetched with GET.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub method: &'static str,
    pub url: Url,
}

/// What came back when a page was fetched. The body is not kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageResponse {
    pub status_code: u16,
    pub reason: Option<String>,
    pub content_type: Option<String>,
}

impl PageResponse {
    pub fn new(status_code: u16, reason: Option<String>, content_type: Option<String>) -> Self {
        Self {
            status_code,
            reason,
            content_type,
        }
    }

    /// Status code followed by its reason phrase, e.g. `404 Not Found`.
    pub fn status_line(&self) -> String {
        match self.reason.as_deref() {
            Some(reason) if !reason.is_empty() => format!("{} {}", self.status_code, reason),
            _ => self.status_code.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Page {
    pub request: PageRequest,
    pub response: Option<PageResponse>,
    pub links: LinkSet,
    kind: LinkKind,
    pub request_time: Option<Duration>,
    pub parent_url: String,
}

impl Page {
    pub fn new(url: Url) -> Self {
        Self {
            request: PageRequest { method: "GET", url },
            response: None,
            links: LinkSet::new(),
            kind: LinkKind::Unknown,
            request_time: None,
            parent_url: String::new(),
        }
    }

    pub fn with_kind(mut self, kind: LinkKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_parent_url(mut self, parent_url: impl Into<String>) -> Self {
        self.parent_url = parent_url.into();
        self
    }

    pub fn kind(&self) -> LinkKind {
        self.kind
    }

    pub fn set_kind(&mut self, kind: LinkKind) {
        self.kind = kind;
    }

    /// Canonical identity of the page.
    pub fn url(&self) -> &str {
        self.request.url.as_str()
    }

    pub fn is_fetched(&self) -> bool {
        self.response.is_some()
    }

    /// Fetch latency formatted as `<n> ms`, or an empty string before the fetch.
    pub fn request_time_display(&self) -> String {
        self.request_time
            .map(|d| format!("{} ms", d.as_millis()))
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_page_is_unknown_get() {
        let page = Page::new(Url::parse("https://example.com/about").unwrap());
        assert_eq!(page.kind(), LinkKind::Unknown);
        assert_eq!(page.request.method, "GET");
        assert!(page.links.is_empty());
        assert!(!page.is_fetched());
        assert_eq!(page.url(), "https://example.com/about");
        assert_eq!(page.request_time_display(), "");
    }

    #[test]
    fn test_set_kind() {
        let mut page = Page::new(Url::parse("https://example.com").unwrap());
        page.set_kind(LinkKind::External);
        assert_eq!(page.kind(), LinkKind::External);
    }

    #[test]
    fn test_status_line() {
        let resp = PageResponse::new(404, Some("Not Found".into()), None);
        assert_eq!(resp.status_line(), "404 Not Found");
        let bare = PageResponse::new(999, None, None);
        assert_eq!(bare.status_line(), "999");
    }

    #[test]
    fn test_request_time_display() {
        let mut page = Page::new(Url::parse("https://example.com").unwrap());
        page.request_time = Some(Duration::from_millis(42));
        assert_eq!(page.request_time_display(), "42 ms");
    }
}
