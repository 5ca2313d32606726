use crate::error::{Result, ScanError};
use crate::handler::{CrawlMode, PageHandler};
use linkt_core::util::parse_absolute_url;
use linkt_core::{LinkKind, LinkSet, NodeId, Page, PageResponse, Sitemap};
use linkt_core::link_set::normalize_link;
use reqwest::Client;
use scraper::{Html, Selector};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};
use url::Url;

pub type ProgressCallback = Arc<dyn Fn(String) + Send + Sync>;

/// HTTP and pacing settings for a crawl.
#[derive(Debug, Clone)]
pub struct CrawlOptions {
    pub delay: Duration,
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for CrawlOptions {
    fn default() -> Self {
        Self {
            delay: Duration::ZERO,
            timeout: Duration::from_secs(10),
            user_agent: format!("linkt/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl CrawlOptions {
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Walks a single site into a [`Sitemap`].
///
/// Pages are fetched one at a time, depth-first, in the order their links
/// appear in the markup. Every link is registered as visited when it is
/// discovered, so no page is attached or fetched twice.
pub struct Spider<H> {
    client: Client,
    options: CrawlOptions,
    handler: H,
    visited: LinkSet,
    progress_callback: Option<ProgressCallback>,
}

impl<H: PageHandler> Spider<H> {
    pub fn new(handler: H) -> Result<Self> {
        Self::with_options(handler, CrawlOptions::default())
    }

    pub fn with_options(handler: H, options: CrawlOptions) -> Result<Self> {
        let client = Client::builder()
            .user_agent(options.user_agent.as_str())
            .timeout(options.timeout)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()?;

        Ok(Self {
            client,
            options,
            handler,
            visited: LinkSet::new(),
            progress_callback: None,
        })
    }

    pub fn with_progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }

    pub fn into_handler(self) -> H {
        self.handler
    }

    /// Every link discovered so far, including the root.
    pub fn visited(&self) -> &LinkSet {
        &self.visited
    }

    pub async fn crawl(&mut self, root: &Url) -> Result<Sitemap> {
        info!(root = %root, mode = ?self.handler.mode(), "starting crawl");

        let mut sitemap = Sitemap::new();
        let page = Page::new(root.clone())
            .with_kind(LinkKind::Internal)
            .with_parent_url(root.as_str());
        let root_id = sitemap.tree_mut().add_root(page)?;
        self.visited.insert(root.as_str(), LinkKind::Internal);

        // LIFO with children pushed in reverse keeps recursive pre-order
        let mut stack = vec![root_id];
        while let Some(id) = stack.pop() {
            let children = self.walk(&mut sitemap, id).await?;
            for &child in children.iter().rev() {
                if self.handler.should_descend(sitemap.page(child)) {
                    stack.push(child);
                }
            }
        }

        info!(pages = sitemap.size(), "crawl complete");
        Ok(sitemap)
    }

    /// Fetches one node, attaches the links found on it and returns the new
    /// children in discovery order.
    async fn walk(&mut self, sitemap: &mut Sitemap, id: NodeId) -> Result<Vec<NodeId>> {
        let Some(body) = self.fetch(sitemap.tree_mut().get_mut(id)).await? else {
            return Ok(Vec::new());
        };

        if sitemap.root() == Some(id) {
            self.register_root(sitemap.page(id));
        }

        let raw_links = extract_links(&body, self.handler.mode())?;
        drop(body);

        let page = sitemap.tree_mut().get_mut(id);
        for raw in raw_links {
            self.store(page, &raw);
        }

        let Some(root_url) = sitemap.root_page().map(|p| p.request.url.clone()) else {
            return Ok(Vec::new());
        };
        let parent_url = sitemap.page(id).url().to_string();
        let links: Vec<(String, LinkKind)> = sitemap
            .page(id)
            .links
            .iter()
            .map(|(link, kind)| (link.to_string(), kind))
            .collect();

        let mut children = Vec::with_capacity(links.len());
        for (link, kind) in links {
            let url = match resolve_link(&root_url, &link, kind) {
                Ok(url) => url,
                Err(e) => {
                    debug!(page = %parent_url, link = %link, error = %e, "skipping unparseable link");
                    continue;
                }
            };
            let child = Page::new(url)
                .with_kind(kind)
                .with_parent_url(parent_url.as_str());
            children.push(sitemap.tree_mut().add_child(id, child));
        }
        Ok(children)
    }

    /// GETs the page and records the response. Returns the body only for
    /// internal pages, since nothing else gets scraped.
    async fn fetch(&mut self, page: &mut Page) -> Result<Option<String>> {
        if parse_absolute_url(page.url()).is_none() {
            info!(url = page.url(), "invalid URL");
            return Ok(None);
        }

        if !self.options.delay.is_zero() {
            tokio::time::sleep(self.options.delay).await;
        }

        if let Some(ref callback) = self.progress_callback {
            callback(page.url().to_string());
        }

        let start = Instant::now();
        let response = self
            .client
            .get(page.request.url.clone())
            .send()
            .await
            .map_err(|source| ScanError::Transport {
                url: page.url().to_string(),
                source,
            })?;
        page.request_time = Some(start.elapsed());

        let status = response.status();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());
        page.response = Some(PageResponse::new(
            status.as_u16(),
            status.canonical_reason().map(str::to_string),
            content_type,
        ));

        debug!(
            page = page.url(),
            status = %status,
            request_time = %page.request_time_display(),
            "fetched a page"
        );

        self.handler.on_page_fetched(page).await?;

        if page.kind() != LinkKind::Internal {
            return Ok(None);
        }

        let body = response
            .text()
            .await
            .map_err(|source| ScanError::Transport {
                url: page.url().to_string(),
                source,
            })?;
        Ok(Some(body))
    }

    fn register_root(&mut self, root: &Page) {
        self.visited.insert(root.url(), LinkKind::Internal);
        // href="/" and friends point back at the root
        self.visited.insert(root.request.url.path(), LinkKind::Internal);
    }

    fn store(&mut self, page: &mut Page, raw: &str) {
        let Some((link, kind)) = classify_link(raw) else {
            return;
        };
        if self.visited.contains(link) {
            return;
        }
        debug!(page = page.url(), link = %link, kind = %kind, "collected a link");
        self.visited.insert(link, kind);
        page.links.insert(link, kind);
    }
}

/// Classifies a raw `href`/`src` value.
///
/// Root-relative values are internal, fragments are dropped, anything else
/// is external. The returned link is normalized.
pub fn classify_link(raw: &str) -> Option<(&str, LinkKind)> {
    let value = raw.trim();
    if value.is_empty() || value.starts_with('#') {
        return None;
    }
    let kind = if value.starts_with('/') {
        LinkKind::Internal
    } else {
        LinkKind::External
    };
    Some((normalize_link(value), kind))
}

/// Internal links hang off the root's origin; external links are taken as
/// written.
pub fn resolve_link(root: &Url, link: &str, kind: LinkKind) -> std::result::Result<Url, url::ParseError> {
    match kind {
        LinkKind::Internal => Url::parse(&format!("{}{}", root.origin().ascii_serialization(), link)),
        _ => Url::parse(link),
    }
}

/// Pulls candidate link values out of a document, in document order.
pub fn extract_links(html: &str, mode: CrawlMode) -> Result<Vec<String>> {
    let document = Html::parse_document(html);
    let selector = if mode.collects_resources() {
        "a, link, img, script"
    } else {
        "a[href]"
    };
    let selector = Selector::parse(selector).map_err(|e| ScanError::ParseError(e.to_string()))?;

    let mut links = Vec::new();
    for element in document.select(&selector) {
        let el = element.value();
        let value = match el.name() {
            "a" if !mode.collects_resources() => el.attr("href"),
            // whichever of href/data-href is written first wins
            "a" | "link" => el
                .attrs()
                .find(|(name, _)| matches!(*name, "href" | "data-href"))
                .map(|(_, value)| value),
            "img" | "script" => el.attr("src"),
            _ => None,
        };
        if let Some(value) = value {
            debug!(tag = el.name(), page = value, "found a link");
            links.push(value.to_string());
        }
    }
    Ok(links)
}
