//! Per-mode behavior plugged into the spider.
//!
//! The traversal itself does not know about sitemaps, link tests or
//! screenshots. It asks the run's [`PageHandler`] which tags to collect,
//! whether to descend into a child, and what to do once a page is fetched.

use crate::capture::Capture;
use crate::error::{Result, ScanError};
use async_trait::async_trait;
use linkt_core::report::{Record, StatusBand, format_test_result};
use linkt_core::util::sanitize_file_stem;
use linkt_core::{LinkKind, Page};
use std::path::PathBuf;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrawlMode {
    Sitemap,
    LinkTest,
    Screenshot,
}

impl CrawlMode {
    /// Link tests also check stylesheets, images and scripts; the other
    /// modes only follow anchors.
    pub fn collects_resources(self) -> bool {
        matches!(self, CrawlMode::LinkTest)
    }
}

#[async_trait]
pub trait PageHandler: Send {
    fn mode(&self) -> CrawlMode;

    /// Whether the spider should fetch a freshly attached child.
    fn should_descend(&self, page: &Page) -> bool {
        page.kind() == LinkKind::Internal
    }

    /// Called once for every page that was fetched.
    async fn on_page_fetched(&mut self, _page: &Page) -> Result<()> {
        Ok(())
    }
}

/// Builds the tree and nothing else.
#[derive(Debug, Default, Clone, Copy)]
pub struct SitemapHandler;

#[async_trait]
impl PageHandler for SitemapHandler {
    fn mode(&self) -> CrawlMode {
        CrawlMode::Sitemap
    }
}

/// Which children a link test fetches.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum LinkTestScope {
    /// Every discovered link, internal or external.
    #[default]
    All,
    /// Only links on the same origin as the root.
    InternalOnly,
}

/// Reports the HTTP status of every fetched link.
#[derive(Debug, Default)]
pub struct LinkTestHandler {
    scope: LinkTestScope,
    records: Option<Vec<Record>>,
    quiet: bool,
    tested: usize,
    broken: usize,
}

impl LinkTestHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_scope(mut self, scope: LinkTestScope) -> Self {
        self.scope = scope;
        self
    }

    /// Keep a [`Record`] for every tested link so it can be exported later.
    pub fn with_json_export(mut self) -> Self {
        self.records = Some(Vec::new());
        self
    }

    /// Skip printing results to stdout.
    pub fn with_quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    pub fn records(&self) -> &[Record] {
        self.records.as_deref().unwrap_or_default()
    }

    pub fn into_records(self) -> Vec<Record> {
        self.records.unwrap_or_default()
    }

    /// Number of fetched links.
    pub fn tested(&self) -> usize {
        self.tested
    }

    /// Fetched links that answered 4xx, 5xx or 999.
    pub fn broken(&self) -> usize {
        self.broken
    }
}

#[async_trait]
impl PageHandler for LinkTestHandler {
    fn mode(&self) -> CrawlMode {
        CrawlMode::LinkTest
    }

    fn should_descend(&self, page: &Page) -> bool {
        match self.scope {
            LinkTestScope::All => true,
            LinkTestScope::InternalOnly => page.kind() == LinkKind::Internal,
        }
    }

    async fn on_page_fetched(&mut self, page: &Page) -> Result<()> {
        let Some(response) = page.response.as_ref() else {
            return Ok(());
        };
        self.tested += 1;
        if StatusBand::from_code(response.status_code).is_broken() {
            self.broken += 1;
        }
        if !self.quiet
            && let Some(block) = format_test_result(page)
        {
            print!("{}", block);
        }
        if let Some(records) = self.records.as_mut()
            && let Some(record) = Record::from_page(page)
        {
            records.push(record);
        }
        Ok(())
    }
}

/// Saves a screenshot of every fetched internal page.
pub struct ScreenshotHandler<C> {
    capture: C,
    dir: PathBuf,
    saved: Vec<PathBuf>,
}

impl<C: Capture> ScreenshotHandler<C> {
    pub fn new(capture: C, dir: impl Into<PathBuf>) -> Self {
        Self {
            capture,
            dir: dir.into(),
            saved: Vec::new(),
        }
    }

    /// Files written so far, in crawl order.
    pub fn saved(&self) -> &[PathBuf] {
        &self.saved
    }

    pub fn into_capture(self) -> C {
        self.capture
    }

    pub fn screenshot_path(&self, page: &Page) -> PathBuf {
        self.dir
            .join(format!("{}.jpeg", sanitize_file_stem(page.url())))
    }
}

#[async_trait]
impl<C: Capture> PageHandler for ScreenshotHandler<C> {
    fn mode(&self) -> CrawlMode {
        CrawlMode::Screenshot
    }

    async fn on_page_fetched(&mut self, page: &Page) -> Result<()> {
        if page.kind() != LinkKind::Internal {
            return Ok(());
        }
        let path = self.screenshot_path(page);
        let bytes = self.capture.capture(&page.request.url).await?;
        tokio::fs::write(&path, bytes)
            .await
            .map_err(ScanError::IoError)?;
        debug!(page = page.url(), file = %path.display(), "saved screenshot");
        self.saved.push(path);
        Ok(())
    }
}
