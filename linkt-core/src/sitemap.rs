// Sitemap tree rendering and XML export

use crate::page::Page;
use crate::tree::{NodeId, Tree};
use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

pub const SITEMAP_FILE_NAME: &str = "sitemap.xml";
const XML_HEADER: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;
const URLSET_OPEN: &str = r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">"#;

#[derive(Error, Debug)]
pub enum SitemapError {
    #[error("could not create directory {path}: {source}")]
    CreateDir { path: PathBuf, source: io::Error },

    #[error("could not write sitemap file {path}: {source}")]
    Write { path: PathBuf, source: io::Error },
}

/// The tree of pages produced by a crawl, rooted at the start URL.
#[derive(Debug, Clone, Default)]
pub struct Sitemap {
    tree: Tree<Page>,
}

impl Sitemap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tree(&self) -> &Tree<Page> {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut Tree<Page> {
        &mut self.tree
    }

    pub fn root(&self) -> Option<NodeId> {
        self.tree.root()
    }

    pub fn root_page(&self) -> Option<&Page> {
        self.tree.root().map(|id| self.tree.get(id))
    }

    pub fn page(&self, id: NodeId) -> &Page {
        self.tree.get(id)
    }

    pub fn size(&self) -> usize {
        self.tree.size()
    }

    /// Page URLs in preorder with duplicates removed.
    pub fn unique_urls(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.tree
            .preorder()
            .into_iter()
            .map(|id| self.tree.get(id).url())
            .filter(|url| seen.insert(*url))
            .collect()
    }

    /// Writes the outline to stdout framed by blank lines.
    pub fn print(&self) {
        println!("\n{}", self);
    }

    /// Standard sitemap-protocol document, one `<url>` per unique page.
    pub fn to_xml(&self) -> String {
        let mut xml = String::new();
        xml.push_str(XML_HEADER);
        xml.push('\n');
        xml.push_str(URLSET_OPEN);
        xml.push('\n');
        for url in self.unique_urls() {
            xml.push_str("<url>\n");
            xml.push_str(&format!("  <loc>{}</loc>\n", xml_escape(url)));
            xml.push_str("</url>\n");
        }
        xml.push_str("</urlset>\n");
        xml
    }

    /// Writes `sitemap.xml` into `dir`, creating the directory first.
    pub fn write_xml(&self, dir: &Path) -> Result<PathBuf, SitemapError> {
        fs::create_dir_all(dir).map_err(|source| SitemapError::CreateDir {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = dir.join(SITEMAP_FILE_NAME);
        fs::write(&path, self.to_xml()).map_err(|source| SitemapError::Write {
            path: path.clone(),
            source,
        })?;
        debug!(path = %path.display(), pages = self.size(), "wrote sitemap");
        Ok(path)
    }

    fn render(&self, f: &mut fmt::Formatter<'_>, id: NodeId, depth: isize) -> fmt::Result {
        let url = self.tree.get(id).url();
        if depth < 0 {
            writeln!(f, "{}", url)?;
        } else {
            let glyph = if self.is_last_leaf(id) { "└───" } else { "├───" };
            let indent = " ".repeat(depth as usize * 4);
            if depth == 0 {
                writeln!(f, "{}{} {}", indent, glyph, url)?;
            } else if depth % 2 == 0 {
                writeln!(f, "│{} {} {}", indent, glyph, url)?;
            } else {
                writeln!(f, "│{}{} {}", indent, glyph, url)?;
            }
        }
        for &child in self.tree.children(id) {
            self.render(f, child, depth + 1)?;
        }
        Ok(())
    }

    // A leaf that is its parent's final child closes the branch.
    fn is_last_leaf(&self, id: NodeId) -> bool {
        if !self.tree.children(id).is_empty() {
            return false;
        }
        self.tree
            .parent(id)
            .and_then(|p| self.tree.children(p).last().copied())
            == Some(id)
    }
}

impl fmt::Display for Sitemap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.tree.root() {
            Some(root) => self.render(f, root, -1),
            None => Ok(()),
        }
    }
}

fn xml_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
