use std::collections::HashMap;
use std::fmt;

/// Classification of a page or link relative to the crawl root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LinkKind {
    #[default]
    Unknown,
    Internal,
    External,
}

impl LinkKind {
    /// Integer tag: Internal = 0, External = 1, Unknown = -1.
    pub fn tag(self) -> i8 {
        match self {
            LinkKind::Unknown => -1,
            LinkKind::Internal => 0,
            LinkKind::External => 1,
        }
    }
}

impl fmt::Display for LinkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LinkKind::Unknown => "unknown",
            LinkKind::Internal => "internal",
            LinkKind::External => "external",
        };
        f.write_str(s)
    }
}

/// Strips surrounding whitespace and one trailing slash.
pub fn normalize_link(link: &str) -> &str {
    let trimmed = link.trim();
    trimmed.strip_suffix('/').unwrap_or(trimmed)
}

/// Set of normalized link strings, each tagged with a [`LinkKind`].
///
/// Iteration yields links in the order they were first inserted.
#[derive(Debug, Clone, Default)]
pub struct LinkSet {
    kinds: HashMap<String, LinkKind>,
    order: Vec<String>,
}

impl LinkSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, link: &str) -> bool {
        self.kinds.contains_key(normalize_link(link))
    }

    /// Records `link` with `kind`. Returns false (and keeps the existing tag)
    /// if the normalized link is already present.
    pub fn insert(&mut self, link: &str, kind: LinkKind) -> bool {
        let key = normalize_link(link);
        if self.kinds.contains_key(key) {
            return false;
        }
        self.kinds.insert(key.to_string(), kind);
        self.order.push(key.to_string());
        true
    }

    pub fn kind(&self, link: &str) -> Option<LinkKind> {
        self.kinds.get(normalize_link(link)).copied()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, LinkKind)> + '_ {
        self.order
            .iter()
            .map(|k| (k.as_str(), self.kinds[k.as_str()]))
    }
}
