//! Deduplication of already-processed article URLs.

use std::collections::HashSet;

/// Strip the query string from an article URL.
///
/// The same article is linked from the front page with varying tracking
/// parameters, so the URL without its query string is the stable identity.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(normalize_url("https://site/a?x=1"), "https://site/a");
/// ```
pub fn normalize_url(url: &str) -> String {
    url.split('?').next().unwrap_or(url).to_string()
}

/// The set of normalized article URLs processed so far.
///
/// Grows by one per successfully extracted article and never shrinks. It is
/// not persisted: a restart re-reports everything. Unbounded growth is an
/// accepted tradeoff for a process that runs for bounded periods.
#[derive(Debug, Default)]
pub struct SeenSet {
    urls: HashSet<String>,
}

impl SeenSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, url: &str) -> bool {
        self.urls.contains(url)
    }

    /// Mark a URL as seen. Returns `false` if it was already present.
    pub fn insert(&mut self, url: &str) -> bool {
        self.urls.insert(url.to_string())
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}
