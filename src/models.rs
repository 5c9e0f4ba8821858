//! Data model for scraped articles.
//!
//! One [`ArticleRecord`] is produced per newly discovered article. Fields
//! that could not be extracted carry sentinel strings rather than errors, so
//! a redesigned or partially broken article page still yields a row.

use chrono::{DateTime, FixedOffset};
use serde::Serialize;

/// Sentinel for a field whose fallback chain found nothing.
pub const UNKNOWN: &str = "Unknown";

/// Sentinel for an article without a lead text.
pub const NOT_AVAILABLE: &str = "N/A";

/// Placeholder shown when lead text is suppressed via `--suppress-lead-text`.
pub const LEAD_TEXT_SUPPRESSED: &str = "Suppressed. Run without --suppress-lead-text to see.";

/// Metadata for a single newly published article.
///
/// `source_url` is the deduplication key: the article URL with its query
/// string stripped. It is required and unique across the process lifetime;
/// every other field may degrade to a sentinel.
#[derive(Debug, Clone, Serialize)]
pub struct ArticleRecord {
    /// Publication instant converted to the configured fixed UTC offset,
    /// or `None` when the page carries no date element.
    pub published: Option<DateTime<FixedOffset>>,
    /// The article headline.
    pub title: String,
    /// The article lead text (summary shown on the article page).
    pub lead_text: String,
    /// Byline authors, as a single string.
    pub authors: String,
    /// Normalized article URL (query string stripped).
    pub source_url: String,
}

impl ArticleRecord {
    /// Render the publication time for display, substituting the sentinel
    /// when it is unknown.
    pub fn published_display(&self) -> String {
        self.published
            .map(|dt| dt.to_rfc3339())
            .unwrap_or_else(|| UNKNOWN.to_string())
    }
}
