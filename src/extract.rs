//! Field extraction from article documents.
//!
//! Every field is located through an ordered fallback chain of selectors.
//! The first strategy that yields non-empty text wins; when the whole chain
//! comes up empty the field takes its sentinel value. Chains are declared as
//! data so the lookup order is visible in one place and testable per field.
//!
//! # Markup contract
//!
//! The selectors encode the site's microdata conventions: a canonical
//! `data-test-tag="headline"` heading (with a `tittel` locale variant), a
//! `byline:authors` tag with `rel="author"` and two legacy class fallbacks,
//! a `lead-text` tag, and a `time[itemprop="dateModified"]` element whose
//! `datetime` attribute is an ISO-8601 UTC instant.

use crate::error::ExtractError;
use crate::models::{ArticleRecord, LEAD_TEXT_SUPPRESSED, NOT_AVAILABLE, UNKNOWN};
use chrono::{DateTime, FixedOffset, NaiveDateTime};
use once_cell::sync::Lazy;
use scraper::{Html, Selector};

/// Pattern of the `datetime` attribute on the date-modified element.
const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

fn chain(selectors: &[&str]) -> Vec<Selector> {
    selectors
        .iter()
        .map(|s| Selector::parse(s).unwrap())
        .collect()
}

static TITLE_CHAIN: Lazy<Vec<Selector>> = Lazy::new(|| {
    chain(&[
        r#"h1[data-test-tag="headline"]"#,
        r#"h1[data-test-tag="tittel"]"#,
        "h1",
    ])
});

static AUTHORS_CHAIN: Lazy<Vec<Selector>> = Lazy::new(|| {
    chain(&[
        r#"[data-test-tag="byline:authors"]"#,
        r#"[rel="author"]"#,
        ".fr",
        ".Bn",
    ])
});

static LEAD_TEXT_CHAIN: Lazy<Vec<Selector>> =
    Lazy::new(|| chain(&[r#"[data-test-tag="lead-text"]"#]));

static DATE_MODIFIED: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"time[itemprop="dateModified"]"#).unwrap());

/// Walk a fallback chain and return the first non-empty, trimmed text.
///
/// Each strategy considers only its first matching element, mirroring the
/// site's markup where these markers appear at most once per page.
fn first_text(document: &Html, chain: &[Selector]) -> Option<String> {
    for selector in chain {
        if let Some(element) = document.select(selector).next() {
            let text = element.text().collect::<Vec<_>>().join(" ");
            let text = text.trim();
            if !text.is_empty() {
                return Some(text.to_string());
            }
        }
    }
    None
}

/// Extracts an [`ArticleRecord`] from a parsed article document.
pub struct FieldExtractor {
    offset: FixedOffset,
    suppress_lead_text: bool,
}

impl FieldExtractor {
    /// # Arguments
    ///
    /// * `offset` - Fixed UTC offset applied to publication timestamps
    /// * `suppress_lead_text` - Replace lead text with a static placeholder
    pub fn new(offset: FixedOffset, suppress_lead_text: bool) -> Self {
        Self {
            offset,
            suppress_lead_text,
        }
    }

    /// Produce a record for one article document.
    ///
    /// `source_url` is supplied by the caller (it comes from the front-page
    /// link, not the article body). Missing elements degrade to sentinels;
    /// the only error is a malformed `datetime` attribute, which fails the
    /// whole article so the caller can skip and retry it next cycle.
    pub fn extract(
        &self,
        document: &Html,
        source_url: String,
    ) -> Result<ArticleRecord, ExtractError> {
        let title = first_text(document, &TITLE_CHAIN).unwrap_or_else(|| UNKNOWN.to_string());
        let authors = first_text(document, &AUTHORS_CHAIN).unwrap_or_else(|| UNKNOWN.to_string());
        let lead_text = if self.suppress_lead_text {
            LEAD_TEXT_SUPPRESSED.to_string()
        } else {
            first_text(document, &LEAD_TEXT_CHAIN).unwrap_or_else(|| NOT_AVAILABLE.to_string())
        };
        let published = self.extract_published(document)?;

        Ok(ArticleRecord {
            published,
            title,
            lead_text,
            authors,
            source_url,
        })
    }

    /// Parse the date-modified element into a local instant.
    ///
    /// A missing element or missing attribute means the publication time is
    /// unknown (`None`), never "now". A present-but-unparseable attribute is
    /// a hard failure: substituting a guess would silently misreport when an
    /// article was published.
    fn extract_published(
        &self,
        document: &Html,
    ) -> Result<Option<DateTime<FixedOffset>>, ExtractError> {
        let Some(element) = document.select(&DATE_MODIFIED).next() else {
            return Ok(None);
        };
        let Some(value) = element.value().attr("datetime") else {
            return Ok(None);
        };
        let naive = NaiveDateTime::parse_from_str(value, DATETIME_FORMAT).map_err(|source| {
            ExtractError::DateParse {
                value: value.to_string(),
                source,
            }
        })?;
        Ok(Some(naive.and_utc().with_timezone(&self.offset)))
    }
}
