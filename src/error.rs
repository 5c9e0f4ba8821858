//! Error types for fetching and field extraction.

use thiserror::Error;

/// Failure to retrieve a page.
///
/// A non-success HTTP status and a transport-level failure are kept distinct
/// so log lines can carry the status code when there is one. Both are handled
/// the same way by the scrape cycle: fatal for the front page, skip-and-retry
/// for an individual article.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("request to {url} returned status {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Failure to extract fields from an article document.
///
/// Missing elements are never errors; they resolve to sentinel values through
/// the fallback chains. The only hard failure is a `datetime` attribute that
/// is present but does not match the expected pattern.
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("unparseable datetime attribute {value:?}: {source}")]
    DateParse {
        value: String,
        source: chrono::format::ParseError,
    },
}
