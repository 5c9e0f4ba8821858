//! Command-line interface definitions for news_watch.
//!
//! This module defines the CLI arguments and options using the `clap` crate.

use crate::report::OutputFormat;
use clap::Parser;

/// Command-line arguments for the news_watch poller.
///
/// # Examples
///
/// ```sh
/// # Poll the default front page every 3 minutes
/// news_watch
///
/// # Poll a different site every minute, JSON output
/// news_watch --url https://example.com --interval-secs 60 --format json
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Front page URL to poll
    #[arg(short, long, default_value = "https://www.vg.no")]
    pub url: String,

    /// Seconds to wait between polling cycles
    #[arg(short, long, default_value_t = 180)]
    pub interval_secs: u64,

    /// Fixed UTC offset, in hours, applied to published timestamps
    #[arg(long, default_value_t = 1, allow_negative_numbers = true)]
    pub utc_offset_hours: i32,

    /// Replace article lead text with a static placeholder
    #[arg(long)]
    pub suppress_lead_text: bool,

    /// Output format for new-article batches
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}
