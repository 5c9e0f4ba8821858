//! # news_watch
//!
//! Polls a news site's front page, discovers newly published articles,
//! extracts structured metadata from each (publish time, title, lead text,
//! authors), deduplicates against articles already seen this run, and prints
//! new records to the terminal.
//!
//! ## Usage
//!
//! ```sh
//! news_watch
//! news_watch --url https://www.vg.no --interval-secs 180
//! ```
//!
//! ## Architecture
//!
//! One polling loop, one scrape cycle per tick:
//! 1. **Fetch** the front page and enumerate candidate article teasers
//! 2. **Filter** candidates against the in-memory seen-set
//! 3. **Fetch + extract** each new article sequentially, skipping failures
//! 4. **Report** the non-empty batch to the console sink
//!
//! All fetches within a cycle are strictly sequential; the seen-set lives
//! for the process lifetime only.

use chrono::FixedOffset;
use clap::Parser;
use std::error::Error;
use std::time::Duration;
use tracing::{debug, info};
use tracing_subscriber::{fmt as tfmt, EnvFilter};
use url::Url;

mod cli;
mod cycle;
mod dedup;
mod error;
mod extract;
mod fetch;
mod models;
mod poller;
mod report;

use cli::Cli;
use cycle::ScrapeCycle;
use extract::FieldExtractor;
use fetch::HttpFetcher;
use poller::Poller;
use report::ConsoleSink;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    info!("news_watch starting up");

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    let front_page_url = Url::parse(&args.url)?;
    let offset = FixedOffset::east_opt(args.utc_offset_hours * 3600)
        .ok_or_else(|| format!("invalid UTC offset: {} hours", args.utc_offset_hours))?;

    let extractor = FieldExtractor::new(offset, args.suppress_lead_text);
    let cycle = ScrapeCycle::new(Box::new(HttpFetcher::new()), extractor, front_page_url);
    let sink = ConsoleSink::new(args.format);

    let mut poller = Poller::new(cycle, Duration::from_secs(args.interval_secs), sink);
    poller.run().await;

    info!("news_watch exiting");
    Ok(())
}
