//! Presentation sinks for new-article batches.

use crate::models::ArticleRecord;
use clap::ValueEnum;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};
use tracing::error;

/// How batches are rendered on stdout.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Rounded table, one row per record.
    #[default]
    Table,
    /// One JSON object per line.
    Json,
}

/// Receives each non-empty batch of newly discovered records.
pub trait ReportSink {
    fn publish(&mut self, batch: &[ArticleRecord]);
}

/// Renders batches to stdout in the configured format.
pub struct ConsoleSink {
    format: OutputFormat,
}

impl ConsoleSink {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }
}

impl ReportSink for ConsoleSink {
    fn publish(&mut self, batch: &[ArticleRecord]) {
        match self.format {
            OutputFormat::Table => println!("{}", render_table(batch)),
            OutputFormat::Json => {
                for record in batch {
                    match serde_json::to_string(record) {
                        Ok(line) => println!("{line}"),
                        Err(e) => error!(error = %e, "Failed to serialize record"),
                    }
                }
            }
        }
    }
}

/// Format a batch as a table with one row per record.
pub fn render_table(batch: &[ArticleRecord]) -> String {
    let mut builder = Builder::default();
    builder.push_record(["Published", "Title", "Summary", "Author(s)"]);

    for record in batch {
        builder.push_record([
            record.published_display(),
            record.title.clone(),
            record.lead_text.clone(),
            record.authors.clone(),
        ]);
    }

    let mut table = builder.build();
    table
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()));
    table.to_string()
}
