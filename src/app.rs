use std::time::{Duration, Instant};

use anyhow::Result;
use log::info;

use crate::config::Config;
use crate::connection::Connection;
use crate::db::{Sqlite, TableStore, UpsertReport};
use crate::reader::read_rows;
use crate::report::Diagnostic;
use crate::sample::ensure_sample_csv;

/// What a single run did.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub sample_created: bool,
    pub rows_parsed: usize,
    /// Header and conversion diagnostics, in the order they were raised.
    pub diagnostics: Vec<Diagnostic>,
    /// `None` when there was nothing to write.
    pub upsert: Option<UpsertReport>,
    pub elapsed: Duration,
}

impl RunSummary {
    pub fn records_written(&self) -> usize {
        self.upsert.as_ref().map_or(0, |r| r.written)
    }
}

/// Ensure input, create the table, read the CSV and upsert its rows.
pub fn run_app(config: &Config) -> Result<RunSummary> {
    let started = Instant::now();
    info!("script started.");

    let mut summary = RunSummary {
        sample_created: ensure_sample_csv(&config.csv_path)?,
        ..RunSummary::default()
    };

    let conn = Connection::new(&config.db_path);
    Sqlite::initialize(&conn)?;

    let parsed = read_rows(&config.csv_path)?;
    summary.rows_parsed = parsed.rows.len();
    summary.diagnostics = parsed.diagnostics;

    if parsed.rows.is_empty() {
        info!("no valid data to update. exiting.");
        summary.elapsed = started.elapsed();
        return Ok(summary);
    }

    let report = Sqlite::upsert_rows(&conn, &parsed.rows)?;
    summary.diagnostics.extend(report.skipped.iter().cloned());
    info!(
        "finished updating the database: {} written, {} skipped.",
        report.written,
        report.skipped.len()
    );
    summary.upsert = Some(report);

    summary.elapsed = started.elapsed();
    info!("run duration: {:?}", summary.elapsed);
    Ok(summary)
}
