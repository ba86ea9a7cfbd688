//! Report command: fetch, decode, aggregate and print the hours summary.
//!
//! Output is either the human-readable table (default) or JSON (`--json`).
//! Per-event diagnostics are printed as one block before the table.

use std::fmt::Write as _;
use std::io::Write;

use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, FixedOffset, Local};
use hetd_core::format::format_hours_aligned;
use hetd_core::{Diagnostic, ProcessOptions, Report, ReportRow, RunOutcome, process};
use hetd_fetch::{Client, Source};
use serde::Serialize;

use crate::Config;

const LABEL_WIDTH: usize = 50;
const CATEGORY_WIDTH: usize = 8;
const TOTAL_WIDTH: usize = 14;
const TABLE_RULE_WIDTH: usize = 120;
const DIAGNOSTIC_RULE_WIDTH: usize = 80;

/// Options for a report run, resolved from the command line.
#[derive(Debug, Clone, Default)]
pub struct ReportOptions {
    /// Only include events that have already ended.
    pub done: bool,
    /// Emit JSON instead of the text table.
    pub json: bool,
    /// Calendar locator overriding the configured one.
    pub source: Option<String>,
}

/// Computed report data.
#[derive(Debug)]
pub struct ReportData {
    pub generated_at: DateTime<FixedOffset>,
    pub timezone: String,
    pub done_only: bool,
    pub processed: usize,
    pub skipped_future: usize,
    pub diagnostics: Vec<Diagnostic>,
    pub report: Report,
}

impl ReportData {
    /// Collects the figures of a finished run.
    pub fn from_outcome(
        outcome: RunOutcome,
        done_only: bool,
        generated_at: DateTime<FixedOffset>,
    ) -> Self {
        let timezone = iana_time_zone::get_timezone().unwrap_or_else(|_| "UTC".to_string());
        Self {
            generated_at,
            timezone,
            done_only,
            processed: outcome.processed,
            skipped_future: outcome.skipped_future,
            report: outcome.aggregator.finalize(),
            diagnostics: outcome.diagnostics,
        }
    }
}

// ========== Text Output ==========

fn format_row(row: &ReportRow) -> String {
    format!(
        "{:<LABEL_WIDTH$} {} {} {} {} {}",
        row.label,
        format_hours_aligned(row.cm, CATEGORY_WIDTH),
        format_hours_aligned(row.td, CATEGORY_WIDTH),
        format_hours_aligned(row.tp, CATEGORY_WIDTH),
        format_hours_aligned(row.total_hours, TOTAL_WIDTH),
        format_hours_aligned(row.total_hetd, TOTAL_WIDTH),
    )
}

/// Formats the diagnostics block. Empty when there is nothing to report.
pub fn format_diagnostics(diagnostics: &[Diagnostic]) -> String {
    let mut output = String::new();
    if diagnostics.is_empty() {
        return output;
    }

    let rule = "=".repeat(DIAGNOSTIC_RULE_WIDTH);
    writeln!(output, "{rule}").unwrap();
    writeln!(output, "WARNINGS AND ERRORS:").unwrap();
    writeln!(output, "{rule}").unwrap();
    for diagnostic in diagnostics {
        writeln!(output, "{diagnostic}").unwrap();
    }
    writeln!(output).unwrap();
    output
}

/// Formats the hours table with its total row.
pub fn format_table(report: &Report) -> String {
    let mut output = String::new();
    let heavy = "=".repeat(TABLE_RULE_WIDTH);

    writeln!(output, "{heavy}").unwrap();
    writeln!(output, "HOURS SUMMARY BY CODE").unwrap();
    writeln!(output, "{heavy}").unwrap();
    writeln!(output).unwrap();
    writeln!(
        output,
        "{:<LABEL_WIDTH$} {:>CATEGORY_WIDTH$} {:>CATEGORY_WIDTH$} {:>CATEGORY_WIDTH$} {:>TOTAL_WIDTH$} {:>TOTAL_WIDTH$}",
        "Code & Name", "CM", "TD", "TP", "Total hours", "Total HETD"
    )
    .unwrap();
    writeln!(output, "{}", "-".repeat(TABLE_RULE_WIDTH)).unwrap();

    for row in &report.rows {
        writeln!(output, "{}", format_row(row)).unwrap();
    }

    writeln!(output, "{heavy}").unwrap();
    writeln!(output, "{}", format_row(&report.totals)).unwrap();
    writeln!(output, "{heavy}").unwrap();
    output
}

/// Formats everything printed after the calendar has been processed.
pub fn format_report(data: &ReportData) -> String {
    let mut output = String::new();

    writeln!(output).unwrap();
    writeln!(output, "Processed {} events", data.processed).unwrap();
    if data.done_only && data.skipped_future > 0 {
        writeln!(output, "Skipped {} future events", data.skipped_future).unwrap();
    }
    writeln!(output).unwrap();

    output.push_str(&format_diagnostics(&data.diagnostics));
    output.push_str(&format_table(&data.report));
    output
}

// ========== JSON Output ==========

/// JSON report structure.
#[derive(Debug, Serialize)]
pub struct JsonReport<'a> {
    pub generated_at: String,
    pub timezone: &'a str,
    pub done_only: bool,
    pub processed: usize,
    pub skipped_future: usize,
    pub diagnostics: &'a [Diagnostic],
    pub rows: &'a [ReportRow],
    pub totals: &'a ReportRow,
}

/// Formats report data as JSON.
pub fn format_report_json(data: &ReportData) -> Result<String> {
    let report = JsonReport {
        generated_at: data.generated_at.to_rfc3339(),
        timezone: &data.timezone,
        done_only: data.done_only,
        processed: data.processed,
        skipped_future: data.skipped_future,
        diagnostics: &data.diagnostics,
        rows: &data.report.rows,
        totals: &data.report.totals,
    };

    Ok(serde_json::to_string_pretty(&report)?)
}

// ========== Public Interface ==========

/// Downloads or reads the calendar. Blocks on a single-threaded runtime.
fn fetch_calendar(source: &Source) -> Result<String> {
    let client = Client::new().context("failed to create HTTP client")?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to initialize tokio runtime")?;
    runtime
        .block_on(client.fetch(source))
        .context("failed to fetch calendar")
}

/// Runs the report command.
pub fn run<W: Write>(writer: &mut W, options: &ReportOptions, config: &Config) -> Result<()> {
    let locator = options
        .source
        .as_deref()
        .or(config.source.as_deref())
        .ok_or_else(|| {
            anyhow!("missing calendar source (set ICAL, HETD_SOURCE, config.toml, or --source)")
        })?;
    let source = Source::parse(locator).context("invalid calendar source")?;

    if !options.json {
        writeln!(writer, "Loading ICS calendar and calculating hours...")?;
        writeln!(writer)?;
        writeln!(writer, "Fetching calendar from: {source}")?;
    }

    let raw = fetch_calendar(&source)?;
    let components = hetd_ical::decode(&raw).context("failed to parse calendar")?;

    let now = Local::now().fixed_offset();
    if options.done && !options.json {
        writeln!(
            writer,
            "Filtering to show only past events (before {})",
            now.format("%Y-%m-%d %H:%M")
        )?;
        writeln!(writer)?;
    }

    let outcome = process(
        &components,
        ProcessOptions {
            done_only: options.done,
        },
        now,
    );
    let data = ReportData::from_outcome(outcome, options.done, now);

    if options.json {
        writeln!(writer, "{}", format_report_json(&data)?)?;
    } else {
        write!(writer, "{}", format_report(&data))?;
    }

    Ok(())
}
