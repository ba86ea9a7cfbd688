//! Command-line argument definitions.

use std::path::PathBuf;

use clap::Parser;

/// Teaching hours per course from an iCalendar timetable.
///
/// Classifies sessions as CM, TD or TP from their titles, reads the course
/// code from their descriptions, and reports hours and HETD per course.
#[derive(Debug, Parser)]
#[command(name = "hetd", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Calendar URL or .ics path (overrides configuration).
    #[arg(short, long)]
    pub source: Option<String>,

    /// Only include events that have already occurred (in the past).
    #[arg(long)]
    pub done: bool,

    /// Output the report as JSON.
    #[arg(long)]
    pub json: bool,
}
