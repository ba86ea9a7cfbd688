//! Core domain logic for teaching-hours reports.
//!
//! This crate contains the fundamental types and logic for:
//! - Classification: recovering course code and session category from event text
//! - Time: durations and the past-event check across date-only and zoned bounds
//! - Aggregation: hours per code and category, converted to HETD

mod aggregate;
mod category;
pub mod classify;
mod diagnostic;
mod event;
pub mod format;
mod pipeline;
mod time;

pub use aggregate::{
    Aggregator, CategoryHours, CodeAggregate, Report, ReportRow, TOTAL_LABEL, UNKNOWN_NAME,
};
pub use category::Category;
pub use diagnostic::{Diagnostic, Severity};
pub use event::{CalendarEvent, Component};
pub use pipeline::{ProcessOptions, RunOutcome, process};
pub use time::{ALL_DAY_HOURS, EventTime, duration_hours, is_past};
