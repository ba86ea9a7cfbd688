//! Single pass over decoded components: filter, classify, time, aggregate.

use chrono::{DateTime, FixedOffset};

use crate::classify::{extract_category, extract_code_and_name};
use crate::{Aggregator, CalendarEvent, Component, Diagnostic, duration_hours, is_past};

/// Switches for a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProcessOptions {
    /// Only count events whose end is already past.
    pub done_only: bool,
}

/// What a run produced.
#[derive(Debug, Default)]
pub struct RunOutcome {
    /// Events that passed the time filter, classified or not.
    pub processed: usize,
    /// Events left out because they end after `now`.
    pub skipped_future: usize,
    /// Per-event problems in encounter order.
    pub diagnostics: Vec<Diagnostic>,
    pub aggregator: Aggregator,
}

/// Runs the classification pipeline over `components`.
///
/// Non-event components are ignored. `now` is only read in `done_only` mode.
pub fn process<'a, I>(components: I, options: ProcessOptions, now: DateTime<FixedOffset>) -> RunOutcome
where
    I: IntoIterator<Item = &'a Component>,
{
    let mut outcome = RunOutcome::default();

    for component in components {
        let Some(event) = component.as_event() else {
            tracing::trace!(kind = component.kind(), "ignoring non-event component");
            continue;
        };
        if options.done_only && ends_after(event, now) {
            outcome.skipped_future += 1;
            continue;
        }

        outcome.processed += 1;
        if let Err(diagnostic) = record_event(event, &mut outcome.aggregator) {
            tracing::debug!(%diagnostic, "event left out of totals");
            outcome.diagnostics.push(diagnostic);
        }
    }

    tracing::debug!(
        processed = outcome.processed,
        skipped_future = outcome.skipped_future,
        diagnostics = outcome.diagnostics.len(),
        "processed calendar"
    );
    outcome
}

/// Events without `DTEND` have nothing to compare and are kept.
fn ends_after(event: &CalendarEvent, now: DateTime<FixedOffset>) -> bool {
    event.end.as_ref().is_some_and(|end| !is_past(end, now))
}

fn record_event(event: &CalendarEvent, aggregator: &mut Aggregator) -> Result<(), Diagnostic> {
    let title = event.title();
    let description = event.description.as_deref().unwrap_or_default();

    let course = extract_code_and_name(description).ok_or_else(|| Diagnostic::missing_code(title))?;
    aggregator.remember_name(&course.code, &course.name);

    let found = extract_category(title);
    if found.ambiguous {
        return Err(Diagnostic::ambiguous_category(title));
    }
    let category = found
        .category
        .ok_or_else(|| Diagnostic::missing_category(title))?;

    let hours = duration_hours(event.start.as_ref(), event.end.as_ref());
    tracing::debug!(code = %course.code, %category, hours, "recorded event");
    aggregator.record(&course.code, &course.name, category, hours);
    Ok(())
}
