//! Event time bounds, durations and the past-event check.
//!
//! Calendar feeds mix three representations: all-day dates, zone-aware
//! date-times and floating (zone-naive) date-times. They are kept apart in
//! [`EventTime`] and normalized explicitly before any subtraction or
//! comparison.

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};

/// Hours credited to an event whose bounds are date-only.
pub const ALL_DAY_HOURS: f64 = 24.0;

/// A `DTSTART`/`DTEND` value as decoded from the calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventTime {
    /// All-day value without a time of day.
    Date(NaiveDate),
    /// Date-time value. `offset` is `None` for floating times.
    Instant {
        wall: NaiveDateTime,
        offset: Option<FixedOffset>,
    },
}

impl EventTime {
    /// A zone-aware instant.
    #[must_use]
    pub fn zoned(at: DateTime<FixedOffset>) -> Self {
        Self::Instant {
            wall: at.naive_local(),
            offset: Some(*at.offset()),
        }
    }

    /// A floating (zone-naive) instant.
    #[must_use]
    pub const fn floating(wall: NaiveDateTime) -> Self {
        Self::Instant { wall, offset: None }
    }
}

/// Elapsed hours between two event bounds.
///
/// Missing bounds contribute zero. Date-only bounds count as a full day
/// regardless of the span. End-before-start yields a negative value.
#[must_use]
#[expect(
    clippy::cast_precision_loss,
    reason = "event spans are far below 2^52 seconds"
)]
pub fn duration_hours(start: Option<&EventTime>, end: Option<&EventTime>) -> f64 {
    let (Some(start), Some(end)) = (start, end) else {
        return 0.0;
    };

    match (start, end) {
        (
            EventTime::Instant {
                wall: start_wall,
                offset: start_offset,
            },
            EventTime::Instant {
                wall: end_wall,
                offset: end_offset,
            },
        ) => {
            let elapsed = match (start_offset, end_offset) {
                (Some(so), Some(eo)) => {
                    (*end_wall - utc_delta(*eo)) - (*start_wall - utc_delta(*so))
                }
                // A floating bound is read in the zone of the other one, which
                // leaves the wall-clock difference.
                _ => *end_wall - *start_wall,
            };
            elapsed.num_seconds() as f64 / 3600.0
        }
        _ => ALL_DAY_HOURS,
    }
}

/// Returns true if an event ending at `end` is over at `now`.
///
/// Zone-aware ends are compared as instants. Floating ends are compared
/// against the wall-clock reading of `now`. A date-only `DTEND` is
/// exclusive, so the event lasts until the end of the previous day.
#[must_use]
pub fn is_past(end: &EventTime, now: DateTime<FixedOffset>) -> bool {
    match end {
        EventTime::Instant {
            wall,
            offset: Some(offset),
        } => *wall - utc_delta(*offset) <= now.naive_utc(),
        EventTime::Instant { wall, offset: None } => *wall <= now.naive_local(),
        EventTime::Date(date) => last_moment_before(*date) <= now.naive_local(),
    }
}

fn utc_delta(offset: FixedOffset) -> Duration {
    Duration::seconds(i64::from(offset.local_minus_utc()))
}

/// The last representable instant of the day preceding `date`.
fn last_moment_before(date: NaiveDate) -> NaiveDateTime {
    let end_of_day = NaiveTime::from_hms_nano_opt(23, 59, 59, 999_999_999).unwrap_or_default();
    date.pred_opt().unwrap_or(date).and_time(end_of_day)
}
