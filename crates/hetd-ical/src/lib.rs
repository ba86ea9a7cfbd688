//! iCalendar decoding for teaching-hours reports.
//!
//! Turns raw `.ics` text into [`hetd_core::Component`]s. Only the fields the
//! report reads are extracted from events: `SUMMARY`, `DESCRIPTION`,
//! `DTSTART` and `DTEND`.
//!
//! # Time values
//!
//! - `20250310` (or `VALUE=DATE`) → [`EventTime::Date`]
//! - `20250310T090000Z` → UTC instant
//! - `20250310T090000` with `TZID` → instant in that zone, resolved with `chrono-tz`
//! - `20250310T090000` without `TZID` → floating instant
//!
//! Values that cannot be read are dropped (the event keeps no bound) and
//! logged, since a missing bound only zeroes that event's duration.

use chrono::{NaiveDate, NaiveDateTime, TimeZone};
use hetd_core::{CalendarEvent, Component, EventTime};
use icalendar::{Calendar, CalendarComponent, Component as _, Event, Property};
use thiserror::Error;

/// Decoding errors.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The input has no `VCALENDAR` object at all.
    #[error("input is not an iCalendar document (no BEGIN:VCALENDAR)")]
    NotACalendar,
    /// The iCalendar parser rejected the input.
    #[error("malformed iCalendar data: {0}")]
    Parse(String),
}

/// Decodes an iCalendar document into its top-level components.
///
/// # Errors
///
/// Returns an error if the text is not an iCalendar document or cannot be
/// parsed.
pub fn decode(raw: &str) -> Result<Vec<Component>, DecodeError> {
    if !raw.to_ascii_uppercase().contains("BEGIN:VCALENDAR") {
        return Err(DecodeError::NotACalendar);
    }

    let calendar: Calendar = raw
        .parse::<Calendar>()
        .map_err(|err| DecodeError::Parse(err.to_string()))?;

    let components: Vec<Component> = calendar
        .components
        .iter()
        .map(|component| match component {
            CalendarComponent::Event(event) => Component::Event(convert_event(event)),
            CalendarComponent::Todo(_) => Component::Other {
                kind: "VTODO".to_string(),
            },
            CalendarComponent::Venue(_) => Component::Other {
                kind: "VVENUE".to_string(),
            },
            _ => Component::Other {
                kind: "OTHER".to_string(),
            },
        })
        .collect();

    tracing::debug!(components = components.len(), "decoded calendar");
    Ok(components)
}

fn convert_event(event: &Event) -> CalendarEvent {
    CalendarEvent {
        summary: event.get_summary().map(str::to_string),
        description: event.get_description().map(str::to_string),
        start: event.properties().get("DTSTART").and_then(parse_time_property),
        end: event.properties().get("DTEND").and_then(parse_time_property),
    }
}

fn parse_time_property(prop: &Property) -> Option<EventTime> {
    let value = prop.value().trim();
    let tzid = prop
        .params()
        .get("TZID")
        .map(|param| param.value().trim_matches('"').to_string());

    let parsed = parse_time_value(value, tzid.as_deref());
    if parsed.is_none() {
        tracing::warn!(key = prop.key(), value, "ignoring unreadable time value");
    }
    parsed
}

fn parse_time_value(value: &str, tzid: Option<&str>) -> Option<EventTime> {
    if value.len() == 8 {
        return NaiveDate::parse_from_str(value, "%Y%m%d")
            .ok()
            .map(EventTime::Date);
    }

    if let Some(utc) = value.strip_suffix('Z') {
        let wall = NaiveDateTime::parse_from_str(utc, "%Y%m%dT%H%M%S").ok()?;
        return Some(EventTime::zoned(wall.and_utc().fixed_offset()));
    }

    let wall = NaiveDateTime::parse_from_str(value, "%Y%m%dT%H%M%S").ok()?;
    Some(tzid.map_or_else(|| EventTime::floating(wall), |tzid| resolve_zone(wall, tzid)))
}

/// Places a wall-clock time in a named zone, falling back to floating.
fn resolve_zone(wall: NaiveDateTime, tzid: &str) -> EventTime {
    let Ok(tz) = tzid.parse::<chrono_tz::Tz>() else {
        tracing::warn!(tzid, "unknown time zone, treating time as floating");
        return EventTime::floating(wall);
    };

    tz.from_local_datetime(&wall).earliest().map_or_else(
        || {
            // Wall time falls in a DST gap.
            tracing::warn!(tzid, %wall, "nonexistent local time, treating time as floating");
            EventTime::floating(wall)
        },
        |at| EventTime::zoned(at.fixed_offset()),
    )
}
