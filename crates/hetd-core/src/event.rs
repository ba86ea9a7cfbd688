//! Calendar components as handed over by the decoder.

use crate::EventTime;

/// A `VEVENT` reduced to the fields the report reads.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CalendarEvent {
    /// The `SUMMARY` (title).
    pub summary: Option<String>,
    /// The `DESCRIPTION`, with text escapes already resolved.
    pub description: Option<String>,
    pub start: Option<EventTime>,
    pub end: Option<EventTime>,
}

impl CalendarEvent {
    /// The title, or an empty string when the event has none.
    #[must_use]
    pub fn title(&self) -> &str {
        self.summary.as_deref().unwrap_or_default()
    }
}

/// A top-level calendar component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Component {
    Event(CalendarEvent),
    /// Any other component (`VTODO`, `VTIMEZONE`, ...), kept only for its name.
    Other { kind: String },
}

impl Component {
    /// The iCalendar component name.
    #[must_use]
    pub fn kind(&self) -> &str {
        match self {
            Self::Event(_) => "VEVENT",
            Self::Other { kind } => kind,
        }
    }

    /// The event, if this component is one.
    #[must_use]
    pub const fn as_event(&self) -> Option<&CalendarEvent> {
        match self {
            Self::Event(event) => Some(event),
            Self::Other { .. } => None,
        }
    }
}
