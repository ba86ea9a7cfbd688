//! Session categories as the single source of truth for category strings.

use std::fmt;

/// Teaching session categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    /// Lecture (cours magistral).
    Cm,
    /// Directed work (travaux dirigés).
    Td,
    /// Practical work (travaux pratiques).
    Tp,
}

impl Category {
    /// All categories in report column order.
    pub const ALL: [Self; 3] = [Self::Cm, Self::Td, Self::Tp];

    /// The marker looked for in event titles, also used for display.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Cm => "CM",
            Self::Td => "TD",
            Self::Tp => "TP",
        }
    }

    /// HETD weight applied to one hour of this category.
    #[must_use]
    pub const fn hetd_weight(&self) -> f64 {
        match self {
            Self::Cm => 1.5,
            Self::Td => 1.0,
            Self::Tp => 2.0 / 3.0,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
