//! Hour accumulation per course code and HETD conversion.
//!
//! # Algorithm Summary
//!
//! 1. Each classified event adds its hours to `(code, category)`
//! 2. The first non-empty display name seen for a code is kept
//! 3. `finalize` walks codes in byte order, deriving totals and HETD per
//!    code and summing the grand totals in the same pass

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::Category;

/// Label used for codes that never came with a display name.
pub const UNKNOWN_NAME: &str = "Unknown";

/// Label of the grand-total row.
pub const TOTAL_LABEL: &str = "TOTAL";

/// Hours accumulated per category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct CategoryHours {
    pub cm: f64,
    pub td: f64,
    pub tp: f64,
}

impl CategoryHours {
    /// Adds `hours` to one category.
    pub const fn add(&mut self, category: Category, hours: f64) {
        match category {
            Category::Cm => self.cm += hours,
            Category::Td => self.td += hours,
            Category::Tp => self.tp += hours,
        }
    }

    /// Hours recorded for one category.
    #[must_use]
    pub const fn get(&self, category: Category) -> f64 {
        match category {
            Category::Cm => self.cm,
            Category::Td => self.td,
            Category::Tp => self.tp,
        }
    }

    /// Plain sum of all categories.
    #[must_use]
    pub const fn total(&self) -> f64 {
        self.cm + self.td + self.tp
    }

    /// Weighted sum in HETD.
    #[must_use]
    pub fn hetd(&self) -> f64 {
        Category::ALL
            .iter()
            .map(|category| self.get(*category) * category.hetd_weight())
            .sum()
    }
}

/// Everything recorded for one course code.
///
/// Hours only ever grow; the display name is fixed by the first non-empty
/// name offered.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CodeAggregate {
    display_name: Option<String>,
    hours: CategoryHours,
}

impl CodeAggregate {
    /// First non-empty display name seen for the code.
    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    pub const fn hours(&self) -> &CategoryHours {
        &self.hours
    }

    /// Adds `hours` to one category.
    pub const fn add_hours(&mut self, category: Category, hours: f64) {
        self.hours.add(category, hours);
    }

    fn offer_name(&mut self, name: &str) {
        if self.display_name.is_none() && !name.is_empty() {
            self.display_name = Some(name.to_string());
        }
    }
}

/// One line of the summary table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    pub label: String,
    pub cm: f64,
    pub td: f64,
    pub tp: f64,
    pub total_hours: f64,
    pub total_hetd: f64,
}

impl ReportRow {
    fn new(label: String, hours: &CategoryHours) -> Self {
        Self {
            label,
            cm: hours.cm,
            td: hours.td,
            tp: hours.tp,
            total_hours: hours.total(),
            total_hetd: hours.hetd(),
        }
    }
}

/// Final summary: one row per code in code order, plus the grand total.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub rows: Vec<ReportRow>,
    pub totals: ReportRow,
}

/// Per-run accumulator of hours by code and category.
#[derive(Debug, Default)]
pub struct Aggregator {
    codes: BTreeMap<String, CodeAggregate>,
    /// Names seen for codes that have no recorded hours yet.
    pending_names: HashMap<String, String>,
}

impl Aggregator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the aggregate for `code`, creating an empty one on first sight.
    pub fn ensure(&mut self, code: &str) -> &mut CodeAggregate {
        let pending_names = &mut self.pending_names;
        self.codes.entry(code.to_string()).or_insert_with(|| {
            tracing::debug!(code, "new course code");
            CodeAggregate {
                display_name: pending_names.remove(code),
                hours: CategoryHours::default(),
            }
        })
    }

    /// Remembers a display name for `code` without recording any hours.
    ///
    /// The code only appears in the report once hours are recorded for it.
    pub fn remember_name(&mut self, code: &str, name: &str) {
        if name.is_empty() {
            return;
        }
        if let Some(aggregate) = self.codes.get_mut(code) {
            aggregate.offer_name(name);
            return;
        }
        self.pending_names
            .entry(code.to_string())
            .or_insert_with(|| name.to_string());
    }

    /// Adds one classified event to the totals.
    pub fn record(&mut self, code: &str, name: &str, category: Category, hours: f64) {
        let aggregate = self.ensure(code);
        aggregate.offer_name(name);
        aggregate.add_hours(category, hours);
    }

    /// Looks up the aggregate for `code`.
    #[must_use]
    pub fn get(&self, code: &str) -> Option<&CodeAggregate> {
        self.codes.get(code)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Builds the report rows and grand totals.
    #[must_use]
    pub fn finalize(&self) -> Report {
        let mut rows = Vec::with_capacity(self.codes.len());
        let mut grand = CategoryHours::default();
        let mut grand_hours = 0.0;
        let mut grand_hetd = 0.0;

        for (code, aggregate) in &self.codes {
            let name = aggregate.display_name.as_deref().unwrap_or(UNKNOWN_NAME);
            let row = ReportRow::new(format!("{code} - {name}"), &aggregate.hours);

            for category in Category::ALL {
                grand.add(category, aggregate.hours.get(category));
            }
            grand_hours += row.total_hours;
            grand_hetd += row.total_hetd;
            rows.push(row);
        }

        let totals = ReportRow {
            label: TOTAL_LABEL.to_string(),
            cm: grand.cm,
            td: grand.td,
            tp: grand.tp,
            total_hours: grand_hours,
            total_hetd: grand_hetd,
        };

        Report { rows, totals }
    }
}
