//! Recovering a (course code, category) key from free-text event fields.
//!
//! The feed embeds the course as `CODE - Display name` somewhere from the
//! fifth description line on, and the session type as a `CM`/`TD`/`TP`
//! marker in the title. Both are matched with narrow heuristics that
//! return `None` instead of failing.

use std::sync::LazyLock;

use regex::Regex;

use crate::Category;

/// First description line (0-based) that may hold the course code.
const CODE_LINE_INDEX: usize = 4;

/// Pre-compiled pattern for `CODE - Display name` lines.
static CODE_LINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Z0-9]+)\s*-\s*(.+)$").unwrap());

/// A course code with its display name, as found in an event description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseRef {
    pub code: String,
    pub name: String,
}

/// Outcome of looking for a category marker in an event title.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryMatch {
    pub category: Option<Category>,
    /// More than one marker was present.
    pub ambiguous: bool,
}

/// Extracts the course code and display name from an event description.
///
/// Needs at least five lines. Scans from the fifth line on for the first
/// line with one or two hyphens and matches only that line.
pub fn extract_code_and_name(description: &str) -> Option<CourseRef> {
    let lines: Vec<&str> = description.split('\n').collect();
    if lines.len() <= CODE_LINE_INDEX {
        return None;
    }

    let candidate = lines[CODE_LINE_INDEX..]
        .iter()
        .find(|line| matches!(line.matches('-').count(), 1 | 2))?
        .trim();

    let caps = CODE_LINE_RE.captures(candidate)?;
    Some(CourseRef {
        code: caps[1].to_string(),
        name: caps[2].trim().to_string(),
    })
}

/// Looks for category markers in an event title.
///
/// Markers are plain substrings, so `"TPX"` counts as `TP`. Titles with
/// several markers are reported as ambiguous rather than resolved.
pub fn extract_category(title: &str) -> CategoryMatch {
    let mut found = Category::ALL
        .into_iter()
        .filter(|category| title.contains(category.as_str()));

    match (found.next(), found.next()) {
        (None, _) => CategoryMatch {
            category: None,
            ambiguous: false,
        },
        (Some(category), None) => CategoryMatch {
            category: Some(category),
            ambiguous: false,
        },
        (Some(_), Some(_)) => CategoryMatch {
            category: None,
            ambiguous: true,
        },
    }
}
