//! Hour value formatting shared by every report output.

/// Formats hours with at most two decimals, dropping trailing zeros.
///
/// `4.0` → `"4"`, `4.5` → `"4.5"`, `4.333` → `"4.33"`.
pub fn format_hours(value: f64) -> String {
    let fixed = format!("{value:.2}");
    fixed.trim_end_matches('0').trim_end_matches('.').to_string()
}

/// Formats hours right-aligned in `width` columns with decimal points lined up.
///
/// Integral values are padded by three spaces (for `.XX`) and single-decimal
/// values by one, so a column of mixed values aligns on the point.
pub fn format_hours_aligned(value: f64, width: usize) -> String {
    let mut formatted = format_hours(value);
    match formatted.split_once('.') {
        None => formatted.push_str("   "),
        Some((_, decimals)) if decimals.len() == 1 => formatted.push(' '),
        Some(_) => {}
    }
    format!("{formatted:>width$}")
}
