// Utility helpers for parsing and basic statistics.
//
// This module centralizes all the "dirty" spreadsheet text/number handling so
// the rest of the code can assume clean, typed values.
use num_format::{Locale, ToFormattedString};

/// Texts that spreadsheet exports use for "no value".
const BLANK_MARKERS: [&str; 5] = ["", "NAN", "N/A", "NA", "-"];

/// Parse a string-like value into `f64` while being forgiving about
/// formatting issues that are common in spreadsheet exports (commas, spaces, text).
///
/// - Accepts `Option<&str>` so callers can pass through optional fields.
/// - Trims whitespace.
/// - Rejects values that contain alphabetic characters (`N/A`, `nan`, `TBD`).
/// - Strips thousands separators like `","` before parsing.
/// - Returns `None` for anything that cannot be safely parsed.
pub fn parse_f64_safe(s: Option<&str>) -> Option<f64> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    if s.chars().any(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    let s = s.replace(",", "");
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// True when a cell holds nothing meaningful (empty, `nan`, `N/A`, `-`).
pub fn is_blank_text(s: &str) -> bool {
    let upper = s.trim().to_uppercase();
    BLANK_MARKERS.contains(&upper.as_str())
}

/// Collapse a raw header into a single line: embedded line breaks become
/// spaces, runs of whitespace shrink to one, ends are trimmed.
pub fn clean_header(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub fn average(v: &[f64]) -> f64 {
    // Standard arithmetic mean; returns 0 for an empty slice to avoid NaNs.
    if v.is_empty() {
        return 0.0;
    }
    let sum: f64 = v.iter().copied().sum();
    sum / v.len() as f64
}

/// Division that yields 0 instead of inf/NaN when the denominator is not positive.
pub fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}

/// Replace characters that are awkward in file names with `_`.
pub fn sanitize_file_name(name: &str) -> String {
    let cleaned: String = name
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == ' ' || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty() {
        "town".to_string()
    } else {
        cleaned
    }
}

pub fn format_number(n: f64, decimals: usize) -> String {
    // Format a floating-point value with:
    // - a fixed number of decimal places, and
    // - locale-aware thousands separators (e.g., `1,234,567.89`).
    let neg = n.is_sign_negative() && n != 0.0;
    let abs_n = n.abs();
    // First, format to a plain fixed-decimal string like `1234567.89`.
    let s = format!("{:.*}", decimals, abs_n);
    let mut parts = s.split('.');
    let int_part = parts.next().unwrap_or("0");
    let frac_part = parts.next();
    // Use `num-format` to insert commas into the integer portion.
    let int_val: i64 = int_part.parse().unwrap_or(0);
    let mut res = int_val.to_formatted_string(&Locale::en);
    if let Some(frac) = frac_part {
        if decimals > 0 {
            res.push('.');
            res.push_str(frac);
        }
    } else if decimals > 0 {
        res.push('.');
        res.push_str(&"0".repeat(decimals));
    }
    if neg {
        format!("-{}", res)
    } else {
        res
    }
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    // Thin wrapper around `num-format` for integer-like values. This is used
    // for counts in console messages (e.g., `9,855 rows loaded`).
    n.to_formatted_string(&Locale::en)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_rejects_text_markers() {
        assert_eq!(parse_f64_safe(Some("N/A")), None);
        assert_eq!(parse_f64_safe(Some("nan")), None);
        assert_eq!(parse_f64_safe(Some("  ")), None);
        assert_eq!(parse_f64_safe(None), None);
    }

    #[test]
    fn parse_strips_thousands_separators() {
        assert_eq!(parse_f64_safe(Some(" 1,250.5 ")), Some(1250.5));
        assert_eq!(parse_f64_safe(Some("-40")), Some(-40.0));
    }

    #[test]
    fn blank_markers() {
        assert!(is_blank_text(" nan "));
        assert!(is_blank_text("-"));
        assert!(is_blank_text(""));
        assert!(!is_blank_text("Closed"));
    }

    #[test]
    fn header_cleanup_joins_lines() {
        assert_eq!(clean_header("  BAL S1\nVol -\r\n Vistaar "), "BAL S1 Vol - Vistaar");
    }

    #[test]
    fn ratio_guards_zero_denominator() {
        assert_eq!(ratio(40.0, 0.0), 0.0);
        assert_eq!(ratio(40.0, 100.0), 0.4);
    }

    #[test]
    fn file_names_are_sanitized() {
        assert_eq!(sanitize_file_name("Azamgarh/East"), "Azamgarh_East");
        assert_eq!(sanitize_file_name("  "), "town");
    }

    #[test]
    fn number_formatting() {
        assert_eq!(format_number(1234567.891, 2), "1,234,567.89");
        assert_eq!(format_number(-12.5, 1), "-12.5");
        assert_eq!(format_number(0.0, 0), "0");
        assert_eq!(format_int(9855u64), "9,855");
    }
}
