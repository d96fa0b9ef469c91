// Utility helpers for parsing and basic statistics.
//
// This module centralizes all the "dirty" field handling so the engine
// can assume clean, typed values.
use chrono::{Datelike, Months, NaiveDate};
use num_format::{Locale, ToFormattedString};

/// Parse a string-like value into `f64` while being forgiving about
/// formatting issues that are common in exported records (commas, spaces,
/// a trailing percent sign).
///
/// - Trims whitespace.
/// - Rejects values that contain alphabetic characters.
/// - Strips thousands separators like `","` before parsing.
/// - Returns `None` for anything that cannot be safely parsed.
pub fn parse_f64_safe(s: Option<&str>) -> Option<f64> {
    let s = s?.trim();
    let s = s.strip_suffix('%').unwrap_or(s).trim();
    if s.is_empty() {
        return None;
    }
    if s.chars().any(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    let s = s.replace(",", "");
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Readiness scores are whole numbers in 0..=100. Fractions are rounded,
/// out-of-range values clamped, and anything unparseable is `None`.
pub fn parse_score_safe(s: Option<&str>) -> Option<u8> {
    parse_f64_safe(s).map(clamp_score)
}

/// Same as [`parse_score_safe`] for JSON input, which may carry the score
/// as a number or as a string.
pub fn score_from_json(v: Option<&serde_json::Value>) -> Option<u8> {
    match v? {
        serde_json::Value::Number(n) => n.as_f64().filter(|f| f.is_finite()).map(clamp_score),
        serde_json::Value::String(s) => parse_score_safe(Some(s)),
        _ => None,
    }
}

fn clamp_score(v: f64) -> u8 {
    v.round().clamp(0.0, 100.0) as u8
}

pub fn parse_date_safe(s: Option<&str>) -> Option<NaiveDate> {
    // Dates are expected in `YYYY-MM-DD` format.
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

/// Trimmed text, or `None` when blank.
pub fn non_blank(s: Option<&str>) -> Option<String> {
    let s = s?.trim();
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

pub fn average(v: &[f64]) -> f64 {
    // Standard arithmetic mean; returns 0 for an empty slice to avoid NaNs.
    if v.is_empty() {
        return 0.0;
    }
    let sum: f64 = v.iter().copied().sum();
    sum / v.len() as f64
}

/// Round half away from zero to one decimal place.
pub fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

/// Percentage of `part` in `whole`, 0 when `whole` is 0.
pub fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    part as f64 / whole as f64 * 100.0
}

/// Label for the calendar month `offset` months away from the month
/// containing `as_of` (negative offsets go back in time), e.g. `Oct 2026`.
pub fn month_label(as_of: NaiveDate, offset: i32) -> String {
    let first = as_of.with_day(1).unwrap_or(as_of);
    let shifted = if offset >= 0 {
        first.checked_add_months(Months::new(offset.unsigned_abs()))
    } else {
        first.checked_sub_months(Months::new(offset.unsigned_abs()))
    };
    shifted.unwrap_or(first).format("%b %Y").to_string()
}

pub fn format_number(n: f64, decimals: usize) -> String {
    // Format a floating-point value with:
    // - a fixed number of decimal places, and
    // - locale-aware thousands separators (e.g., `1,234,567.89`).
    let neg = n.is_sign_negative() && n != 0.0;
    let abs_n = n.abs();
    let s = format!("{:.*}", decimals, abs_n);
    let mut parts = s.split('.');
    let int_part = parts.next().unwrap_or("0");
    let frac_part = parts.next();
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
    // Thin wrapper around `num-format` for counts in console messages
    // (e.g., `1,204 projects loaded`).
    n.to_formatted_string(&Locale::en)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Some("72"), Some(72))]
    #[case(Some(" 72.6 "), Some(73))]
    #[case(Some("85%"), Some(85))]
    #[case(Some("140"), Some(100))]
    #[case(Some("-5"), Some(0))]
    #[case(Some("n/a"), None)]
    #[case(Some(""), None)]
    #[case(None, None)]
    fn scores_parse_leniently(#[case] raw: Option<&str>, #[case] expected: Option<u8>) {
        assert_eq!(parse_score_safe(raw), expected);
    }

    #[test]
    fn json_scores_accept_numbers_and_strings() {
        assert_eq!(score_from_json(Some(&serde_json::json!(64))), Some(64));
        assert_eq!(score_from_json(Some(&serde_json::json!(99.5))), Some(100));
        assert_eq!(score_from_json(Some(&serde_json::json!("41"))), Some(41));
        assert_eq!(score_from_json(Some(&serde_json::json!(true))), None);
        assert_eq!(score_from_json(Some(&serde_json::Value::Null)), None);
    }

    #[test]
    fn average_of_empty_is_zero() {
        assert_eq!(average(&[]), 0.0);
        assert_eq!(average(&[80.0, 40.0, 60.0]), 60.0);
    }

    #[test]
    fn round1_keeps_one_decimal() {
        assert_eq!(round1(70.24), 70.2);
        assert_eq!(round1(66.666), 66.7);
    }

    #[test]
    fn month_labels_cross_year_boundaries() {
        let as_of = NaiveDate::from_ymd_opt(2026, 2, 17).unwrap();
        assert_eq!(month_label(as_of, 0), "Feb 2026");
        assert_eq!(month_label(as_of, -2), "Dec 2025");
        assert_eq!(month_label(as_of, 11), "Jan 2027");
    }

    #[test]
    fn format_number_groups_thousands() {
        assert_eq!(format_number(1234567.891, 2), "1,234,567.89");
        assert_eq!(format_number(70.2, 1), "70.2");
        assert_eq!(format_number(-3.0, 0), "-3");
    }
}
