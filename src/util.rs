// Utility helpers for rounding, date arithmetic and display formatting.
//
// All rounding in the transformers goes through this module so the
// half-up behavior is identical for every dataset.
use chrono::NaiveDate;
use num_format::{Locale, ToFormattedString};

/// Round to the nearest integer, with halves going toward positive infinity.
///
/// `2.5 -> 3`, `-2.5 -> -2`. This is the rounding the dashboard fixtures were
/// produced with, and it differs from `f64::round` on negative halves.
pub fn round_half_up(x: f64) -> f64 {
    (x + 0.5).floor()
}

/// Round to a fixed number of decimal places (used for growth-rate style fields).
pub fn round_to(x: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (x * scale).round() / scale
}

/// Whole days between two dates; negative when `end` precedes `start`.
pub fn days_between(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days()
}

pub fn parse_date_safe(s: Option<&str>) -> Option<NaiveDate> {
    // Dates are entered as `YYYY-MM-DD`.
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

/// Parse a number typed at the console, tolerating thousands separators.
pub fn parse_f64_safe(s: Option<&str>) -> Option<f64> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    if s.chars().any(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    let s = s.replace(',', "");
    s.parse::<f64>().ok()
}

pub fn parse_usize_safe(s: Option<&str>) -> Option<usize> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    s.parse::<usize>().ok()
}

pub fn format_number(n: f64, decimals: usize) -> String {
    // Fixed decimals plus locale thousands separators, e.g. `1,234,567.89`.
    let neg = n.is_sign_negative() && n != 0.0;
    let s = format!("{:.*}", decimals, n.abs());
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
    n.to_formatted_string(&Locale::en)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_half_up_matches_dashboard_rounding() {
        assert_eq!(round_half_up(2.5), 3.0);
        assert_eq!(round_half_up(2.49), 2.0);
        assert_eq!(round_half_up(-2.5), -2.0);
        assert_eq!(round_half_up(0.0), 0.0);
    }

    #[test]
    fn round_to_one_decimal() {
        assert_eq!(round_to(78.342, 1), 78.3);
        assert_eq!(round_to(8.46, 1), 8.5);
        assert_eq!(round_to(100.0, 1), 100.0);
    }

    #[test]
    fn days_between_counts_whole_days() {
        let a = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let b = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        assert_eq!(days_between(a, b), 30);
        assert_eq!(days_between(b, a), -30);
    }

    #[test]
    fn parse_helpers_reject_garbage() {
        assert_eq!(parse_f64_safe(Some(" 12,800 ")), Some(12800.0));
        assert_eq!(parse_f64_safe(Some("abc")), None);
        assert_eq!(parse_usize_safe(Some("3")), Some(3));
        assert_eq!(parse_usize_safe(None), None);
        assert!(parse_date_safe(Some("2024-02-30")).is_none());
    }

    #[test]
    fn format_number_inserts_separators() {
        assert_eq!(format_number(1234567.891, 2), "1,234,567.89");
        assert_eq!(format_number(-8.5, 1), "-8.5");
        assert_eq!(format_int(78342), "78,342");
    }
}
