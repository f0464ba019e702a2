//! Cell conversions used by the import schemas
//!
//! Parsing is locale independent; anything that is not plain base-10 is rejected.

use chrono::NaiveDate;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).ok()
}

/// `[+-]digits[.digits]`, no exponent, no `inf`/`nan`
pub fn parse_decimal(value: &str) -> Option<f64> {
    let value = value.trim();
    let unsigned = value.strip_prefix(['+', '-']).unwrap_or(value);
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (unsigned, None),
    };

    let digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());
    if !digits(int_part) || !frac_part.map_or(true, digits) {
        return None;
    }
    if int_part.is_empty() && frac_part.map_or(true, str::is_empty) {
        return None;
    }

    value.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// `[+-]digits` fitting in `i32`
pub fn parse_integer(value: &str) -> Option<i32> {
    let value = value.trim();
    let unsigned = value.strip_prefix(['+', '-']).unwrap_or(value);
    if unsigned.is_empty() || !unsigned.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    value.parse::<i32>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date("2021-03-01"), NaiveDate::from_ymd_opt(2021, 3, 1));
        assert_eq!(parse_date("2021-02-30"), None);
        assert_eq!(parse_date("01/03/2021"), None);
        assert_eq!(parse_date(""), None);
    }

    #[test]
    fn test_parse_decimal() {
        assert_eq!(parse_decimal("4.5"), Some(4.5));
        assert_eq!(parse_decimal("12"), Some(12.0));
        assert_eq!(parse_decimal(".5"), Some(0.5));
        assert_eq!(parse_decimal("-1.0"), Some(-1.0));
        assert_eq!(parse_decimal("abc"), None);
        assert_eq!(parse_decimal("1e3"), None);
        assert_eq!(parse_decimal("inf"), None);
        assert_eq!(parse_decimal("NaN"), None);
        assert_eq!(parse_decimal("4,5"), None);
        assert_eq!(parse_decimal("."), None);
        assert_eq!(parse_decimal(""), None);
    }

    #[test]
    fn test_parse_integer() {
        assert_eq!(parse_integer("42"), Some(42));
        assert_eq!(parse_integer("-7"), Some(-7));
        assert_eq!(parse_integer("4.0"), None);
        assert_eq!(parse_integer("x"), None);
        assert_eq!(parse_integer("99999999999"), None);
    }
}
