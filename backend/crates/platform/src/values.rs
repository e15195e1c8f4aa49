//! Numeric input fixing

/// Clamp `value` into `min..=max`, optionally rounding half away from zero.
///
/// `NaN` collapses to `min`.
pub fn fix_number_value(value: f64, min: f64, max: f64, round: bool) -> f64 {
    let clamped = if value.is_nan() {
        min
    } else {
        value.clamp(min, max)
    };
    if round { clamped.round() } else { clamped }
}

/// Parse a query-string number the lenient way: junk is `None`,
/// anything else is clamped into `min..=max` and rounded.
pub fn parse_number(raw: Option<&str>, min: u64, max: u64) -> Option<u64> {
    let value = raw?.trim().parse::<f64>().ok()?;
    Some(fix_number_value(value, min as f64, max as f64, true) as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamps_into_range() {
        assert_eq!(fix_number_value(-3.0, 0.0, 5.0, false), 0.0);
        assert_eq!(fix_number_value(9.5, 0.0, 5.0, false), 5.0);
        assert_eq!(fix_number_value(2.25, 0.0, 5.0, false), 2.25);
    }

    #[test]
    fn test_rounds_when_asked() {
        assert_eq!(fix_number_value(2.5, 0.0, 5.0, true), 3.0);
        assert_eq!(fix_number_value(2.49, 0.0, 5.0, true), 2.0);
        assert_eq!(fix_number_value(f64::NAN, 0.0, 5.0, true), 0.0);
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number(Some("3"), 1, 100), Some(3));
        assert_eq!(parse_number(Some(" 2.6 "), 1, 100), Some(3));
        assert_eq!(parse_number(Some("-4"), 1, 100), Some(1));
        assert_eq!(parse_number(Some("1000"), 1, 100), Some(100));
        assert_eq!(parse_number(Some("abc"), 1, 100), None);
        assert_eq!(parse_number(None, 1, 100), None);
    }
}
