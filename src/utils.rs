use crate::config::PLACEHOLDER;

/// Parse the raw text of a numeric form field.
///
/// Empty (or whitespace-only) text and anything that does not parse to a
/// finite number is treated as "no value", never as an error.
///
/// # Examples
/// ```
/// use rc_gear_ratio::utils::parse_input_number;
/// assert_eq!(parse_input_number(" 88 "), Some(88.0));
/// assert_eq!(parse_input_number(""), None);
/// assert_eq!(parse_input_number("inf"), None);
/// ```
pub fn parse_input_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Present, finite and strictly positive.
#[inline]
pub fn is_positive(value: Option<f64>) -> bool {
    matches!(value, Some(v) if v.is_finite() && v > 0.0)
}

/// Keep a value only when it passes [`is_positive`].
#[inline]
pub fn positive(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v > 0.0)
}

/// Render an output field: fixed fractional digits, or the placeholder when
/// the value is absent or not finite.
pub fn format_output(value: Option<f64>, digits: u32) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{:.*}", digits as usize, v),
        _ => PLACEHOLDER.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_rejects_garbage_and_blanks() {
        assert_eq!(parse_input_number("   "), None);
        assert_eq!(parse_input_number("abc"), None);
        assert_eq!(parse_input_number("NaN"), None);
        assert_eq!(parse_input_number("2.58"), Some(2.58));
        assert_eq!(parse_input_number("-4"), Some(-4.0));
    }

    #[test]
    fn zero_is_present_but_not_positive() {
        let zero = parse_input_number("0");
        assert_eq!(zero, Some(0.0));
        assert!(!is_positive(zero));
        assert_eq!(positive(zero), None);
        assert!(is_positive(Some(0.001)));
    }

    #[test]
    fn format_uses_placeholder_for_missing() {
        assert_eq!(format_output(None, 3), "--");
        assert_eq!(format_output(Some(f64::NAN), 3), "--");
        assert_eq!(format_output(Some(6.45), 3), "6.450");
        assert_eq!(format_output(Some(21000.0), 0), "21000");
    }
}
