//! Lenient number extraction from messy cell text.
//!
//! Cleaning stages and statistics share one rule for "the number in this
//! cell": drop everything except digits, `.` and `-`, then read the longest
//! leading float. That makes `"$1,200.50"` read as `1200.5` and `"12-3"` read
//! as `12`.

/// Keep only ASCII digits, `.` and `-`.
pub fn strip_non_numeric(cell: &str) -> String {
    cell.chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect()
}

/// Parse the longest leading float literal of `s`.
///
/// Accepts optional leading whitespace, a sign, digits with at most one
/// decimal point, and an optional exponent. Returns `None` when no digit is
/// found before anything else.
pub fn parse_float_prefix(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0usize;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }

    let mut mantissa_digits = 0usize;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
        mantissa_digits += 1;
    }
    if end < bytes.len() && bytes[end] == b'.' {
        let mut frac_end = end + 1;
        let mut frac_digits = 0usize;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
            frac_digits += 1;
        }
        if mantissa_digits > 0 || frac_digits > 0 {
            end = if frac_digits > 0 { frac_end } else { end };
            mantissa_digits += frac_digits;
        }
    }
    if mantissa_digits == 0 {
        return None;
    }

    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && matches!(bytes[exp_end], b'+' | b'-') {
            exp_end += 1;
        }
        let digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > digits_start {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().ok().filter(|n| n.is_finite())
}

/// The number a non-blank cell carries, using the strip-then-prefix rule.
pub fn numeric_value(cell: &str) -> Option<f64> {
    if cell.trim().is_empty() {
        return None;
    }
    parse_float_prefix(&strip_non_numeric(cell))
}

/// True when the whole trimmed cell is a finite number (`"42"`, `"-1.5"`).
pub fn is_plain_number(cell: &str) -> bool {
    plain_number(cell).is_some()
}

/// Parse a cell that is nothing but a finite number.
pub fn plain_number(cell: &str) -> Option<f64> {
    let trimmed = cell.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_float_prefix_reads_leading_number() {
        assert_eq!(parse_float_prefix("12.5abc"), Some(12.5));
        assert_eq!(parse_float_prefix("-3"), Some(-3.0));
        assert_eq!(parse_float_prefix(".5"), Some(0.5));
        assert_eq!(parse_float_prefix("7."), Some(7.0));
        assert_eq!(parse_float_prefix("1.2.3"), Some(1.2));
        assert_eq!(parse_float_prefix("12-3"), Some(12.0));
        assert_eq!(parse_float_prefix("2e3x"), Some(2000.0));
        assert_eq!(parse_float_prefix("2e"), Some(2.0));
    }

    #[test]
    fn test_parse_float_prefix_rejects_non_numbers() {
        assert_eq!(parse_float_prefix(""), None);
        assert_eq!(parse_float_prefix("-"), None);
        assert_eq!(parse_float_prefix("."), None);
        assert_eq!(parse_float_prefix("abc"), None);
        assert_eq!(parse_float_prefix("--5"), None);
    }

    #[test]
    fn test_numeric_value_strips_formatting() {
        assert_eq!(numeric_value("$1,200.50"), Some(1200.5));
        assert_eq!(numeric_value("€-5"), Some(-5.0));
        assert_eq!(numeric_value("1000 [OUTLIER]"), Some(1000.0));
        assert_eq!(numeric_value("   "), None);
        assert_eq!(numeric_value("n/a"), None);
    }

    #[test]
    fn test_plain_number() {
        assert!(is_plain_number(" 42 "));
        assert!(is_plain_number("-1.5"));
        assert!(!is_plain_number("$5"));
        assert!(!is_plain_number("1,000"));
        assert!(!is_plain_number("inf"));
        assert!(!is_plain_number(""));
    }
}
