/// Format a number as its shortest round-trip decimal.
///
/// Integers print without a fraction (`3`, not `3.0`), negative zero prints
/// as `0`, and magnitudes at or above `1e21` (or below `1e-6`) switch to
/// exponent form such as `1e+21`.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if n == 0.0 {
        return "0".to_string();
    }

    let abs = n.abs();
    if !(1e-6..1e21).contains(&abs) {
        let exp = format!("{:e}", n);
        return match exp.split_once('e') {
            Some((mantissa, power)) if !power.starts_with('-') => {
                format!("{}e+{}", mantissa, power)
            }
            _ => exp,
        };
    }
    n.to_string()
}

/// Fixed number of decimal places (always prints trailing zeros).
pub fn fixed_decimal_string(n: f64, decimals: usize) -> String {
    format!("{:.*}", decimals, n)
}

/// A currency amount: the symbol immediately followed by two decimals.
///
/// The sign stays after the symbol (`$-5.00`).
pub fn money_string(n: f64, symbol: &str) -> String {
    format!("{}{}", symbol, fixed_decimal_string(n, 2))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number_shortest() {
        assert_eq!(format_number(3.0), "3");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(2.5), "2.5");
        assert_eq!(format_number(0.1 + 0.2), "0.30000000000000004");
        assert_eq!(format_number(1234.0), "1234");
    }

    #[test]
    fn test_format_number_exponent_forms() {
        assert_eq!(format_number(1e21), "1e+21");
        assert_eq!(format_number(1.5e-7), "1.5e-7");
    }

    #[test]
    fn test_money_string() {
        assert_eq!(money_string(75000.0, "$"), "$75000.00");
        assert_eq!(money_string(72000.75, "€"), "€72000.75");
        assert_eq!(money_string(-5.0, "$"), "$-5.00");
    }
}
