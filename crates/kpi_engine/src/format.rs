//! Display formatters for dashboard values.
//!
//! Presentation-adjacent but load-bearing: a transient NaN or infinity
//! during a data refresh must render as a zero string, never panic or
//! leak "NaN" into the UI.

/// Insert thousands separators into a non-negative integer.
fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    let offset = digits.len() % 3;
    for (i, ch) in digits.chars().enumerate() {
        if i != 0 && (i + 3 - offset) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Israeli currency string, e.g. `₪12,500`. Rounds to the nearest whole
/// shekel; the sign sits before the glyph (`-₪1,235`). Non-finite input
/// formats as `₪0`.
pub fn format_currency(amount: f64) -> String {
    if !amount.is_finite() {
        return "₪0".to_string();
    }
    let formatted = group_thousands(amount.round().abs() as u64);
    if amount < 0.0 {
        format!("-₪{}", formatted)
    } else {
        format!("₪{}", formatted)
    }
}

/// Fixed-decimal percentage, e.g. `85.5%`. Non-finite input formats as `0%`.
pub fn format_percent(value: f64, decimals: usize) -> String {
    if !value.is_finite() {
        return "0%".to_string();
    }
    format!("{:.*}%", decimals, value)
}

/// One-decimal ratio, e.g. `3.2x`. Zero or non-finite input formats as `0x`.
pub fn format_ratio(value: f64) -> String {
    if !value.is_finite() || value == 0.0 {
        return "0x".to_string();
    }
    format!("{:.1}x", value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_currency_thousands_separator() {
        assert_eq!(format_currency(12500.0), "₪12,500");
        assert_eq!(format_currency(1234567.0), "₪1,234,567");
        assert_eq!(format_currency(999.0), "₪999");
        assert_eq!(format_currency(0.0), "₪0");
    }

    #[test]
    fn test_format_currency_rounds_to_whole() {
        assert_eq!(format_currency(1234.4), "₪1,234");
        assert_eq!(format_currency(1234.5), "₪1,235");
    }

    #[test]
    fn test_format_currency_sign_before_glyph() {
        assert_eq!(format_currency(-1234.6), "-₪1,235");
    }

    #[test]
    fn test_format_currency_non_finite() {
        assert_eq!(format_currency(f64::NAN), "₪0");
        assert_eq!(format_currency(f64::INFINITY), "₪0");
        assert_eq!(format_currency(f64::NEG_INFINITY), "₪0");
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(85.5, 1), "85.5%");
        assert_eq!(format_percent(33.333, 0), "33%");
        assert_eq!(format_percent(7.0, 2), "7.00%");
    }

    #[test]
    fn test_format_percent_non_finite() {
        assert_eq!(format_percent(f64::NAN, 1), "0%");
        assert_eq!(format_percent(f64::INFINITY, 1), "0%");
    }

    #[test]
    fn test_format_ratio() {
        assert_eq!(format_ratio(3.24), "3.2x");
        assert_eq!(format_ratio(0.0), "0x");
        assert_eq!(format_ratio(f64::NAN), "0x");
    }
}
