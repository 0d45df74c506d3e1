//! Field-level helpers shared by the cleaners.

/// Keep only ASCII letters, digits, whitespace, hyphens and apostrophes.
pub fn remove_special_characters(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric() || c.is_whitespace() || *c == '-' || *c == '\'')
        .collect()
}

/// Drop the currency symbol, leaving thousands separators in place.
pub fn strip_currency(amount: &str) -> String {
    amount.replace('$', "")
}

/// Parse a stat count; anything that is not a non-negative number becomes 0.
///
/// Accepts float-formatted integers ("12.0") since exported stat columns
/// with blanks are often written that way.
pub fn coerce_count(value: &str) -> u32 {
    let value = value.trim();
    if let Ok(n) = value.parse::<u32>() {
        return n;
    }
    match value.parse::<f64>() {
        Ok(f) if f.is_finite() && f >= 0.0 && f <= f64::from(u32::MAX) => f.trunc() as u32,
        _ => 0,
    }
}

/// Parse a year; invalid values become `None`.
pub fn coerce_year(value: &str) -> Option<i32> {
    let value = value.trim();
    if let Ok(year) = value.parse::<i32>() {
        return Some(year);
    }
    match value.parse::<f64>() {
        Ok(f) if f.is_finite() && f.fract() == 0.0 && f.abs() <= f64::from(i32::MAX) => {
            Some(f as i32)
        }
        _ => None,
    }
}

/// Flag columns arrive as "1"/"0", "1.0"/"0.0" or "True"/"False".
pub fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "1.0" | "true" | "yes"
    )
}

pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// `made / attempted * 100` rounded to 2 decimals, 0 when nothing was attempted.
pub fn percentage(made: u32, attempted: u32) -> f64 {
    if attempted == 0 {
        return 0.0;
    }
    round_to(f64::from(made) / f64::from(attempted) * 100.0, 2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_remove_special_characters() {
        assert_eq!(remove_special_characters("Nenê"), "Nen");
        assert_eq!(remove_special_characters("J.J. Redick*"), "JJ Redick");
        assert_eq!(remove_special_characters("Karl-Anthony Towns"), "Karl-Anthony Towns");
        assert_eq!(remove_special_characters("D'Angelo Russell"), "D'Angelo Russell");
        assert_eq!(remove_special_characters("Larry Nance Jr 2"), "Larry Nance Jr 2");
        assert_eq!(remove_special_characters(""), "");
    }

    #[test]
    fn test_strip_currency_keeps_separators() {
        assert_eq!(strip_currency("$1,234,567"), "1,234,567");
        assert_eq!(strip_currency("1,000"), "1,000");
    }

    #[test]
    fn test_coerce_count() {
        assert_eq!(coerce_count("7"), 7);
        assert_eq!(coerce_count(" 12 "), 12);
        assert_eq!(coerce_count("3.0"), 3);
        assert_eq!(coerce_count(""), 0);
        assert_eq!(coerce_count("Did Not Play"), 0);
        assert_eq!(coerce_count("-4"), 0);
        assert_eq!(coerce_count("NaN"), 0);
    }

    #[test]
    fn test_coerce_year() {
        assert_eq!(coerce_year("2016"), Some(2016));
        assert_eq!(coerce_year("2016.0"), Some(2016));
        assert_eq!(coerce_year("2016.5"), None);
        assert_eq!(coerce_year("twenty"), None);
        assert_eq!(coerce_year(""), None);
    }

    #[test]
    fn test_is_truthy() {
        assert!(is_truthy("1"));
        assert!(is_truthy("True"));
        assert!(is_truthy(" 1.0 "));
        assert!(!is_truthy("0"));
        assert!(!is_truthy("False"));
        assert!(!is_truthy(""));
    }

    #[test]
    fn test_percentage_zero_attempts() {
        assert_eq!(percentage(0, 0), 0.0);
        assert!(!percentage(5, 0).is_nan());
    }

    #[test]
    fn test_percentage_rounding() {
        assert_relative_eq!(percentage(1, 3), 33.33, epsilon = 1e-9);
        assert_relative_eq!(percentage(2, 3), 66.67, epsilon = 1e-9);
        assert_relative_eq!(percentage(4, 4), 100.0, epsilon = 1e-9);
    }
}
