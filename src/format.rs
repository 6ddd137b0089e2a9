//! Fixed-precision number rendering for display surfaces.

use crate::models::FieldValue;

/// Placeholder for values that are absent or not numeric.
pub const NO_DATA: &str = "--";

/// Render `value` with `decimal_places` digits after the point, rounding half
/// away from zero. Anything that does not parse to a finite number renders
/// as [`NO_DATA`].
pub fn format_number(value: impl Into<FieldValue>, decimal_places: usize) -> String {
    // ---
    match value.into().as_number() {
        Some(n) => format!("{:.p$}", round_to(n, decimal_places), p = decimal_places),
        None => NO_DATA.to_string(),
    }
}

/// Round half away from zero. `format!` alone rounds ties to even on the
/// binary value, which would render 0.25 as "0.2".
fn round_to(n: f64, decimal_places: usize) -> f64 {
    // ---
    let Ok(exp) = i32::try_from(decimal_places) else {
        return n;
    };
    let factor = 10f64.powi(exp);
    let scaled = (n * factor).round() / factor;
    if scaled.is_finite() {
        scaled
    } else {
        n
    }
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;

    #[test]
    fn test_format_number() {
        // ---
        assert_eq!(format_number(5.449, 1), "5.4");
        assert_eq!(format_number(5.45, 1), "5.5");
        assert_eq!(format_number(0.25, 1), "0.3");
        assert_eq!(format_number(-0.25, 1), "-0.3");
        assert_eq!(format_number(7.0, 2), "7.00");
        assert_eq!(format_number(2.5, 0), "3");
    }

    #[test]
    fn test_format_number_sentinel() {
        // ---
        assert_eq!(format_number("abc", 1), "--");
        assert_eq!(format_number(FieldValue::Null, 2), "--");
        assert_eq!(format_number(None::<f64>, 2), "--");
        assert_eq!(format_number(f64::NAN, 1), "--");
        assert_eq!(format_number("", 1), "--");
    }

    #[test]
    fn test_format_number_from_text() {
        // ---
        assert_eq!(format_number("12.346", 2), "12.35");
        assert_eq!(format_number(" 3 ", 1), "3.0");
    }

    #[test]
    fn test_format_number_text_with_trailing_units() {
        // ---
        assert_eq!(format_number("12.5 ppm", 1), "12.5");
        assert_eq!(format_number("7,5", 1), "7.0");
        assert_eq!(format_number("ppm", 1), "--");
    }

    #[test]
    fn test_format_number_rounds_scaled_value() {
        // ---
        // 0.15 is stored just below the tie; scaling by 10 lands on 1.5
        assert_eq!(format_number(0.15, 1), "0.2");
        assert_eq!(format_number(Some(61.26), 1), "61.3");
    }
}
