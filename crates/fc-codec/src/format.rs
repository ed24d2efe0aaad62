//! High-precision float formatting.

/// Format a double in the legacy high-precision layout: a sign column
/// (space for non-negative), 17 fractional digits of scientific
/// notation, and a signed two-digit exponent.
///
/// Examples: ` 2.50000000000000000e+00`, `-1.00000000000000000e-07`.
///
/// 17 fractional digits give 18 significant digits, which is enough to
/// reconstruct any finite IEEE-754 double exactly on parse.
pub fn format_float17(x: f64) -> String {
    if x.is_nan() {
        return " nan".to_string();
    }
    if x.is_infinite() {
        return if x.is_sign_positive() {
            " inf".to_string()
        } else {
            "-inf".to_string()
        };
    }
    let s = format!("{:.17e}", x);
    let (mantissa, exponent) = s.split_once('e').unwrap_or((s.as_str(), "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);
    let sign = if mantissa.starts_with('-') { "" } else { " " };
    format!("{sign}{mantissa}e{exponent:+03}")
}

/// Parse a float token, accepting the output of [`format_float17`] as
/// well as plain decimal notation, `nan`, `inf` and `-inf`.
pub fn parse_float(token: &str) -> Option<f64> {
    token.trim().parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round_trip(x: f64) -> f64 {
        parse_float(&format_float17(x)).unwrap()
    }

    #[test]
    fn test_format_layout() {
        assert_eq!(format_float17(2.5), " 2.50000000000000000e+00");
        assert_eq!(format_float17(-1.0), "-1.00000000000000000e+00");
        assert_eq!(format_float17(0.0), " 0.00000000000000000e+00");
    }

    #[test]
    fn test_large_exponents_grow_past_two_digits() {
        let text = format_float17(1e300);
        assert!(text.ends_with("e+300"), "got {text}");
        let text = format_float17(5e-324); // smallest subnormal
        assert!(text.contains("e-324"), "got {text}");
    }

    #[test]
    fn test_bit_for_bit_round_trip() {
        for x in [
            1.0 / 3.0,
            0.1,
            std::f64::consts::PI,
            1.7976931348623157e308,
            5e-324,
            -0.0,
            123456789.123456789,
        ] {
            assert_eq!(round_trip(x).to_bits(), x.to_bits(), "failed for {x}");
        }
    }

    #[test]
    fn test_non_finite() {
        assert_eq!(format_float17(f64::NAN), " nan");
        assert_eq!(format_float17(f64::INFINITY), " inf");
        assert_eq!(format_float17(f64::NEG_INFINITY), "-inf");
        assert!(parse_float(" nan").unwrap().is_nan());
        assert_eq!(parse_float(" inf"), Some(f64::INFINITY));
        assert_eq!(parse_float("-inf"), Some(f64::NEG_INFINITY));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(parse_float("1.2.3"), None);
        assert_eq!(parse_float("abc"), None);
        assert_eq!(parse_float(""), None);
    }
}
