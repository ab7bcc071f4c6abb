use itoa::Buffer as ItoaBuffer;
use ryu::Buffer as RyuBuffer;

/// Writes `value` in canonical decimal form: integer-valued doubles print
/// without a fractional tail, fractional doubles are trimmed of trailing
/// zeros, and exponent notation is never produced.
pub(crate) fn write_number_into(out: &mut Vec<u8>, value: f64) {
    // Normalize integer-valued floats to integers
    if value.is_finite() && value.fract() == 0.0 && value.abs() <= i64::MAX as f64 {
        write_i64(out, value as i64);
        return;
    }

    if !value.is_finite() {
        out.push(b'0');
        return;
    }

    let mut buf = RyuBuffer::new();
    let formatted = buf.format(value);
    match formatted.split_once(['e', 'E']) {
        Some((mantissa, exponent)) => expand_exponent(mantissa, exponent, out),
        None => push_trimmed_decimal(formatted, out),
    }
}

fn write_i64(out: &mut Vec<u8>, value: i64) {
    let mut buf = ItoaBuffer::new();
    out.extend_from_slice(buf.format(value).as_bytes());
}

/// Shifts the decimal point of `<mantissa>e<exponent>` into place so the
/// output stays plain decimal at any magnitude. The mantissa digits are
/// ryu's shortest representation, so reparsing the shifted text recovers
/// the same double.
fn expand_exponent(mantissa: &str, exponent: &str, out: &mut Vec<u8>) {
    let exp: i64 = exponent.parse().unwrap_or(0);
    let (sign, mantissa) = match mantissa.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", mantissa),
    };
    let (int_digits, frac_digits) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    let mut digits = String::with_capacity(int_digits.len() + frac_digits.len());
    digits.push_str(int_digits);
    digits.push_str(frac_digits);
    let point = int_digits.len() as i64 + exp;

    let mut plain = String::with_capacity(digits.len() + exp.unsigned_abs() as usize + 3);
    plain.push_str(sign);
    if point <= 0 {
        plain.push_str("0.");
        for _ in 0..-point {
            plain.push('0');
        }
        plain.push_str(&digits);
    } else if point as usize >= digits.len() {
        plain.push_str(&digits);
        for _ in digits.len()..point as usize {
            plain.push('0');
        }
    } else {
        plain.push_str(&digits[..point as usize]);
        plain.push('.');
        plain.push_str(&digits[point as usize..]);
    }
    push_trimmed_decimal(&plain, out);
}

fn push_trimmed_decimal(s: &str, out: &mut Vec<u8>) {
    if let Some((int_part, frac_part)) = s.split_once('.') {
        let trimmed = frac_part.trim_end_matches('0');
        if trimmed.is_empty() {
            out.extend_from_slice(int_part.as_bytes());
        } else {
            out.extend_from_slice(int_part.as_bytes());
            out.push(b'.');
            out.extend_from_slice(trimmed.as_bytes());
        }
    } else {
        out.extend_from_slice(s.as_bytes());
    }
}

#[cfg(test)]
mod tests {
    use std::f64;

    use super::*;

    fn format_number(value: f64) -> String {
        let mut out = Vec::new();
        write_number_into(&mut out, value);
        String::from_utf8(out).unwrap()
    }

    #[rstest::rstest]
    fn test_format_canonical_integers() {
        assert_eq!(format_number(42.0), "42");
        assert_eq!(format_number(-123.0), "-123");
        assert_eq!(format_number(0.0), "0");
        assert_eq!(format_number(-0.0), "0");
    }

    #[rstest::rstest]
    fn test_format_canonical_floats() {
        assert_eq!(format_number(1.5), "1.5");

        let result = format_number(f64::consts::PI);
        assert!(result.starts_with("3.141592653589793"));
        assert!(!result.contains('e'));
        assert!(!result.contains('E'));
    }

    #[rstest::rstest]
    fn test_large_numbers_no_exponent() {
        let result = format_number(1_000_000.0);
        assert_eq!(result, "1000000");
        assert!(!result.contains('e'));

        let result = format_number(1_000_000_000.0);
        assert_eq!(result, "1000000000");
        assert!(!result.contains('e'));
    }

    #[rstest::rstest]
    fn test_small_numbers_no_exponent() {
        let result = format_number(0.000001);
        assert!(result.starts_with("0.000001"));
        assert!(!result.contains('e'));
        assert!(!result.contains('E'));

        assert_eq!(format_number(0.001), "0.001");
    }

    #[rstest::rstest]
    fn test_tiny_magnitudes_expand_instead_of_collapsing() {
        assert_eq!(format_number(1e-300), format!("0.{}1", "0".repeat(299)));
        assert_eq!(format_number(-2.5e-20), format!("-0.{}25", "0".repeat(19)));
        assert_eq!(format_number(1e-18), format!("0.{}1", "0".repeat(17)));
    }

    #[rstest::rstest]
    fn test_huge_magnitudes_expand_instead_of_collapsing() {
        assert_eq!(format_number(1e300), format!("1{}", "0".repeat(300)));
        assert_eq!(format_number(-1.5e25), format!("-15{}", "0".repeat(24)));
    }

    #[rstest::rstest]
    fn test_non_finite_prints_zero() {
        assert_eq!(format_number(f64::NAN), "0");
        assert_eq!(format_number(f64::INFINITY), "0");
        assert_eq!(format_number(f64::NEG_INFINITY), "0");
    }
}
