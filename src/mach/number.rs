//! BASIC numbers: conversion, parsing and printing.
//!
//! Numbers are `f64` unless the crate is built with the `integer`
//! feature, in which case they are `i32`.

use crate::error;
use crate::lang::Error;

type Result<T> = std::result::Result<T, Error>;

#[cfg(not(feature = "integer"))]
pub type Number = f64;

#[cfg(feature = "integer")]
pub type Number = i32;

#[cfg(not(feature = "integer"))]
pub fn from_int(i: i32) -> Number {
    i as f64
}

#[cfg(feature = "integer")]
pub fn from_int(i: i32) -> Number {
    i
}

#[cfg(not(feature = "integer"))]
pub fn is_integer(n: Number) -> bool {
    n.is_finite() && n.trunc() == n
}

#[cfg(feature = "integer")]
pub fn is_integer(_n: Number) -> bool {
    true
}

/// Exact conversion to a machine integer. Fractions are illegal.
#[cfg(not(feature = "integer"))]
pub fn to_int(n: Number) -> Result<i32> {
    if !is_integer(n) || n < i32::MIN as f64 || n > i32::MAX as f64 {
        return Err(error!(IllegalQuantity));
    }
    Ok(n as i32)
}

#[cfg(feature = "integer")]
pub fn to_int(n: Number) -> Result<i32> {
    Ok(n)
}

/// Parse a number at the start of `bytes`. Returns the value and how
/// many bytes it used, or `None` if no number is there. A leading sign
/// is only accepted when `signed` is set.
#[cfg(not(feature = "integer"))]
pub fn parse(bytes: &[u8], signed: bool) -> Result<Option<(Number, usize)>> {
    let digits = |from: usize| {
        bytes[from..]
            .iter()
            .take_while(|c| c.is_ascii_digit())
            .count()
    };
    let mut len = 0;
    if signed && matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        len += 1;
    }
    let whole = digits(len);
    len += whole;
    let mut fraction = 0;
    if bytes.get(len) == Some(&b'.') {
        fraction = digits(len + 1);
        len += 1 + fraction;
    }
    if whole == 0 && fraction == 0 {
        return Ok(None);
    }
    if matches!(bytes.get(len), Some(b'E') | Some(b'e')) {
        let mut exp = len + 1;
        if matches!(bytes.get(exp), Some(b'+') | Some(b'-')) {
            exp += 1;
        }
        let exp_digits = digits(exp);
        if exp_digits > 0 {
            len = exp + exp_digits;
        }
    }
    let text = std::str::from_utf8(&bytes[..len]).map_err(|_| error!(IllegalQuantity))?;
    match text.parse::<f64>() {
        Ok(n) if n.is_finite() => Ok(Some((n, len))),
        _ => Err(error!(IllegalQuantity)),
    }
}

#[cfg(feature = "integer")]
pub fn parse(bytes: &[u8], signed: bool) -> Result<Option<(Number, usize)>> {
    let mut len = 0;
    let mut negative = false;
    if signed {
        match bytes.first() {
            Some(b'-') => {
                negative = true;
                len += 1;
            }
            Some(b'+') => len += 1,
            _ => {}
        }
    }
    let start = len;
    let mut val: i64 = 0;
    while let Some(c) = bytes.get(len).filter(|c| c.is_ascii_digit()) {
        val = val * 10 + (c - b'0') as i64;
        if val > i32::MAX as i64 + 1 {
            return Err(error!(IllegalQuantity));
        }
        len += 1;
    }
    if len == start {
        return Ok(None);
    }
    if negative {
        val = -val;
    }
    if val > i32::MAX as i64 {
        return Err(error!(IllegalQuantity));
    }
    Ok(Some((val as i32, len)))
}

/// Formats like C's `%.9G`, switching to `%.8E` for tiny magnitudes.
#[cfg(not(feature = "integer"))]
pub fn format(n: Number) -> String {
    let abs = n.abs();
    if abs > 0.0 && abs < 0.01 {
        let sci = format!("{:.8e}", n);
        return exponent_form(&sci, false);
    }
    format_general(n, 9)
}

#[cfg(feature = "integer")]
pub fn format(n: Number) -> String {
    n.to_string()
}

#[cfg(not(feature = "integer"))]
fn format_general(n: f64, precision: usize) -> String {
    if n == 0.0 {
        return "0".to_string();
    }
    if !n.is_finite() {
        return if n.is_nan() {
            "NAN".to_string()
        } else if n < 0.0 {
            "-INF".to_string()
        } else {
            "INF".to_string()
        };
    }
    let sci = format!("{:.*e}", precision - 1, n);
    let exp = sci
        .split_once('e')
        .and_then(|(_, e)| e.parse::<i32>().ok())
        .unwrap_or(0);
    if exp < -4 || exp >= precision as i32 {
        exponent_form(&sci, true)
    } else {
        let decimals = (precision as i32 - 1 - exp) as usize;
        strip_zeros(&format!("{:.*}", decimals, n)).to_string()
    }
}

/// Rewrites Rust's `1.5e-3` as C's `1.5E-03`.
#[cfg(not(feature = "integer"))]
fn exponent_form(sci: &str, strip: bool) -> String {
    let (mantissa, exp) = sci.split_once('e').unwrap_or((sci, "0"));
    let exp: i32 = exp.parse().unwrap_or(0);
    let mantissa = if strip { strip_zeros(mantissa) } else { mantissa };
    let sign = if exp < 0 { '-' } else { '+' };
    format!("{}E{}{:02}", mantissa, sign, exp.abs())
}

#[cfg(not(feature = "integer"))]
fn strip_zeros(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

#[cfg(all(test, not(feature = "integer")))]
mod tests {
    use super::*;

    #[test]
    fn test_format() {
        let a = 1.123456789123456789;
        assert_eq!(format(a), "1.12345679");
        assert_eq!(format(a / 10.0), "0.112345679");
        assert_eq!(format(a / 100.0), "0.0112345679");
        assert_eq!(format(a / 1000.0), "1.12345679E-03");
        assert_eq!(format(a * 100.0), "112.345679");
        assert_eq!(format(a * 100000000.0), "112345679");
        assert_eq!(format(a * 1000000000.0), "1.12345679E+09");
        assert_eq!(format(0.0), "0");
        assert_eq!(format(-3.0), "-3");
        assert_eq!(format(2.5), "2.5");
        assert_eq!(format(10.0), "10");
    }

    #[test]
    fn test_parse() {
        assert_eq!(parse(b"12 TO", false), Ok(Some((12.0, 2))));
        assert_eq!(parse(b"1.5E3+", false), Ok(Some((1500.0, 5))));
        assert_eq!(parse(b"1ELSE", false), Ok(Some((1.0, 1))));
        assert_eq!(parse(b".5", false), Ok(Some((0.5, 2))));
        assert_eq!(parse(b"-5", false), Ok(None));
        assert_eq!(parse(b"-5", true), Ok(Some((-5.0, 2))));
        assert_eq!(parse(b"X", true), Ok(None));
        assert_eq!(parse(b".", false), Ok(None));
        assert!(parse(b"1E999", false).is_err());
    }

    #[test]
    fn test_to_int() {
        assert_eq!(to_int(42.0), Ok(42));
        assert_eq!(to_int(-7.0), Ok(-7));
        assert!(to_int(1.5).is_err());
        assert!(to_int(1e20).is_err());
    }
}
