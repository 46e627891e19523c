use super::number::{self, Number};
use super::{Exception, Val};
use crate::error;
use crate::lang::Error;
use rand::Rng;
use std::ops::Range;

type Result<T> = std::result::Result<T, Error>;

/// ## Built-in functions
///
/// Pure helpers behind the function opcodes. The runtime pops the
/// arguments, calls in here, and pushes the result.

pub struct Function {}

impl Function {
    pub fn abs(n: Number) -> Result<Number> {
        if n < number::from_int(0) {
            super::Operation::negate(n)
        } else {
            Ok(n)
        }
    }

    pub fn sgn(n: Number) -> Number {
        let zero = number::from_int(0);
        if n < zero {
            number::from_int(-1)
        } else if n > zero {
            number::from_int(1)
        } else {
            n
        }
    }

    /// `RND(n)`: an integer from 1 to n when n > 1, a fraction in
    /// 0..1 when n is 0.
    pub fn rnd<R: Rng>(rng: &mut R, n: Number) -> Result<Number> {
        if n > number::from_int(1) {
            let top = Function::floor(n) as u32;
            return Ok(rng.gen_range(1..=top) as Number);
        }
        if n == number::from_int(0) {
            return Function::fraction(rng);
        }
        Err(error!(NumberOutOfRange))
    }

    /// Seed for `RANDOMIZE n`.
    pub fn seed(n: Number) -> u64 {
        Function::floor(Function::abs(n).unwrap_or(n)) as u64
    }

    pub fn chr(n: Number) -> Result<u8> {
        match number::to_int(n) {
            Ok(code) if (0..=255).contains(&code) => Ok(code as u8),
            _ => Err(error!(IllegalQuantity)),
        }
    }

    pub fn asc(bytes: &[u8]) -> Number {
        number::from_int(bytes.first().map_or(0, |&c| c as i32))
    }

    /// Uppercase hex with an even number of digits.
    pub fn hex(n: Number) -> Result<String> {
        if n < number::from_int(0) || !number::is_integer(n) || n as f64 > u32::MAX as f64 {
            return Err(error!(IllegalQuantity));
        }
        let digits = format!("{:X}", n as u32);
        if digits.len() % 2 == 1 {
            Ok(format!("0{}", digits))
        } else {
            Ok(digits)
        }
    }

    /// Leading blanks are skipped. Text that does not start with a
    /// number is zero.
    pub fn val(bytes: &[u8]) -> Result<Number> {
        let start = bytes
            .iter()
            .position(|&c| c != b' ' && c != b'\t')
            .unwrap_or(bytes.len());
        match number::parse(&bytes[start..], true)? {
            Some((n, _)) => Ok(n),
            None => Ok(number::from_int(0)),
        }
    }

    /// `STRING$(count, fill)` where fill is a character code or a
    /// string whose first character is used.
    pub fn repeat(count: Number, fill: &Val) -> std::result::Result<Vec<u8>, Exception> {
        let count = number::to_int(count)?;
        if !(1..=255).contains(&count) {
            return Err(error!(IllegalQuantity).into());
        }
        let ch = match fill {
            Val::Number(n) => match number::to_int(*n)? {
                code @ 0..=255 => code as u8,
                _ => return Err(error!(IllegalQuantity).into()),
            },
            Val::String(s) => match s.bytes().first() {
                Some(&ch) => ch,
                None => return Err(error!(IllegalQuantity).into()),
            },
            Val::VarRef(_) => return Err(error!(WrongValueType).into()),
        };
        Ok(vec![ch; count as usize])
    }

    /// `MID$(s, pos, len)` with a one-based position.
    pub fn mid(pos: i32, len: i32) -> Result<Range<usize>> {
        if pos < 1 || len < 0 {
            return Err(error!(IllegalQuantity));
        }
        let start = pos as usize - 1;
        Ok(start..start + len as usize)
    }

    /// `MID$(s, pos)`: everything from a one-based position.
    pub fn tail(string_len: usize, pos: i32) -> Result<Range<usize>> {
        if pos < 1 {
            return Err(error!(IllegalQuantity));
        }
        Ok(pos as usize - 1..string_len)
    }

    /// `RIGHT$(s, len)`
    pub fn right(string_len: usize, len: i32) -> Result<Range<usize>> {
        if len < 0 {
            return Err(error!(IllegalQuantity));
        }
        Ok(string_len.saturating_sub(len as usize)..string_len)
    }

    pub fn change_case(bytes: &[u8], upper: bool) -> Vec<u8> {
        if upper {
            bytes.to_ascii_uppercase()
        } else {
            bytes.to_ascii_lowercase()
        }
    }
}

#[cfg(not(feature = "integer"))]
impl Function {
    fn fraction<R: Rng>(rng: &mut R) -> Result<Number> {
        Ok(rng.gen::<f64>())
    }

    fn finite(n: Number) -> Result<Number> {
        if n.is_finite() {
            Ok(n)
        } else {
            Err(error!(ArithmeticException))
        }
    }

    pub fn fix(n: Number) -> Number {
        n.trunc()
    }

    pub fn floor(n: Number) -> Number {
        n.floor()
    }

    pub fn ceil(n: Number) -> Number {
        n.ceil()
    }

    pub fn atn(n: Number) -> Result<Number> {
        Function::finite(n.atan())
    }

    pub fn cos(n: Number) -> Result<Number> {
        Function::finite(n.cos())
    }

    pub fn sin(n: Number) -> Result<Number> {
        Function::finite(n.sin())
    }

    pub fn tan(n: Number) -> Result<Number> {
        Function::finite(n.tan())
    }

    pub fn exp(n: Number) -> Result<Number> {
        Function::finite(n.exp())
    }

    pub fn log(n: Number) -> Result<Number> {
        if n == 0.0 {
            return Err(error!(DivisionByZero));
        }
        Function::finite(n.ln())
    }

    pub fn sqr(n: Number) -> Result<Number> {
        Function::finite(n.sqrt())
    }

    pub fn radians(degrees: Number) -> Result<Number> {
        Function::finite(degrees.to_radians())
    }

    pub fn degrees(radians: Number) -> Result<Number> {
        Function::finite(radians.to_degrees())
    }
}

/// Integer builds have no transcendental functions; they are syntax
/// errors.
#[cfg(feature = "integer")]
impl Function {
    fn fraction<R: Rng>(_rng: &mut R) -> Result<Number> {
        Err(error!(Syntax))
    }

    pub fn fix(n: Number) -> Number {
        n
    }

    pub fn floor(n: Number) -> Number {
        n
    }

    pub fn ceil(n: Number) -> Number {
        n
    }

    pub fn atn(_n: Number) -> Result<Number> {
        Err(error!(Syntax))
    }

    pub fn cos(_n: Number) -> Result<Number> {
        Err(error!(Syntax))
    }

    pub fn sin(_n: Number) -> Result<Number> {
        Err(error!(Syntax))
    }

    pub fn tan(_n: Number) -> Result<Number> {
        Err(error!(Syntax))
    }

    pub fn exp(_n: Number) -> Result<Number> {
        Err(error!(Syntax))
    }

    pub fn log(_n: Number) -> Result<Number> {
        Err(error!(Syntax))
    }

    pub fn sqr(_n: Number) -> Result<Number> {
        Err(error!(Syntax))
    }

    pub fn radians(_degrees: Number) -> Result<Number> {
        Err(error!(Syntax))
    }

    pub fn degrees(_radians: Number) -> Result<Number> {
        Err(error!(Syntax))
    }
}


#[cfg(all(test, not(feature = "integer")))]
mod float_tests {
    use super::*;
    use crate::lang::ErrorCode;

    #[test]
    fn test_math() {
        assert_eq!(Function::fix(-2.5), -2.0);
        assert_eq!(Function::floor(-2.5), -3.0);
        assert_eq!(Function::ceil(-2.5), -2.0);
        assert_eq!(Function::sqr(16.0), Ok(4.0));
        assert_eq!(Function::log(0.0).unwrap_err().code(), ErrorCode::DivisionByZero);
        assert_eq!(Function::sqr(-1.0).unwrap_err().code(), ErrorCode::ArithmeticException);
        assert!((Function::radians(180.0).unwrap() - std::f64::consts::PI).abs() < 1e-12);
        assert!(Function::hex(1.5).is_err());
    }
}
