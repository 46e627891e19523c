use super::number::Number;
use super::{Exception, Fault, StringHeap, Val};
use crate::error;
use crate::lang::Error;
use std::cmp::Ordering;

type Result<T> = std::result::Result<T, Error>;

/// ## Arithmetic and relational operators

pub struct Operation {}

#[cfg(not(feature = "integer"))]
fn finite(n: Number) -> Result<Number> {
    if n.is_finite() {
        Ok(n)
    } else {
        Err(error!(ArithmeticException))
    }
}

#[cfg(not(feature = "integer"))]
impl Operation {
    pub fn negate(n: Number) -> Result<Number> {
        Ok(-n)
    }

    pub fn sum(lhs: Number, rhs: Number) -> Result<Number> {
        finite(lhs + rhs)
    }

    pub fn subtract(lhs: Number, rhs: Number) -> Result<Number> {
        finite(lhs - rhs)
    }

    pub fn multiply(lhs: Number, rhs: Number) -> Result<Number> {
        finite(lhs * rhs)
    }

    pub fn divide(lhs: Number, rhs: Number) -> Result<Number> {
        if rhs == 0.0 {
            return Err(error!(DivisionByZero));
        }
        finite(lhs / rhs)
    }

    pub fn modulo(lhs: Number, rhs: Number) -> Result<Number> {
        if rhs == 0.0 {
            return Err(error!(DivisionByZero));
        }
        finite(lhs % rhs)
    }

    pub fn power(lhs: Number, rhs: Number) -> Result<Number> {
        if lhs == 0.0 && rhs < 0.0 {
            return Err(error!(DivisionByZero));
        }
        finite(lhs.powf(rhs))
    }
}

#[cfg(feature = "integer")]
impl Operation {
    pub fn negate(n: Number) -> Result<Number> {
        n.checked_neg().ok_or_else(|| error!(ArithmeticException))
    }

    pub fn sum(lhs: Number, rhs: Number) -> Result<Number> {
        lhs.checked_add(rhs)
            .ok_or_else(|| error!(ArithmeticException))
    }

    pub fn subtract(lhs: Number, rhs: Number) -> Result<Number> {
        lhs.checked_sub(rhs)
            .ok_or_else(|| error!(ArithmeticException))
    }

    pub fn multiply(lhs: Number, rhs: Number) -> Result<Number> {
        lhs.checked_mul(rhs)
            .ok_or_else(|| error!(ArithmeticException))
    }

    pub fn divide(lhs: Number, rhs: Number) -> Result<Number> {
        if rhs == 0 {
            return Err(error!(DivisionByZero));
        }
        lhs.checked_div(rhs)
            .ok_or_else(|| error!(ArithmeticException))
    }

    pub fn modulo(lhs: Number, rhs: Number) -> Result<Number> {
        if rhs == 0 {
            return Err(error!(DivisionByZero));
        }
        lhs.checked_rem(rhs)
            .ok_or_else(|| error!(ArithmeticException))
    }

    /// Negative exponents divide repeatedly, so only 1 and -1 survive.
    pub fn power(lhs: Number, rhs: Number) -> Result<Number> {
        if rhs < 0 {
            return match lhs {
                0 => Err(error!(DivisionByZero)),
                1 => Ok(1),
                -1 if rhs % 2 == 0 => Ok(1),
                -1 => Ok(-1),
                _ => Ok(0),
            };
        }
        lhs.checked_pow(rhs as u32)
            .ok_or_else(|| error!(ArithmeticException))
    }
}

impl Operation {
    /// Relations are numbered `= < <= <> > >=` from zero. Both sides
    /// must be numbers or both strings.
    pub fn compare(lhs: &Val, relation: i32, rhs: &Val) -> std::result::Result<bool, Exception> {
        let ordering = match (lhs, rhs) {
            (Val::Number(l), Val::Number(r)) => match l.partial_cmp(r) {
                Some(ordering) => ordering,
                None => return Ok(relation == 3),
            },
            (Val::String(l), Val::String(r)) => StringHeap::compare(l, r),
            _ => return Err(error!(WrongValueType).into()),
        };
        let result = match relation {
            0 => ordering == Ordering::Equal,
            1 => ordering == Ordering::Less,
            2 => ordering != Ordering::Greater,
            3 => ordering != Ordering::Equal,
            4 => ordering == Ordering::Greater,
            5 => ordering != Ordering::Less,
            _ => return Err(Fault::Relation.into()),
        };
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::ErrorCode;
    use crate::mach::number::from_int;

    fn n(i: i32) -> Val {
        Val::Number(from_int(i))
    }

    #[test]
    fn test_division_by_zero() {
        let e = Operation::divide(from_int(1), from_int(0)).unwrap_err();
        assert_eq!(e.code(), ErrorCode::DivisionByZero);
        let e = Operation::modulo(from_int(1), from_int(0)).unwrap_err();
        assert_eq!(e.code(), ErrorCode::DivisionByZero);
        let e = Operation::power(from_int(0), from_int(-1)).unwrap_err();
        assert_eq!(e.code(), ErrorCode::DivisionByZero);
    }

    #[test]
    fn test_modulo() {
        assert_eq!(Operation::modulo(from_int(7), from_int(3)), Ok(from_int(1)));
        assert_eq!(Operation::modulo(from_int(-7), from_int(3)), Ok(from_int(-1)));
    }

    #[test]
    fn test_power() {
        assert_eq!(Operation::power(from_int(2), from_int(10)), Ok(from_int(1024)));
        assert_eq!(Operation::power(from_int(5), from_int(0)), Ok(from_int(1)));
    }

    #[test]
    fn test_compare_numbers() {
        let expect = [
            (1, 2, [false, true, true, true, false, false]),
            (2, 2, [true, false, true, false, false, true]),
            (3, 2, [false, false, false, true, true, true]),
        ];
        for (l, r, results) in expect.iter() {
            for (relation, result) in results.iter().enumerate() {
                assert_eq!(
                    Operation::compare(&n(*l), relation as i32, &n(*r)),
                    Ok(*result),
                    "{} {} {}",
                    l,
                    relation,
                    r
                );
            }
        }
    }

    #[test]
    fn test_compare_strings() {
        let mut heap = StringHeap::new();
        let ab = Val::String(heap.alloc(b"AB"));
        let abc = Val::String(heap.alloc(b"ABC"));
        assert_eq!(Operation::compare(&ab, 1, &abc), Ok(true));
        assert_eq!(Operation::compare(&abc, 0, &abc.clone()), Ok(true));
        assert!(Operation::compare(&ab, 0, &n(1)).is_err());
        assert_eq!(
            Operation::compare(&ab, 6, &abc),
            Err(Exception::Fatal(Fault::Relation))
        );
    }
}

#[cfg(all(test, not(feature = "integer")))]
mod float_tests {
    use super::*;
    use crate::lang::ErrorCode;

    #[test]
    fn test_overflow_is_an_arithmetic_exception() {
        let e = Operation::multiply(1e300, 1e300).unwrap_err();
        assert_eq!(e.code(), ErrorCode::ArithmeticException);
        let e = Operation::power(-8.0, 0.5).unwrap_err();
        assert_eq!(e.code(), ErrorCode::ArithmeticException);
        assert_eq!(Operation::divide(1.0, 4.0), Ok(0.25));
    }
}
