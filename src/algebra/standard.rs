//! Standard arithmetic `(+, -, ×, ÷)`.

use std::marker::PhantomData;

use num_traits::Zero;

use super::traits::Algebra;
use super::Scalar;
use crate::error::{Error, Result};

/// Ordinary arithmetic over a [`Scalar`] type.
///
/// Integer operations are checked: a zero divisor fails with
/// [`Error::DivisionByZero`] and an unrepresentable result with
/// [`Error::Overflow`]. Floating point and complex arithmetic follow IEEE
/// semantics and never fail.
///
/// # Example
///
/// ```rust
/// use sparsetensor::{Algebra, Error, Standard};
///
/// assert_eq!(Standard::<i32>::mul(&2, &3).unwrap(), 6);
/// assert!(matches!(Standard::<i32>::div(&1, &0), Err(Error::DivisionByZero)));
/// assert!(matches!(Standard::<i32>::sum(&i32::MAX, &1), Err(Error::Overflow { .. })));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Standard<T: Scalar>(PhantomData<T>);

impl<T: Scalar> Algebra for Standard<T> {
    type Elem = T;

    #[inline]
    fn zero() -> Result<T> {
        Ok(T::zero())
    }

    #[inline]
    fn unit() -> Result<T> {
        Ok(T::one())
    }

    #[inline]
    fn sum(a: &T, b: &T) -> Result<T> {
        a.checked_sum(*b).ok_or(Error::Overflow { op: "sum" })
    }

    #[inline]
    fn sub(a: &T, b: &T) -> Result<T> {
        a.checked_sub(*b).ok_or(Error::Overflow { op: "sub" })
    }

    #[inline]
    fn mul(a: &T, b: &T) -> Result<T> {
        a.checked_mul(*b).ok_or(Error::Overflow { op: "mul" })
    }

    #[inline]
    fn div(a: &T, b: &T) -> Result<T> {
        a.quotient(*b).ok_or_else(|| {
            if Zero::is_zero(b) {
                Error::DivisionByZero
            } else {
                Error::Overflow { op: "div" }
            }
        })
    }

    #[inline]
    fn abs(a: &T) -> Result<T> {
        a.magnitude().ok_or(Error::Overflow { op: "abs" })
    }

    #[inline]
    fn neg(a: &T) -> Result<T> {
        a.checked_neg().ok_or(Error::Overflow { op: "neg" })
    }

    #[inline]
    fn equals(a: &T, b: &T) -> bool {
        a == b
    }

    #[inline]
    fn is_zero(a: &T) -> bool {
        Zero::is_zero(a)
    }
}
