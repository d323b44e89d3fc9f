//! Placeholder algebra that rejects every arithmetic operation.

use std::marker::PhantomData;

use super::traits::Algebra;
use crate::error::{Error, Result};

/// An algebra for containers that are never supposed to do arithmetic.
///
/// Every operation, including the identities, fails with
/// [`Error::NotSupported`]. The predicates fall back to `PartialEq` and
/// `Default`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAlgebra<T>(PhantomData<T>);

fn refuse<T>(op: &'static str) -> Result<T> {
    Err(Error::NotSupported {
        op,
        algebra: "NoAlgebra",
    })
}

impl<T> Algebra for NoAlgebra<T>
where
    T: Clone + PartialEq + Default + std::fmt::Debug + Send + Sync + 'static,
{
    type Elem = T;

    fn name() -> &'static str {
        "NoAlgebra"
    }

    fn zero() -> Result<T> {
        refuse("zero")
    }

    fn unit() -> Result<T> {
        refuse("unit")
    }

    fn sum(_: &T, _: &T) -> Result<T> {
        refuse("sum")
    }

    fn sub(_: &T, _: &T) -> Result<T> {
        refuse("sub")
    }

    fn mul(_: &T, _: &T) -> Result<T> {
        refuse("mul")
    }

    fn div(_: &T, _: &T) -> Result<T> {
        refuse("div")
    }

    fn abs(_: &T) -> Result<T> {
        refuse("abs")
    }

    fn neg(_: &T) -> Result<T> {
        refuse("neg")
    }

    fn equals(a: &T, b: &T) -> bool {
        a == b
    }

    fn is_zero(a: &T) -> bool {
        *a == T::default()
    }
}
