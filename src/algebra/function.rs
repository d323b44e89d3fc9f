//! Pointwise arithmetic on real functions of two variables.

use std::fmt;
use std::sync::Arc;

use super::traits::Algebra;
use crate::error::{Error, Result};

/// A shared real function `f(x, y)`.
///
/// Cloning is cheap and clones compare equal; two independently built
/// functions never do, even if they compute the same values.
#[derive(Clone)]
pub struct Func2(Arc<dyn Fn(f64, f64) -> f64 + Send + Sync>);

impl Func2 {
    /// Wrap a closure.
    pub fn new(f: impl Fn(f64, f64) -> f64 + Send + Sync + 'static) -> Self {
        Func2(Arc::new(f))
    }

    /// The constant function `c`.
    pub fn constant(c: f64) -> Self {
        Func2::new(move |_, _| c)
    }

    /// Evaluate at `(x, y)`.
    #[inline]
    pub fn eval(&self, x: f64, y: f64) -> f64 {
        (self.0)(x, y)
    }

    fn combine(&self, other: &Func2, op: fn(f64, f64) -> f64) -> Func2 {
        let (f, g) = (self.clone(), other.clone());
        Func2::new(move |x, y| op(f.eval(x, y), g.eval(x, y)))
    }

    fn map(&self, op: fn(f64) -> f64) -> Func2 {
        let f = self.clone();
        Func2::new(move |x, y| op(f.eval(x, y)))
    }
}

impl PartialEq for Func2 {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Func2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Func2")
            .field(&Arc::as_ptr(&self.0).cast::<()>())
            .finish()
    }
}

/// Algebra over optional functions.
///
/// `None` is the zero element: it is the identity for `sum`/`sub` and
/// absorbs `mul`. Dividing by `None` fails with [`Error::DivisionByZero`].
///
/// # Example
///
/// ```rust
/// use sparsetensor::algebra::{Algebra, FnAlgebra, Func2};
///
/// let f = Some(Func2::new(|x, y| x + y));
/// let g = FnAlgebra::mul(&f, &FnAlgebra::unit().unwrap()).unwrap();
/// assert_eq!(g.unwrap().eval(1.0, 2.0), 3.0);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct FnAlgebra;

type MaybeFn = Option<Func2>;

impl Algebra for FnAlgebra {
    type Elem = MaybeFn;

    fn name() -> &'static str {
        "FnAlgebra"
    }

    fn zero() -> Result<MaybeFn> {
        Ok(None)
    }

    fn unit() -> Result<MaybeFn> {
        Ok(Some(Func2::constant(1.0)))
    }

    fn sum(a: &MaybeFn, b: &MaybeFn) -> Result<MaybeFn> {
        Ok(match (a, b) {
            (Some(f), Some(g)) => Some(f.combine(g, |u, v| u + v)),
            (Some(f), None) | (None, Some(f)) => Some(f.clone()),
            (None, None) => None,
        })
    }

    fn sub(a: &MaybeFn, b: &MaybeFn) -> Result<MaybeFn> {
        Ok(match (a, b) {
            (Some(f), Some(g)) => Some(f.combine(g, |u, v| u - v)),
            (Some(f), None) => Some(f.clone()),
            (None, Some(g)) => Some(g.map(|u| -u)),
            (None, None) => None,
        })
    }

    fn mul(a: &MaybeFn, b: &MaybeFn) -> Result<MaybeFn> {
        Ok(match (a, b) {
            (Some(f), Some(g)) => Some(f.combine(g, |u, v| u * v)),
            _ => None,
        })
    }

    fn div(a: &MaybeFn, b: &MaybeFn) -> Result<MaybeFn> {
        match (a, b) {
            (_, None) => Err(Error::DivisionByZero),
            (None, Some(_)) => Ok(None),
            (Some(f), Some(g)) => Ok(Some(f.combine(g, |u, v| u / v))),
        }
    }

    fn abs(a: &MaybeFn) -> Result<MaybeFn> {
        Ok(a.as_ref().map(|f| f.map(f64::abs)))
    }

    fn neg(a: &MaybeFn) -> Result<MaybeFn> {
        Ok(a.as_ref().map(|f| f.map(|u| -u)))
    }

    fn equals(a: &MaybeFn, b: &MaybeFn) -> bool {
        a == b
    }

    fn is_zero(a: &MaybeFn) -> bool {
        a.is_none()
    }
}
