//! The core algebra trait.

use crate::error::Result;

/// A stateless arithmetic strategy over an element type.
///
/// Algebras are used at the type level: containers are generic over `A:
/// Algebra` and call its associated functions, never operators on
/// `A::Elem`. Every operation is fallible so that algebras whose elements
/// lack an inverse (or which refuse arithmetic altogether) can report it.
///
/// # Laws
///
/// | Operation | Identity |
/// |-----------|----------|
/// | `sum`     | `zero()` |
/// | `mul`     | `unit()` |
///
/// `sub(a, b)` must agree with `sum(a, neg(b))`, and `is_zero(x)` must hold
/// exactly for elements `equals` to `zero()`. Sparse containers rely on the
/// latter to decide what is stored.
///
/// # Example
///
/// ```rust
/// use sparsetensor::algebra::{Algebra, Standard};
///
/// let s = Standard::<f64>::sum(&2.0, &3.0).unwrap();
/// assert_eq!(s, 5.0);
/// assert!(Standard::<f64>::is_zero(&0.0));
/// ```
pub trait Algebra: Send + Sync + 'static {
    /// The element type this algebra operates on
    type Elem: Clone + PartialEq + std::fmt::Debug + Send + Sync;

    /// Name used in diagnostics.
    fn name() -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Additive identity.
    fn zero() -> Result<Self::Elem>;

    /// Multiplicative identity.
    fn unit() -> Result<Self::Elem>;

    /// `a + b`
    fn sum(a: &Self::Elem, b: &Self::Elem) -> Result<Self::Elem>;

    /// `a - b`
    fn sub(a: &Self::Elem, b: &Self::Elem) -> Result<Self::Elem>;

    /// `a × b`
    fn mul(a: &Self::Elem, b: &Self::Elem) -> Result<Self::Elem>;

    /// `a ÷ b`, failing with [`crate::Error::DivisionByZero`] when `b` has no
    /// inverse.
    fn div(a: &Self::Elem, b: &Self::Elem) -> Result<Self::Elem>;

    /// `|a|`
    fn abs(a: &Self::Elem) -> Result<Self::Elem>;

    /// `-a`
    fn neg(a: &Self::Elem) -> Result<Self::Elem>;

    /// Algebra-level equality.
    fn equals(a: &Self::Elem, b: &Self::Elem) -> bool;

    /// Whether `a` is the additive identity.
    fn is_zero(a: &Self::Elem) -> bool;
}
