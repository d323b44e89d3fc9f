//! Arithmetic strategies for sparse containers.
//!
//! Containers never call operators on their elements directly. Every
//! arithmetic step goes through an [`Algebra`], which lets the same sparse
//! row or tensor hold plain numbers, complex numbers or functions.
//!
//! - [`Standard<T>`]: ordinary `(+, -, ×, ÷)` over a [`Scalar`]
//! - [`FnAlgebra`]: pointwise arithmetic on functions of two variables, where
//!   the absent function is the zero element
//! - [`NoAlgebra<T>`]: placeholder that refuses every operation

mod function;
mod standard;
mod traits;
mod unsupported;

pub use function::{Func2, FnAlgebra};
pub use num_complex::{Complex32, Complex64};
pub use standard::Standard;
pub use traits::Algebra;
pub use unsupported::NoAlgebra;

use num_traits::Num;

/// Numeric types usable with the [`Standard`] algebra.
///
/// The checked operations return `None` when the exact result is not
/// representable. Floating point and complex types follow IEEE semantics and
/// always return `Some`.
pub trait Scalar:
    Num + std::ops::Neg<Output = Self> + Copy + Send + Sync + std::fmt::Debug + 'static
{
    /// Absolute value, expressed in the same type.
    ///
    /// For complex numbers this is the modulus on the real axis.
    fn magnitude(self) -> Option<Self>;

    /// `self + rhs`
    fn checked_sum(self, rhs: Self) -> Option<Self>;

    /// `self - rhs`
    fn checked_sub(self, rhs: Self) -> Option<Self>;

    /// `self * rhs`
    fn checked_mul(self, rhs: Self) -> Option<Self>;

    /// `-self`
    fn checked_neg(self) -> Option<Self>;

    /// Division that reports a missing inverse or an overflow as `None`.
    ///
    /// Integers return `None` for a zero divisor and for `MIN / -1`.
    fn quotient(self, rhs: Self) -> Option<Self>;
}

macro_rules! impl_scalar_ieee {
    ($t:ty, |$x:ident| $magnitude:expr) => {
        impl Scalar for $t {
            #[inline]
            fn magnitude(self) -> Option<Self> {
                let $x = self;
                Some($magnitude)
            }

            #[inline]
            fn checked_sum(self, rhs: Self) -> Option<Self> {
                Some(self + rhs)
            }

            #[inline]
            fn checked_sub(self, rhs: Self) -> Option<Self> {
                Some(self - rhs)
            }

            #[inline]
            fn checked_mul(self, rhs: Self) -> Option<Self> {
                Some(self * rhs)
            }

            #[inline]
            fn checked_neg(self) -> Option<Self> {
                Some(-self)
            }

            #[inline]
            fn quotient(self, rhs: Self) -> Option<Self> {
                Some(self / rhs)
            }
        }
    };
}

macro_rules! impl_scalar_int {
    ($($t:ty),*) => {$(
        impl Scalar for $t {
            #[inline]
            fn magnitude(self) -> Option<Self> {
                self.checked_abs()
            }

            #[inline]
            fn checked_sum(self, rhs: Self) -> Option<Self> {
                self.checked_add(rhs)
            }

            #[inline]
            fn checked_sub(self, rhs: Self) -> Option<Self> {
                <$t>::checked_sub(self, rhs)
            }

            #[inline]
            fn checked_mul(self, rhs: Self) -> Option<Self> {
                <$t>::checked_mul(self, rhs)
            }

            #[inline]
            fn checked_neg(self) -> Option<Self> {
                <$t>::checked_neg(self)
            }

            #[inline]
            fn quotient(self, rhs: Self) -> Option<Self> {
                self.checked_div(rhs)
            }
        }
    )*};
}

impl_scalar_ieee!(f32, |x| x.abs());
impl_scalar_ieee!(f64, |x| x.abs());
impl_scalar_ieee!(Complex32, |x| Complex32::new(x.norm(), 0.0));
impl_scalar_ieee!(Complex64, |x| Complex64::new(x.norm(), 0.0));
impl_scalar_int!(i32, i64);
