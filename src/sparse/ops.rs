//! Algebra-driven arithmetic on sparse rows.
//!
//! Binary operations co-iterate the two sorted element lists once, so every
//! merge runs in `O(n1 + n2)`. Results equal to the algebra's zero are
//! dropped to keep rows sparse.

use super::row::{SparseElement, SparseRow};
use crate::algebra::Algebra;
use crate::error::{Error, Result};

/// One step of a merge over two index-sorted element lists.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Merged<'a, T> {
    Left(&'a T),
    Right(&'a T),
    Both(&'a T, &'a T),
}

/// Co-iterate two ascending element lists by virtual index.
///
/// `f` decides the value kept at each index; returning `None` drops it.
pub(crate) fn merge<T, U>(
    left: &[SparseElement<T>],
    right: &[SparseElement<T>],
    mut f: impl FnMut(Merged<'_, T>) -> Result<Option<U>>,
) -> Result<Vec<SparseElement<U>>> {
    let mut out = Vec::with_capacity(left.len().max(right.len()));
    let (mut i, mut j) = (0, 0);
    while i < left.len() || j < right.len() {
        let (index, step) = match (left.get(i), right.get(j)) {
            (Some(l), Some(r)) if l.index == r.index => {
                i += 1;
                j += 1;
                (l.index, Merged::Both(&l.value, &r.value))
            }
            (Some(l), Some(r)) if l.index < r.index => {
                i += 1;
                (l.index, Merged::Left(&l.value))
            }
            (Some(l), None) => {
                i += 1;
                (l.index, Merged::Left(&l.value))
            }
            (_, Some(r)) => {
                j += 1;
                (r.index, Merged::Right(&r.value))
            }
            (None, None) => break,
        };
        if let Some(value) = f(step)? {
            out.push(SparseElement::new(index, value));
        }
    }
    Ok(out)
}

/// Pairs of values stored at the same index in both lists.
pub(crate) fn intersect<'a, T, U>(
    left: &'a [SparseElement<T>],
    right: &'a [SparseElement<U>],
) -> Vec<(usize, &'a T, &'a U)> {
    let mut out = Vec::new();
    let (mut i, mut j) = (0, 0);
    while i < left.len() && j < right.len() {
        match left[i].index.cmp(&right[j].index) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                out.push((left[i].index, &left[i].value, &right[j].value));
                i += 1;
                j += 1;
            }
        }
    }
    out
}

fn keep_nonzero<A: Algebra>(value: A::Elem) -> Option<A::Elem> {
    (!A::is_zero(&value)).then_some(value)
}

impl<T: Clone> SparseRow<T> {
    /// Absent entries are read as the algebra's zero, so the default must be
    /// that zero.
    pub(super) fn check_zero_default<A: Algebra<Elem = T>>(&self) -> Result<()> {
        if !A::is_zero(self.default_value()) {
            return Err(Error::InvalidArgument {
                arg: "default",
                reason: "row arithmetic needs a default equal to the algebra's zero".into(),
            });
        }
        Ok(())
    }

    fn check_compatible<A: Algebra<Elem = T>>(&self, other: &SparseRow<T>) -> Result<()> {
        if self.width() != other.width() {
            return Err(Error::shape_mismatch(&[self.width()], &[other.width()]));
        }
        self.check_zero_default::<A>()?;
        other.check_zero_default::<A>()
    }

    fn combine<A: Algebra<Elem = T>>(&self, other: &Self, subtract: bool) -> Result<Self> {
        self.check_compatible::<A>(other)?;
        let elements = merge(self.elements(), other.elements(), |step| {
            let value = match step {
                Merged::Left(a) => a.clone(),
                Merged::Right(b) if subtract => A::neg(b)?,
                Merged::Right(b) => b.clone(),
                Merged::Both(a, b) if subtract => A::sub(a, b)?,
                Merged::Both(a, b) => A::sum(a, b)?,
            };
            Ok(keep_nonzero::<A>(value))
        })?;
        Ok(SparseRow::from_parts(
            elements,
            self.width(),
            self.default_value().clone(),
        ))
    }

    /// Element-wise `self + other`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use sparsetensor::{SparseRow, Standard};
    ///
    /// let a = SparseRow::from_dense(&[1.0, 0.0, 2.0], 0.0);
    /// let b = SparseRow::from_dense(&[-1.0, 4.0, 0.0], 0.0);
    /// let c = a.sum::<Standard<f64>>(&b).unwrap();
    /// assert_eq!(c.to_dense(), vec![0.0, 4.0, 2.0]);
    /// assert_eq!(c.nnz(), 2);
    /// ```
    pub fn sum<A: Algebra<Elem = T>>(&self, other: &Self) -> Result<Self> {
        self.combine::<A>(other, false)
    }

    /// Element-wise `self - other`.
    pub fn sub<A: Algebra<Elem = T>>(&self, other: &Self) -> Result<Self> {
        self.combine::<A>(other, true)
    }

    /// In-place `self += other`. Leaves `self` untouched on error.
    pub fn sum_into<A: Algebra<Elem = T>>(&mut self, other: &Self) -> Result<&mut Self> {
        *self = self.sum::<A>(other)?;
        Ok(self)
    }

    /// In-place `self -= other`. Leaves `self` untouched on error.
    pub fn sub_into<A: Algebra<Elem = T>>(&mut self, other: &Self) -> Result<&mut Self> {
        *self = self.sub::<A>(other)?;
        Ok(self)
    }

    /// Dot product over indices stored in both rows.
    pub fn dot<A: Algebra<Elem = T>>(&self, other: &Self) -> Result<T> {
        self.check_compatible::<A>(other)?;
        let mut acc = A::zero()?;
        for (_, a, b) in intersect(self.elements(), other.elements()) {
            acc = A::sum(&acc, &A::mul(a, b)?)?;
        }
        Ok(acc)
    }

    /// Apply `f` to every stored value, dropping results equal to zero.
    pub(crate) fn map_values<A: Algebra<Elem = T>>(
        &self,
        f: impl Fn(&T) -> Result<T>,
    ) -> Result<Self> {
        self.check_zero_default::<A>()?;
        let mut elements = Vec::with_capacity(self.nnz());
        for (index, value) in self.iter() {
            if let Some(v) = keep_nonzero::<A>(f(value)?) {
                elements.push(SparseElement::new(index, v));
            }
        }
        Ok(SparseRow::from_parts(
            elements,
            self.width(),
            self.default_value().clone(),
        ))
    }

    /// Every value multiplied by `factor` on the right.
    pub fn scaled<A: Algebra<Elem = T>>(&self, factor: &T) -> Result<Self> {
        self.map_values::<A>(|v| A::mul(v, factor))
    }

    /// Every value negated.
    pub fn negated<A: Algebra<Elem = T>>(&self) -> Result<Self> {
        self.map_values::<A>(A::neg)
    }

    /// Sum of squares of the stored values.
    pub fn norm_squared<A: Algebra<Elem = T>>(&self) -> Result<T> {
        self.check_zero_default::<A>()?;
        let mut acc = A::zero()?;
        for (_, v) in self.iter() {
            acc = A::sum(&acc, &A::mul(v, v)?)?;
        }
        Ok(acc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algebra::{NoAlgebra, Standard};

    type F = Standard<f64>;

    #[test]
    fn test_merge_order() {
        let a = SparseRow::from_dense(&[1, 0, 3, 0], 0);
        let b = SparseRow::from_dense(&[0, 2, 3, 4], 0);
        let tags = merge(a.elements(), b.elements(), |step| {
            Ok(Some(match step {
                Merged::Left(_) => 'l',
                Merged::Right(_) => 'r',
                Merged::Both(..) => 'b',
            }))
        })
        .unwrap();
        let tags: Vec<_> = tags.into_iter().map(|e| (e.index, e.value)).collect();
        assert_eq!(tags, vec![(0, 'l'), (1, 'r'), (2, 'b'), (3, 'r')]);
    }

    #[test]
    fn test_sum_drops_cancellation() {
        let a = SparseRow::from_dense(&[1.0, 2.0, 0.0], 0.0);
        let b = SparseRow::from_dense(&[-1.0, 0.0, 5.0], 0.0);
        let c = a.sum::<F>(&b).unwrap();
        assert_eq!(c.indices().collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn test_sub_negates_right_only() {
        let a = SparseRow::from_dense(&[0.0, 2.0], 0.0);
        let b = SparseRow::from_dense(&[3.0, 2.0], 0.0);
        let c = a.sub::<F>(&b).unwrap();
        assert_eq!(c.to_dense(), vec![-3.0, 0.0]);
        assert_eq!(c.nnz(), 1);
    }

    #[test]
    fn test_width_mismatch() {
        let a = SparseRow::<f64>::new(3, 0.0);
        let b = SparseRow::<f64>::new(4, 0.0);
        assert!(matches!(a.sum::<F>(&b), Err(Error::ShapeMismatch { .. })));
        assert!(matches!(a.dot::<F>(&b), Err(Error::ShapeMismatch { .. })));
    }

    #[test]
    fn test_nonzero_default_is_rejected() {
        let a = SparseRow::from_dense(&[1.0, 2.0, 1.0], 1.0);
        let b = SparseRow::from_dense(&[1.0, -1.0, 1.0], 1.0);
        let zero = SparseRow::from_dense(&[0.0, 3.0, 0.0], 0.0);
        assert!(matches!(a.sum::<F>(&b), Err(Error::InvalidArgument { arg: "default", .. })));
        assert!(matches!(zero.sub::<F>(&a), Err(Error::InvalidArgument { .. })));
        assert!(matches!(zero.dot::<F>(&b), Err(Error::InvalidArgument { .. })));
        assert!(matches!(a.scaled::<F>(&2.0), Err(Error::InvalidArgument { .. })));
        assert!(a.negated::<F>().is_err());
        assert!(a.norm_squared::<F>().is_err());
        assert_eq!(zero.negated::<F>().unwrap().to_dense(), vec![0.0, -3.0, 0.0]);
    }

    #[test]
    fn test_dot() {
        let a = SparseRow::from_dense(&[2.0, 1.0, 3.0], 0.0);
        let b = SparseRow::from_dense(&[5.0, 2.0, 3.0], 0.0);
        let c = SparseRow::from_dense(&[0.0, 2.0, 3.0], 0.0);
        assert_eq!(a.dot::<F>(&b).unwrap(), 21.0);
        assert_eq!(a.dot::<F>(&c).unwrap(), 11.0);
    }

    #[test]
    fn test_scaled_and_norm() {
        let a = SparseRow::from_dense(&[2, 0, 3], 0);
        assert_eq!(a.scaled::<Standard<i32>>(&2).unwrap().to_dense(), vec![4, 0, 6]);
        assert!(a.scaled::<Standard<i32>>(&0).unwrap().is_empty());
        assert_eq!(a.norm_squared::<Standard<i32>>().unwrap(), 13);
    }

    #[test]
    fn test_sum_into_is_atomic() {
        let mut a = SparseRow::from_dense(&[1.0, 2.0], 0.0);
        let b = SparseRow::from_dense(&[1.0, 0.0], 0.0);
        let before = a.clone();
        assert!(a.sum_into::<NoAlgebra<f64>>(&b).is_err());
        assert_eq!(a, before);
    }
}
