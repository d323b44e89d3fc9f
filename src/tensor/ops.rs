//! Element-wise tensor arithmetic.
//!
//! Binary operations merge the two sparse structures level by level. Copy
//! variants (`sum`, `sub`, `negated`, `scaled`) never touch their inputs; the
//! `*_into` variants compute the full result before replacing the receiver,
//! so a failure leaves it unchanged.

use super::{Body, Tensor};
use crate::algebra::Algebra;
use crate::error::{Error, Result};
use crate::sparse::{merge, Merged, SparseRow};

impl<A: Algebra> Tensor<A> {
    fn check_structure(&self, other: &Self) -> Result<()> {
        if self.structure != other.structure {
            return Err(Error::shape_mismatch(&self.structure, &other.structure));
        }
        Ok(())
    }

    fn combine(&self, other: &Self, subtract: bool) -> Result<Self> {
        let body = match (&self.body, &other.body) {
            (Body::Scalar(a), Body::Scalar(b)) => Body::Scalar(if subtract {
                A::sub(a, b)?
            } else {
                A::sum(a, b)?
            }),
            (Body::Vector(a), Body::Vector(b)) => Body::Vector(if subtract {
                a.sub::<A>(b)?
            } else {
                a.sum::<A>(b)?
            }),
            (Body::Branch(a), Body::Branch(b)) => {
                let elements = merge(a.elements(), b.elements(), |step| {
                    let child = match step {
                        Merged::Left(x) => x.clone(),
                        Merged::Right(y) if subtract => y.negated()?,
                        Merged::Right(y) => y.clone(),
                        Merged::Both(x, y) => x.combine(y, subtract)?,
                    };
                    Ok((!child.is_empty()).then_some(child))
                })?;
                Body::Branch(SparseRow::from_parts(
                    elements,
                    a.width(),
                    a.default_value().clone(),
                ))
            }
            _ => return Err(Error::shape_mismatch(&self.structure, &other.structure)),
        };
        Ok(Self {
            structure: self.structure.clone(),
            body,
        })
    }

    /// Element-wise `self + other`.
    pub fn sum(&self, other: &Self) -> Result<Self> {
        self.check_structure(other)?;
        self.combine(other, false)
    }

    /// Element-wise `self - other`.
    pub fn sub(&self, other: &Self) -> Result<Self> {
        self.check_structure(other)?;
        self.combine(other, true)
    }

    /// In-place `self += other`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use sparsetensor::{Standard, Tensor};
    ///
    /// let mut a = Tensor::<Standard<f64>>::from_flat(&[2], &[1.0, 2.0]).unwrap();
    /// let b = Tensor::<Standard<f64>>::from_flat(&[2], &[-1.0, 1.0]).unwrap();
    /// a.sum_into(&b).unwrap();
    /// assert_eq!(a.nnz(), 1);
    /// assert_eq!(*a.get(&[1]).unwrap(), 3.0);
    /// ```
    pub fn sum_into(&mut self, other: &Self) -> Result<&mut Self> {
        *self = self.sum(other)?;
        Ok(self)
    }

    /// In-place `self -= other`.
    pub fn sub_into(&mut self, other: &Self) -> Result<&mut Self> {
        *self = self.sub(other)?;
        Ok(self)
    }

    /// Add `other` into `self` without staging a copy.
    ///
    /// Structures must already match. A failing algebra operation can leave
    /// `self` partially updated, so callers only use this on tensors they
    /// own privately.
    pub(crate) fn accumulate(&mut self, other: &Self) -> Result<()> {
        debug_assert_eq!(self.structure, other.structure);
        match (&mut self.body, &other.body) {
            (Body::Scalar(a), Body::Scalar(b)) => *a = A::sum(a, b)?,
            (Body::Vector(a), Body::Vector(b)) => *a = a.sum::<A>(b)?,
            (Body::Branch(a), Body::Branch(b)) => {
                for (i, child) in b.iter() {
                    if let Some(mine) = a.get_mut(i) {
                        mine.accumulate(child)?;
                        if mine.is_empty() {
                            a.remove(i);
                        }
                    } else {
                        a.put(i, child.clone());
                    }
                }
            }
            _ => return Err(Error::shape_mismatch(&self.structure, &other.structure)),
        }
        Ok(())
    }

    /// Apply `f` to every stored leaf, dropping results that become zero.
    ///
    /// A rank-0 tensor always keeps its value.
    pub(crate) fn map_leaves<F>(&self, f: &F) -> Result<Self>
    where
        F: Fn(&A::Elem) -> Result<A::Elem>,
    {
        let body = match &self.body {
            Body::Scalar(v) => Body::Scalar(f(v)?),
            Body::Vector(row) => Body::Vector(row.map_values::<A>(f)?),
            Body::Branch(row) => {
                let mut out = SparseRow::with_capacity(
                    row.width(),
                    row.default_value().clone(),
                    row.nnz(),
                );
                for (i, child) in row.iter() {
                    let mapped = child.map_leaves(f)?;
                    if !mapped.is_empty() {
                        out.push(i, mapped);
                    }
                }
                Body::Branch(out)
            }
        };
        Ok(Self {
            structure: self.structure.clone(),
            body,
        })
    }

    /// Every element negated.
    pub fn negated(&self) -> Result<Self> {
        self.map_leaves(&A::neg)
    }

    /// Negate every element in place.
    pub fn negate_into(&mut self) -> Result<&mut Self> {
        *self = self.negated()?;
        Ok(self)
    }

    /// Every element multiplied on the right by `factor`.
    pub fn scaled(&self, factor: &A::Elem) -> Result<Self> {
        self.map_leaves(&|x: &A::Elem| A::mul(x, factor))
    }

    /// Multiply every element by `factor` in place.
    pub fn scale_into(&mut self, factor: &A::Elem) -> Result<&mut Self> {
        *self = self.scaled(factor)?;
        Ok(self)
    }
}
