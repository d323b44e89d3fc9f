//! Tensor products, rank reduction and sparse contraction.
//!
//! Contraction splits both operands into slices along the contracted axes,
//! pairs up the slices whose index is stored on *both* sides, and sums the
//! tensor products of those pairs:
//!
//! ```text
//! C[i.., k..] = Σ_j  A[i.., j, ..] ⊗ B[k.., j, ..]
//!                    └── only j stored in A and B ──┘
//! ```
//!
//! The dense range of the contracted axis is never enumerated.

use std::collections::BTreeMap;

use super::{without, Body, Tensor};
use crate::algebra::Algebra;
use crate::error::{Error, Result};
use crate::sparse::{intersect, SparseElement};

impl<A: Algebra> Tensor<A> {
    /// Outer product; the result structure is `self` followed by `other`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use sparsetensor::{Standard, Tensor};
    ///
    /// let u = Tensor::<Standard<i32>>::from_flat(&[2], &[1, 2]).unwrap();
    /// let v = Tensor::<Standard<i32>>::from_flat(&[3], &[0, 1, 3]).unwrap();
    /// let uv = u.tensor_product(&v).unwrap();
    /// assert_eq!(uv.structure(), &[2, 3]);
    /// assert_eq!(uv.to_flat().unwrap(), vec![0, 1, 3, 0, 2, 6]);
    /// ```
    pub fn tensor_product(&self, other: &Self) -> Result<Self> {
        let structure: Vec<usize> = self.structure.iter().chain(&other.structure).copied().collect();
        match &self.body {
            Body::Scalar(a) => other.map_leaves(&|b: &A::Elem| A::mul(a, b)),
            Body::Vector(row) => {
                let mut children = Vec::with_capacity(row.nnz());
                for (i, a) in row.iter() {
                    children.push((i, other.map_leaves(&|b: &A::Elem| A::mul(a, b))?));
                }
                Self::from_children(structure, children)
            }
            Body::Branch(row) => {
                let mut children = Vec::with_capacity(row.nnz());
                for (i, child) in row.iter() {
                    children.push((i, child.tensor_product(other)?));
                }
                Self::from_children(structure, children)
            }
        }
    }

    /// Fix `axis` at `index`, dropping that axis.
    pub fn reduce_rank(&self, axis: usize, index: usize) -> Result<Self> {
        self.check_axis(axis)?;
        if index >= self.structure[axis] {
            return Err(Error::IndexOutOfBounds {
                index,
                size: self.structure[axis],
            });
        }
        self.reduce_unchecked(axis, index)
    }

    fn reduce_unchecked(&self, axis: usize, index: usize) -> Result<Self> {
        match (&self.body, axis) {
            (Body::Scalar(_), _) => Err(Error::InvalidDimension { dim: axis, ndim: 0 }),
            (Body::Vector(row), _) => Ok(Tensor::scalar(row.get(index).clone())),
            (Body::Branch(row), 0) => Ok(row.get(index).clone()),
            (Body::Branch(row), _) => {
                let mut children = Vec::with_capacity(row.nnz());
                for (i, child) in row.iter() {
                    children.push((i, child.reduce_unchecked(axis - 1, index)?));
                }
                Self::from_children(without(&self.structure, axis), children)
            }
        }
    }

    /// Non-empty slices along `axis`, ascending by index.
    ///
    /// Each slice is the tensor with `axis` fixed at that index.
    pub fn slices_along(&self, axis: usize) -> Result<Vec<(usize, Self)>> {
        self.check_axis(axis)?;
        Ok(self
            .slice_elements(axis)?
            .into_iter()
            .map(|e| (e.index, e.value))
            .collect())
    }

    fn slice_elements(&self, axis: usize) -> Result<Vec<SparseElement<Self>>> {
        match (&self.body, axis) {
            (Body::Scalar(_), _) => Ok(Vec::new()),
            (Body::Vector(row), _) => Ok(row
                .iter()
                .map(|(i, v)| SparseElement::new(i, Tensor::scalar(v.clone())))
                .collect()),
            (Body::Branch(row), 0) => Ok(row
                .iter()
                .map(|(i, child)| SparseElement::new(i, child.clone()))
                .collect()),
            (Body::Branch(row), _) => {
                let mut groups: BTreeMap<usize, Vec<(usize, Self)>> = BTreeMap::new();
                for (outer, child) in row.iter() {
                    for slice in child.slice_elements(axis - 1)? {
                        groups.entry(slice.index).or_default().push((outer, slice.value));
                    }
                }
                let structure = without(&self.structure, axis);
                groups
                    .into_iter()
                    .map(|(k, children)| {
                        Ok(SparseElement::new(k, Self::from_children(structure.clone(), children)?))
                    })
                    .collect()
            }
        }
    }

    /// Contract `axis1` of `self` with `axis2` of `other`.
    ///
    /// The result has rank `rank(self) + rank(other) - 2`; its structure is
    /// `self`'s remaining axes followed by `other`'s remaining axes, each in
    /// their original order. Only indices stored on both sides of the
    /// contracted axes contribute.
    ///
    /// # Example
    ///
    /// ```rust
    /// use sparsetensor::{Standard, Tensor};
    ///
    /// // [[1, 2], [3, 4]] @ [[5, 6], [7, 8]]
    /// let a = Tensor::<Standard<i64>>::from_flat(&[2, 2], &[1, 2, 3, 4]).unwrap();
    /// let b = Tensor::<Standard<i64>>::from_flat(&[2, 2], &[5, 6, 7, 8]).unwrap();
    /// let c = a.contract_top(&b, 1, 0).unwrap();
    /// assert_eq!(c.to_flat().unwrap(), vec![19, 22, 43, 50]);
    /// ```
    pub fn contract_top(&self, other: &Self, axis1: usize, axis2: usize) -> Result<Self> {
        self.check_axis(axis1)?;
        other.check_axis(axis2)?;
        let (n1, n2) = (self.structure[axis1], other.structure[axis2]);
        if n1 != n2 {
            return Err(Error::shape_mismatch(&[n1], &[n2]));
        }

        let mut structure = without(&self.structure, axis1);
        structure.extend(without(&other.structure, axis2));

        tracing::debug!(
            left = ?self.structure,
            right = ?other.structure,
            axis1,
            axis2,
            left_nnz = self.nnz(),
            right_nnz = other.nnz(),
            "contracting tensors"
        );

        let left = self.slice_elements(axis1)?;
        let right = other.slice_elements(axis2)?;
        let pairs = intersect(&left, &right);

        let mut result = Tensor::new(&structure)?;

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;

            let products = pairs
                .par_iter()
                .map(|(_, a, b)| a.tensor_product(b))
                .collect::<Result<Vec<_>>>()?;
            for product in &products {
                result.accumulate(product)?;
            }
        }

        #[cfg(not(feature = "parallel"))]
        for (_, a, b) in &pairs {
            result.accumulate(&a.tensor_product(b)?)?;
        }

        tracing::debug!(
            structure = ?result.structure,
            pairs = pairs.len(),
            nnz = result.nnz(),
            "contraction finished"
        );
        Ok(result)
    }

    /// Contract two axes of the same tensor (generalized trace).
    pub fn self_contract(&self, axis1: usize, axis2: usize) -> Result<Self> {
        self.check_axis(axis1)?;
        self.check_axis(axis2)?;
        if axis1 == axis2 {
            return Err(Error::InvalidArgument {
                arg: "axis2",
                reason: format!("cannot contract axis {} with itself", axis1),
            });
        }
        let (n1, n2) = (self.structure[axis1], self.structure[axis2]);
        if n1 != n2 {
            return Err(Error::shape_mismatch(&[n1], &[n2]));
        }

        let (lo, hi) = (axis1.min(axis2), axis1.max(axis2));
        let structure = without(&without(&self.structure, hi), lo);
        let mut result = Tensor::new(&structure)?;
        for slice in self.slice_elements(lo)? {
            let diagonal = slice.value.reduce_unchecked(hi - 1, slice.index)?;
            result.accumulate(&diagonal)?;
        }
        Ok(result)
    }

    /// Sum of the diagonal of a rank-2 tensor.
    pub fn trace(&self) -> Result<A::Elem> {
        if self.rank() != 2 {
            return Err(Error::InvalidArgument {
                arg: "tensor",
                reason: format!("trace needs rank 2, got rank {}", self.rank()),
            });
        }
        let contracted = self.self_contract(0, 1)?;
        match contracted.body {
            Body::Scalar(v) => Ok(v),
            _ => Err(Error::InvalidDimension {
                dim: 0,
                ndim: contracted.rank(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algebra::Standard;

    type T = Tensor<Standard<i64>>;

    fn t(structure: &[usize], data: &[i64]) -> T {
        T::from_flat(structure, data).unwrap()
    }

    #[test]
    fn test_tensor_product_scalar() {
        let s = T::scalar(3);
        let v = t(&[2], &[1, 2]);
        assert_eq!(s.tensor_product(&v).unwrap().to_flat().unwrap(), vec![3, 6]);
        assert_eq!(v.tensor_product(&s).unwrap().to_flat().unwrap(), vec![3, 6]);
    }

    #[test]
    fn test_reduce_rank() {
        // [[[0, 1], [2, 3]], [[4, 5], [6, 7]]]
        let a = t(&[2, 2, 2], &[0, 1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(a.reduce_rank(0, 1).unwrap().to_flat().unwrap(), vec![4, 5, 6, 7]);
        assert_eq!(a.reduce_rank(1, 0).unwrap().to_flat().unwrap(), vec![0, 1, 4, 5]);
        assert_eq!(a.reduce_rank(2, 1).unwrap().to_flat().unwrap(), vec![1, 3, 5, 7]);
        assert!(matches!(a.reduce_rank(3, 0), Err(Error::InvalidDimension { .. })));
        assert!(matches!(a.reduce_rank(0, 2), Err(Error::IndexOutOfBounds { .. })));
    }

    #[test]
    fn test_slices_along_inner_axis() {
        let a = t(&[2, 3], &[1, 0, 0, 2, 0, 3]);
        let slices = a.slices_along(1).unwrap();
        let indices: Vec<_> = slices.iter().map(|(i, _)| *i).collect();
        assert_eq!(indices, vec![0, 2]);
        assert_eq!(slices[0].1.to_flat().unwrap(), vec![1, 2]);
        assert_eq!(slices[1].1.to_flat().unwrap(), vec![0, 3]);
    }

    #[test]
    fn test_contract_vectors_to_scalar() {
        let u = t(&[3], &[1, 0, 2]);
        let v = t(&[3], &[4, 5, 6]);
        let d = u.contract_top(&v, 0, 0).unwrap();
        assert_eq!(d.rank(), 0);
        assert_eq!(d.scalar_value(), Some(&16));
    }

    #[test]
    fn test_contract_size_mismatch() {
        let a = t(&[2, 3], &[0; 6]);
        let b = t(&[2, 3], &[0; 6]);
        assert!(matches!(a.contract_top(&b, 1, 0), Err(Error::ShapeMismatch { .. })));
        assert!(matches!(a.contract_top(&b, 2, 0), Err(Error::InvalidDimension { .. })));
    }

    #[test]
    fn test_contract_outer_axes() {
        // A is 2x3, B is 2x2; contract axis 0 of both: C = Aᵀ B, shape 3x2
        let a = t(&[2, 3], &[1, 2, 3, 4, 5, 6]);
        let b = t(&[2, 2], &[1, 0, 0, 1]);
        let c = a.contract_top(&b, 0, 0).unwrap();
        assert_eq!(c.structure(), &[3, 2]);
        assert_eq!(c.to_flat().unwrap(), vec![1, 4, 2, 5, 3, 6]);
    }

    #[test]
    fn test_self_contract_and_trace() {
        let m = t(&[3, 3], &[1, 2, 3, 4, 5, 6, 7, 8, 9]);
        assert_eq!(m.trace().unwrap(), 15);

        // Partial trace over axes 0 and 2 of a 2x3x2 tensor
        let a = t(&[2, 3, 2], &[1, 0, 2, 0, 3, 0, 0, 4, 0, 5, 0, 6]);
        let r = a.self_contract(2, 0).unwrap();
        assert_eq!(r.structure(), &[3]);
        assert_eq!(r.to_flat().unwrap(), vec![5, 7, 9]);
        assert!(a.self_contract(1, 1).is_err());
    }
}
