//! Recursive sparse tensor generic over an algebra.
//!
//! A rank-1 [`Tensor`] is a [`SparseRow`] of elements; a rank-r tensor is a
//! [`SparseRow`] of rank-(r−1) tensors. Only non-zero leaves and non-empty
//! subtensors are stored, so memory scales with the number of non-zeros.
//!
//! - [`ops`]: element-wise sum, subtraction, negation, scaling
//! - [`contract`]: tensor product, rank reduction, contraction

mod contract;
#[cfg(feature = "dense")]
mod dense;
mod ops;

use std::fmt;

use crate::algebra::Algebra;
use crate::error::{Error, Result};
use crate::sparse::SparseRow;

/// Initial capacity of each stored row.
const ROW_CAPACITY: usize = 6;

/// A sparse tensor of arbitrary rank over the algebra `A`.
///
/// The `structure` lists the declared size of each axis, outermost first.
/// Every stored subtensor has the structure of its parent with the first
/// axis removed, and no stored subtensor is empty.
///
/// # Type Parameters
///
/// * `A` - The algebra driving all arithmetic on elements
///
/// # Example
///
/// ```rust
/// use sparsetensor::{Standard, Tensor};
///
/// let mut t = Tensor::<Standard<f64>>::new(&[2, 3]).unwrap();
/// t.set(&[1, 2], 4.0).unwrap();
/// assert_eq!(*t.get(&[1, 2]).unwrap(), 4.0);
/// assert_eq!(*t.get(&[0, 0]).unwrap(), 0.0);
/// assert_eq!(t.nnz(), 1);
///
/// t.set(&[1, 2], 0.0).unwrap(); // zero writes remove the entry
/// assert!(t.is_empty());
/// ```
pub struct Tensor<A: Algebra> {
    structure: Vec<usize>,
    body: Body<A>,
}

/// Storage of one tensor level.
pub(crate) enum Body<A: Algebra> {
    /// Rank 0
    Scalar(A::Elem),
    /// Rank 1
    Vector(SparseRow<A::Elem>),
    /// Rank 2 and above
    Branch(SparseRow<Tensor<A>>),
}

impl<A: Algebra> Clone for Body<A> {
    fn clone(&self) -> Self {
        match self {
            Body::Scalar(v) => Body::Scalar(v.clone()),
            Body::Vector(row) => Body::Vector(row.clone()),
            Body::Branch(row) => Body::Branch(row.clone()),
        }
    }
}

impl<A: Algebra> Clone for Tensor<A> {
    fn clone(&self) -> Self {
        Self {
            structure: self.structure.clone(),
            body: self.body.clone(),
        }
    }
}

impl<A: Algebra> Tensor<A> {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// Create an empty tensor with the given structure.
    ///
    /// Fails if the algebra cannot produce its zero element.
    pub fn new(structure: &[usize]) -> Result<Self> {
        Self::with_capacity(structure, ROW_CAPACITY)
    }

    /// Create an empty tensor whose outermost row has room for `capacity`
    /// stored entries.
    pub fn with_capacity(structure: &[usize], capacity: usize) -> Result<Self> {
        let body = match structure {
            [] => Body::Scalar(A::zero()?),
            [n] => Body::Vector(SparseRow::with_capacity(*n, A::zero()?, capacity)),
            [n, rest @ ..] => {
                Body::Branch(SparseRow::with_capacity(*n, Tensor::with_capacity(rest, 0)?, capacity))
            }
        };
        Ok(Self {
            structure: structure.to_vec(),
            body,
        })
    }

    /// Create a rank-0 tensor holding `value`.
    pub fn scalar(value: A::Elem) -> Self {
        Self {
            structure: Vec::new(),
            body: Body::Scalar(value),
        }
    }

    /// Create a tensor from row-major dense data.
    ///
    /// # Example
    ///
    /// ```rust
    /// use sparsetensor::{Standard, Tensor};
    ///
    /// let t = Tensor::<Standard<i32>>::from_flat(&[2, 2], &[1, 0, 0, 4]).unwrap();
    /// assert_eq!(*t.get(&[1, 1]).unwrap(), 4);
    /// assert_eq!(t.nnz(), 2);
    /// ```
    pub fn from_flat(structure: &[usize], data: &[A::Elem]) -> Result<Self> {
        let expected: usize = structure.iter().product();
        if data.len() != expected {
            return Err(Error::shape_mismatch(&[expected], &[data.len()]));
        }
        Self::build_flat(structure, data)
    }

    fn build_flat(structure: &[usize], data: &[A::Elem]) -> Result<Self> {
        let mut tensor = Self::with_capacity(structure, 0)?;
        match &mut tensor.body {
            Body::Scalar(v) => *v = data[0].clone(),
            Body::Vector(row) => {
                for (i, v) in data.iter().enumerate() {
                    if !A::is_zero(v) {
                        row.push(i, v.clone());
                    }
                }
            }
            Body::Branch(row) => {
                let stride: usize = structure[1..].iter().product();
                if stride > 0 {
                    for (i, chunk) in data.chunks(stride).enumerate() {
                        let child = Self::build_flat(&structure[1..], chunk)?;
                        if !child.is_empty() {
                            row.push(i, child);
                        }
                    }
                }
            }
        }
        Ok(tensor)
    }

    /// Create a tensor whose outermost axis holds `children` (ascending by
    /// index). Empty children are skipped.
    pub(crate) fn from_children(
        structure: Vec<usize>,
        children: impl IntoIterator<Item = (usize, Tensor<A>)>,
    ) -> Result<Self> {
        let mut tensor = Self::new(&structure)?;
        match &mut tensor.body {
            Body::Scalar(_) => {
                return Err(Error::InvalidDimension { dim: 0, ndim: 0 });
            }
            Body::Vector(row) => {
                for (i, child) in children {
                    debug_assert!(child.rank() == 0);
                    if let Body::Scalar(v) = child.body {
                        if !A::is_zero(&v) {
                            row.push(i, v);
                        }
                    }
                }
            }
            Body::Branch(row) => {
                for (i, child) in children {
                    debug_assert_eq!(child.structure, structure[1..]);
                    if !child.is_empty() {
                        row.push(i, child);
                    }
                }
            }
        }
        Ok(tensor)
    }

    // ========================================================================
    // Metadata
    // ========================================================================

    /// Declared size of every axis, outermost first.
    #[inline]
    pub fn structure(&self) -> &[usize] {
        &self.structure
    }

    /// Number of axes.
    #[inline]
    pub fn rank(&self) -> usize {
        self.structure.len()
    }

    /// Number of stored non-zero leaves.
    pub fn nnz(&self) -> usize {
        match &self.body {
            Body::Scalar(v) => usize::from(!A::is_zero(v)),
            Body::Vector(row) => row.nnz(),
            Body::Branch(row) => row.iter().map(|(_, c)| c.nnz()).sum(),
        }
    }

    /// Whether every element is zero.
    pub fn is_empty(&self) -> bool {
        match &self.body {
            Body::Scalar(v) => A::is_zero(v),
            Body::Vector(row) => row.is_empty(),
            Body::Branch(row) => row.is_empty(),
        }
    }

    /// The value of a rank-0 tensor.
    pub fn scalar_value(&self) -> Option<&A::Elem> {
        match &self.body {
            Body::Scalar(v) => Some(v),
            _ => None,
        }
    }

    fn check_axis(&self, axis: usize) -> Result<()> {
        if axis >= self.rank() {
            return Err(Error::InvalidDimension {
                dim: axis,
                ndim: self.rank(),
            });
        }
        Ok(())
    }

    fn check_index(&self, index: &[usize]) -> Result<()> {
        if index.len() != self.rank() {
            return Err(Error::InvalidArgument {
                arg: "index",
                reason: format!("expected {} indices, got {}", self.rank(), index.len()),
            });
        }
        for (&i, &size) in index.iter().zip(&self.structure) {
            if i >= size {
                return Err(Error::IndexOutOfBounds { index: i, size });
            }
        }
        Ok(())
    }

    // ========================================================================
    // Element Access
    // ========================================================================

    /// Element at a multi-index.
    pub fn get(&self, index: &[usize]) -> Result<&A::Elem> {
        self.check_index(index)?;
        Ok(self.get_unchecked(index))
    }

    fn get_unchecked(&self, index: &[usize]) -> &A::Elem {
        match &self.body {
            Body::Scalar(v) => v,
            Body::Vector(row) => row.get(index[0]),
            Body::Branch(row) => row.get(index[0]).get_unchecked(&index[1..]),
        }
    }

    /// Write an element at a multi-index.
    ///
    /// Writing zero removes the entry and prunes subtensors left empty.
    pub fn set(&mut self, index: &[usize], value: A::Elem) -> Result<()> {
        self.check_index(index)?;
        self.set_unchecked(index, value)
    }

    fn set_unchecked(&mut self, index: &[usize], value: A::Elem) -> Result<()> {
        match &mut self.body {
            Body::Scalar(v) => *v = value,
            Body::Vector(row) => {
                if A::is_zero(&value) {
                    row.remove(index[0]);
                } else {
                    row.put(index[0], value);
                }
            }
            Body::Branch(row) => {
                if let Some(child) = row.get_mut(index[0]) {
                    child.set_unchecked(&index[1..], value)?;
                    if child.is_empty() {
                        row.remove(index[0]);
                    }
                } else if !A::is_zero(&value) {
                    let mut child = Tensor::new(&self.structure[1..])?;
                    child.set_unchecked(&index[1..], value)?;
                    row.put(index[0], child);
                }
            }
        }
        Ok(())
    }

    /// Subtensor at an index along the outermost axis.
    ///
    /// Absent subtensors read as an empty tensor. Only defined for rank 2 and
    /// above.
    pub fn subtensor(&self, index: usize) -> Result<&Tensor<A>> {
        match &self.body {
            Body::Branch(row) => {
                if index >= row.width() {
                    return Err(Error::IndexOutOfBounds {
                        index,
                        size: row.width(),
                    });
                }
                Ok(row.get(index))
            }
            _ => Err(Error::InvalidDimension {
                dim: 1,
                ndim: self.rank(),
            }),
        }
    }

    fn branch(&self) -> Option<&SparseRow<Tensor<A>>> {
        match &self.body {
            Body::Branch(row) => Some(row),
            _ => None,
        }
    }

    /// Stored subtensors along the outermost axis, for rank 2 and above.
    pub fn children(&self) -> impl Iterator<Item = (usize, &Tensor<A>)> + '_ {
        self.branch().into_iter().flat_map(SparseRow::iter)
    }

    /// Every stored element with its multi-index, in row-major order.
    pub fn entries(&self) -> Vec<(Vec<usize>, &A::Elem)> {
        let mut out = Vec::with_capacity(self.nnz());
        let mut prefix = Vec::with_capacity(self.rank());
        self.collect_entries(&mut prefix, &mut out);
        out
    }

    fn collect_entries<'a>(
        &'a self,
        prefix: &mut Vec<usize>,
        out: &mut Vec<(Vec<usize>, &'a A::Elem)>,
    ) {
        match &self.body {
            Body::Scalar(v) => {
                if !A::is_zero(v) {
                    out.push((prefix.clone(), v));
                }
            }
            Body::Vector(row) => {
                for (i, v) in row.iter() {
                    prefix.push(i);
                    out.push((prefix.clone(), v));
                    prefix.pop();
                }
            }
            Body::Branch(row) => {
                for (i, child) in row.iter() {
                    prefix.push(i);
                    child.collect_entries(prefix, out);
                    prefix.pop();
                }
            }
        }
    }

    /// Dense row-major copy of all elements.
    pub fn to_flat(&self) -> Result<Vec<A::Elem>> {
        let len: usize = self.structure.iter().product();
        let mut data = vec![A::zero()?; len];
        let mut strides = vec![1; self.rank()];
        for axis in (0..self.rank().saturating_sub(1)).rev() {
            strides[axis] = strides[axis + 1] * self.structure[axis + 1];
        }
        for (index, value) in self.entries() {
            let offset: usize = index.iter().zip(&strides).map(|(i, s)| i * s).sum();
            data[offset] = value.clone();
        }
        Ok(data)
    }

    // ========================================================================
    // Equality
    // ========================================================================

    /// Structural equality: same structure, same stored indices at every
    /// level, and algebra-equal leaves. No numeric tolerance.
    pub fn equal_s(&self, other: &Self) -> bool {
        if self.structure != other.structure {
            return false;
        }
        match (&self.body, &other.body) {
            (Body::Scalar(a), Body::Scalar(b)) => A::equals(a, b),
            (Body::Vector(a), Body::Vector(b)) => {
                a.nnz() == b.nnz()
                    && a.iter()
                        .zip(b.iter())
                        .all(|((i, x), (j, y))| i == j && A::equals(x, y))
            }
            (Body::Branch(a), Body::Branch(b)) => {
                a.nnz() == b.nnz()
                    && a.iter()
                        .zip(b.iter())
                        .all(|((i, x), (j, y))| i == j && x.equal_s(y))
            }
            _ => false,
        }
    }
}

impl<A: Algebra> PartialEq for Tensor<A> {
    fn eq(&self, other: &Self) -> bool {
        self.equal_s(other)
    }
}

impl<A: Algebra> fmt::Debug for Tensor<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tensor")
            .field("structure", &self.structure)
            .field("nnz", &self.nnz())
            .field("algebra", &A::name())
            .field("entries", &self.entries())
            .finish()
    }
}

/// `structure` with one axis removed.
pub(crate) fn without(structure: &[usize], axis: usize) -> Vec<usize> {
    structure
        .iter()
        .enumerate()
        .filter(|&(i, _)| i != axis)
        .map(|(_, &s)| s)
        .collect()
}
