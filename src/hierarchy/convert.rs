//! Conversions between hierarchies, rectangular arrays and tensors.

use super::{Hierarchy, NodeId};
use crate::algebra::Algebra;
use crate::error::{Error, Result};
use crate::tensor::Tensor;

/// A dense rectangular array stored row-major.
///
/// # Example
///
/// ```rust
/// use sparsetensor::NdArray;
///
/// let a = NdArray::new(vec![2, 2], vec![1, 2, 3, 4]).unwrap();
/// assert_eq!(*a.get(&[1, 0]).unwrap(), 3);
/// assert!(NdArray::new(vec![2, 2], vec![1, 2, 3]).is_err());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawArray<T>"))]
pub struct NdArray<T> {
    shape: Vec<usize>,
    data: Vec<T>,
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawArray<T> {
    shape: Vec<usize>,
    data: Vec<T>,
}

#[cfg(feature = "serde")]
impl<T> TryFrom<RawArray<T>> for NdArray<T> {
    type Error = Error;

    fn try_from(raw: RawArray<T>) -> Result<Self> {
        NdArray::new(raw.shape, raw.data)
    }
}

impl<T> NdArray<T> {
    /// Wrap row-major `data`; its length must equal the product of `shape`.
    pub fn new(shape: Vec<usize>, data: Vec<T>) -> Result<Self> {
        let expected: usize = shape.iter().product();
        if data.len() != expected {
            return Err(Error::shape_mismatch(&[expected], &[data.len()]));
        }
        Ok(Self { shape, data })
    }

    /// A rank-0 array holding one value.
    pub fn scalar(value: T) -> Self {
        Self {
            shape: Vec::new(),
            data: vec![value],
        }
    }

    #[inline]
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    #[inline]
    pub fn rank(&self) -> usize {
        self.shape.len()
    }

    #[inline]
    pub fn data(&self) -> &[T] {
        &self.data
    }

    pub fn into_data(self) -> Vec<T> {
        self.data
    }

    /// Element at a full multi-index.
    pub fn get(&self, index: &[usize]) -> Result<&T> {
        if index.len() != self.shape.len() {
            return Err(Error::InvalidDimension {
                dim: index.len(),
                ndim: self.shape.len(),
            });
        }
        let mut offset = 0;
        for (&i, &size) in index.iter().zip(&self.shape) {
            if i >= size {
                return Err(Error::IndexOutOfBounds { index: i, size });
            }
            offset = offset * size + i;
        }
        Ok(&self.data[offset])
    }
}

/// A possibly jagged nested list, mirroring a hierarchy node for node.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Nested<T> {
    Value(T),
    List(Vec<Nested<T>>),
}

impl<T: Clone> Hierarchy<T> {
    /// Convert to a rectangular array.
    ///
    /// Every group at a given depth must have the same number of
    /// subordinates, and all values must sit at the same depth. Anything
    /// else is a [`Error::ShapeMismatch`]; the tree is never truncated.
    ///
    /// # Example
    ///
    /// ```rust
    /// use sparsetensor::Hierarchy;
    ///
    /// let a = Hierarchy::<f64>::parse("{{1, 2}, {3, 4}}").unwrap().to_array().unwrap();
    /// assert_eq!(a.shape(), &[2, 2]);
    /// assert_eq!(a.data(), &[1.0, 2.0, 3.0, 4.0]);
    ///
    /// assert!(Hierarchy::<f64>::parse("{{1, 2}, {3}}").unwrap().to_array().is_err());
    /// ```
    pub fn to_array(&self) -> Result<NdArray<T>> {
        let mut shape = Vec::new();
        let mut level = vec![self.top];
        loop {
            let values = level.iter().filter(|id| self.nodes[id.0].is_value()).count();
            if values == level.len() {
                let data = level
                    .iter()
                    .filter_map(|id| self.nodes[id.0].value.clone())
                    .collect();
                return Ok(NdArray { shape, data });
            }

            let mut next = Vec::new();
            let mut width = None;
            for id in &level {
                let node = &self.nodes[id.0];
                let count = node.subordinates.len();
                let expected = *width.get_or_insert(count);
                if node.is_value() || count != expected || count == 0 {
                    let got = if node.is_value() { shape.clone() } else { extended(&shape, count) };
                    tracing::debug!(node = id.0, depth = shape.len(), "hierarchy is not rectangular");
                    return Err(Error::ShapeMismatch {
                        expected: extended(&shape, expected.max(1)),
                        got,
                    });
                }
                next.extend_from_slice(&node.subordinates);
            }
            shape.push(width.unwrap_or(0));
            level = next;
        }
    }

    /// Convert to nested lists; jagged and empty groups are kept as they are.
    pub fn to_nested(&self) -> Nested<T> {
        self.nested_at(self.top)
    }

    fn nested_at(&self, id: NodeId) -> Nested<T> {
        let node = &self.nodes[id.0];
        match &node.value {
            Some(v) => Nested::Value(v.clone()),
            None => Nested::List(node.subordinates.iter().map(|&s| self.nested_at(s)).collect()),
        }
    }

    /// Build a hierarchy with one group per array row at every depth.
    pub fn from_array(array: &NdArray<T>) -> Self {
        if array.shape.is_empty() {
            return Self::from_value(array.data[0].clone());
        }
        let mut h = Self::new_group();
        let top = h.top;
        h.fill(top, &array.shape, &array.data);
        h
    }

    fn fill(&mut self, leader: NodeId, shape: &[usize], data: &[T]) {
        if shape.len() == 1 {
            for v in data {
                self.append(leader, Some(v.clone()));
            }
            return;
        }
        let stride: usize = shape[1..].iter().product();
        for i in 0..shape[0] {
            let group = self.append(leader, None);
            self.fill(group, &shape[1..], &data[i * stride..(i + 1) * stride]);
        }
    }

    /// Build a hierarchy mirroring `nested`.
    pub fn from_nested(nested: &Nested<T>) -> Self {
        match nested {
            Nested::Value(v) => Self::from_value(v.clone()),
            Nested::List(items) => {
                let mut h = Self::new_group();
                let top = h.top;
                h.fill_nested(top, items);
                h
            }
        }
    }

    fn fill_nested(&mut self, leader: NodeId, items: &[Nested<T>]) {
        for item in items {
            match item {
                Nested::Value(v) => {
                    self.append(leader, Some(v.clone()));
                }
                Nested::List(children) => {
                    let group = self.append(leader, None);
                    self.fill_nested(group, children);
                }
            }
        }
    }
}

fn extended(shape: &[usize], last: usize) -> Vec<usize> {
    let mut out = shape.to_vec();
    out.push(last);
    out
}

impl<A: Algebra> Tensor<A> {
    /// Dense row-major copy with the tensor's structure as shape.
    pub fn to_array(&self) -> Result<NdArray<A::Elem>> {
        Ok(NdArray {
            shape: self.structure().to_vec(),
            data: self.to_flat()?,
        })
    }

    /// Sparse copy of a dense array; zero elements are not stored.
    pub fn from_array(array: &NdArray<A::Elem>) -> Result<Self> {
        Self::from_flat(&array.shape, &array.data)
    }

    /// Export through a hierarchy, ready to be written as bracket text.
    ///
    /// # Example
    ///
    /// ```rust
    /// use sparsetensor::{Standard, Tensor};
    ///
    /// let t = Tensor::<Standard<f64>>::from_flat(&[2, 2], &[1.0, 2.0, 3.0, 4.0]).unwrap();
    /// assert_eq!(t.to_hierarchy().unwrap().to_string(), "{{1, 2}, {3, 4}}");
    /// ```
    pub fn to_hierarchy(&self) -> Result<Hierarchy<A::Elem>> {
        Ok(Hierarchy::from_array(&self.to_array()?))
    }

    /// Import a rectangular hierarchy.
    pub fn from_hierarchy(h: &Hierarchy<A::Elem>) -> Result<Self> {
        Self::from_array(&h.to_array()?)
    }
}
