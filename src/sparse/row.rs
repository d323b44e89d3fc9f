//! Sorted sparse row with a virtual/real index cache.

use std::fmt;

use super::cursor::{seek_from, Cursor};
use crate::error::{Error, Result};

/// A stored `(virtual index, value)` pair.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SparseElement<T> {
    /// Position in the conceptually dense row
    pub index: usize,
    /// Stored value, never equal to the row's default
    pub value: T,
}

impl<T> SparseElement<T> {
    /// Create a new element.
    #[inline]
    pub fn new(index: usize, value: T) -> Self {
        Self { index, value }
    }
}

/// A logically dense row of `width` values that stores only the entries
/// differing from its default value.
///
/// Elements are kept strictly ascending by virtual index. Lookups walk from
/// the most recently used real index, which makes sequential and local access
/// O(1) amortized.
///
/// # Example
///
/// ```rust
/// use sparsetensor::SparseRow;
///
/// let mut row = SparseRow::new(6, 0.0);
/// row.set(2, 3.0).unwrap();
/// row.set(4, 5.0).unwrap();
/// assert_eq!(*row.get(2), 3.0);
/// assert_eq!(*row.get(3), 0.0);
/// assert_eq!(row.nnz(), 2);
///
/// row.set(2, 0.0).unwrap(); // writing the default removes the entry
/// assert_eq!(row.nnz(), 1);
/// ```
#[derive(Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(
        try_from = "RawRow<T>",
        bound(deserialize = "T: serde::Deserialize<'de> + PartialEq")
    )
)]
pub struct SparseRow<T> {
    elements: Vec<SparseElement<T>>,
    width: usize,
    default: Box<T>,
    #[cfg_attr(feature = "serde", serde(skip))]
    recent: Cursor,
}

/// Initial backing capacity of an empty row.
const DEFAULT_CAPACITY: usize = 6;

impl<T> SparseRow<T> {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// Create an empty row of the given logical width.
    pub fn new(width: usize, default: T) -> Self {
        Self::with_capacity(width, default, DEFAULT_CAPACITY)
    }

    /// Create an empty row with room for `capacity` stored elements.
    pub fn with_capacity(width: usize, default: T, capacity: usize) -> Self {
        Self {
            elements: Vec::with_capacity(capacity),
            width,
            default: Box::new(default),
            recent: Cursor::default(),
        }
    }

    /// Build a row from elements already sorted by index and free of
    /// default values.
    pub(crate) fn from_parts(elements: Vec<SparseElement<T>>, width: usize, default: T) -> Self {
        debug_assert!(elements.windows(2).all(|w| w[0].index < w[1].index));
        debug_assert!(elements.last().map_or(true, |e| e.index < width));
        Self {
            elements,
            width,
            default: Box::new(default),
            recent: Cursor::default(),
        }
    }

    // ========================================================================
    // Metadata
    // ========================================================================

    /// Logical (dense) length.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Value reported for every index without a stored element.
    #[inline]
    pub fn default_value(&self) -> &T {
        &self.default
    }

    /// Number of stored elements.
    #[inline]
    pub fn nnz(&self) -> usize {
        self.elements.len()
    }

    /// Whether no element is stored.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Backing capacity.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.elements.capacity()
    }

    /// Stored elements in ascending index order.
    #[inline]
    pub fn elements(&self) -> &[SparseElement<T>] {
        &self.elements
    }

    /// Stored element at a real (storage) position.
    #[inline]
    pub fn element(&self, real: usize) -> Option<&SparseElement<T>> {
        self.elements.get(real)
    }

    /// Iterate stored `(virtual index, value)` pairs in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &T)> + '_ {
        self.elements.iter().map(|e| (e.index, &e.value))
    }

    /// Iterate stored virtual indices in ascending order.
    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.elements.iter().map(|e| e.index)
    }

    // ========================================================================
    // Virtual Index Access
    // ========================================================================

    /// Real position of `index`, or the position it would be inserted at.
    #[inline]
    pub fn locate(&self, index: usize) -> std::result::Result<usize, usize> {
        self.recent.seek(&self.elements, index, |e| e.index)
    }

    /// Most recently touched virtual index, if any element is stored.
    pub fn recent_index(&self) -> Option<usize> {
        let last = self.elements.len().checked_sub(1)?;
        Some(self.elements[self.recent.get().min(last)].index)
    }

    /// Value at a virtual index.
    ///
    /// Indices without a stored element, including those at or beyond the
    /// width, read as the default value.
    pub fn get(&self, index: usize) -> &T {
        match self.locate(index) {
            Ok(real) => &self.elements[real].value,
            Err(_) => self.default_value(),
        }
    }

    /// Whether a value is stored at `index`.
    pub fn contains(&self, index: usize) -> bool {
        self.locate(index).is_ok()
    }

    pub(crate) fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        match self.locate(index) {
            Ok(real) => Some(&mut self.elements[real].value),
            Err(_) => None,
        }
    }

    /// Remove and return the value stored at a virtual index.
    pub fn remove(&mut self, index: usize) -> Option<T> {
        match self.locate(index) {
            Ok(real) => Some(self.elements.remove(real).value),
            Err(_) => None,
        }
    }

    /// Store a value known to differ from the default, replacing any
    /// existing one.
    pub(crate) fn put(&mut self, index: usize, value: T) {
        debug_assert!(index < self.width);
        match self.locate(index) {
            Ok(real) => self.elements[real].value = value,
            Err(real) => self.elements.insert(real, SparseElement::new(index, value)),
        }
    }

    /// Append a value past the last stored index.
    pub(crate) fn push(&mut self, index: usize, value: T) {
        debug_assert!(index < self.width);
        debug_assert!(self.elements.last().map_or(true, |e| e.index < index));
        self.elements.push(SparseElement::new(index, value));
    }

    // ========================================================================
    // Real Index Access
    // ========================================================================

    /// Remove the element at a real position.
    pub fn remove_at(&mut self, real: usize) -> Result<SparseElement<T>> {
        if real >= self.elements.len() {
            return Err(Error::IndexOutOfBounds {
                index: real,
                size: self.elements.len(),
            });
        }
        Ok(self.elements.remove(real))
    }

    /// Swap the values at two real positions; virtual indices stay put.
    pub fn swap_real(&mut self, a: usize, b: usize) -> Result<()> {
        let size = self.elements.len();
        for index in [a, b] {
            if index >= size {
                return Err(Error::IndexOutOfBounds { index, size });
            }
        }
        if a != b {
            let (lo, hi) = (a.min(b), a.max(b));
            let (left, right) = self.elements.split_at_mut(hi);
            std::mem::swap(&mut left[lo].value, &mut right[0].value);
        }
        Ok(())
    }

    /// Release unused backing capacity.
    pub fn trim_excess_space(&mut self) {
        self.elements.shrink_to_fit();
    }

    /// Remove every stored element.
    pub fn clear(&mut self) {
        self.elements.clear();
        self.recent.set(0);
    }

    fn check_virtual(&self, index: usize) -> Result<()> {
        if index >= self.width {
            return Err(Error::IndexOutOfBounds {
                index,
                size: self.width,
            });
        }
        Ok(())
    }
}

impl<T: PartialEq> SparseRow<T> {
    /// Build a row from stored elements.
    ///
    /// Indices must be strictly ascending and inside the width, and no
    /// value may equal the default.
    pub fn from_elements(
        elements: Vec<SparseElement<T>>,
        width: usize,
        default: T,
    ) -> Result<Self> {
        if let Some(w) = elements.windows(2).find(|w| w[0].index >= w[1].index) {
            return Err(Error::InvalidArgument {
                arg: "elements",
                reason: format!("index {} does not follow {}", w[1].index, w[0].index),
            });
        }
        if let Some(last) = elements.last().filter(|e| e.index >= width) {
            return Err(Error::IndexOutOfBounds {
                index: last.index,
                size: width,
            });
        }
        if let Some(e) = elements.iter().find(|e| e.value == default) {
            return Err(Error::InvalidArgument {
                arg: "elements",
                reason: format!("value at virtual index {} equals the default", e.index),
            });
        }
        Ok(Self::from_parts(elements, width, default))
    }
}

/// Serialized form of a row, validated on the way in.
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawRow<T> {
    elements: Vec<SparseElement<T>>,
    width: usize,
    default: T,
}

#[cfg(feature = "serde")]
impl<T: PartialEq> TryFrom<RawRow<T>> for SparseRow<T> {
    type Error = Error;

    fn try_from(raw: RawRow<T>) -> Result<Self> {
        Self::from_elements(raw.elements, raw.width, raw.default)
    }
}

impl<T: Clone + PartialEq> SparseRow<T> {
    /// Build a row from dense values, storing those that differ from
    /// `default`.
    pub fn from_dense(values: &[T], default: T) -> Self {
        let elements = values
            .iter()
            .enumerate()
            .filter(|(_, v)| **v != default)
            .map(|(i, v)| SparseElement::new(i, v.clone()))
            .collect();
        Self::from_parts(elements, values.len(), default)
    }

    /// Expand to a dense vector of length `width`.
    pub fn to_dense(&self) -> Vec<T> {
        let mut dense = vec![self.default_value().clone(); self.width];
        for e in &self.elements {
            dense[e.index] = e.value.clone();
        }
        dense
    }

    /// Write a value at a virtual index.
    ///
    /// Writing the default removes any stored element; anything else
    /// overwrites an exact match or inserts at the boundary.
    pub fn set(&mut self, index: usize, value: T) -> Result<()> {
        self.check_virtual(index)?;
        if value == *self.default {
            self.remove(index);
        } else {
            self.put(index, value);
        }
        Ok(())
    }

    /// Insert an element at a real position.
    ///
    /// The element's virtual index must fit between its neighbours and
    /// inside the width, and its value must differ from the default.
    pub fn insert_at(&mut self, real: usize, element: SparseElement<T>) -> Result<()> {
        if real > self.elements.len() {
            return Err(Error::IndexOutOfBounds {
                index: real,
                size: self.elements.len(),
            });
        }
        let after_prev = real == 0 || self.elements[real - 1].index < element.index;
        let before_next =
            real == self.elements.len() || element.index < self.elements[real].index;
        if !after_prev || !before_next || element.index >= self.width {
            return Err(Error::InvalidArgument {
                arg: "element",
                reason: format!(
                    "virtual index {} does not fit at real position {}",
                    element.index, real
                ),
            });
        }
        if element.value == *self.default {
            return Err(Error::InvalidArgument {
                arg: "element",
                reason: format!("value at virtual index {} equals the default", element.index),
            });
        }
        self.elements.insert(real, element);
        Ok(())
    }

    /// Swap the values at two virtual indices.
    ///
    /// Either index may be unoccupied, in which case the stored value moves
    /// to the other index.
    pub fn swap_elements(&mut self, i: usize, j: usize) -> Result<()> {
        self.check_virtual(i)?;
        self.check_virtual(j)?;
        if i == j {
            return Ok(());
        }
        match (self.locate(i), self.locate(j)) {
            (Ok(a), Ok(b)) => self.swap_real(a, b),
            (Ok(_), Err(_)) => {
                if let Some(v) = self.remove(i) {
                    self.put(j, v);
                }
                Ok(())
            }
            (Err(_), Ok(_)) => {
                if let Some(v) = self.remove(j) {
                    self.put(i, v);
                }
                Ok(())
            }
            (Err(_), Err(_)) => Ok(()),
        }
    }

    /// Apply a sequence of virtual-index swaps in order.
    pub fn apply_swaps(&mut self, swaps: &[(usize, usize)]) -> Result<()> {
        for &(i, j) in swaps {
            self.swap_elements(i, j)?;
        }
        Ok(())
    }

    /// Remove real positions `first..=last` and return them as a detached
    /// row.
    ///
    /// The detached row keeps the original virtual indices and gets width
    /// `last index + 1`. This row's width shrinks to its new rightmost
    /// boundary.
    pub fn remove_range(&mut self, first: usize, last: usize) -> Result<SparseRow<T>> {
        let size = self.elements.len();
        if last >= size {
            return Err(Error::IndexOutOfBounds { index: last, size });
        }
        if first > last {
            return Err(Error::InvalidArgument {
                arg: "first",
                reason: format!("range start {} is past its end {}", first, last),
            });
        }
        let removed: Vec<_> = self.elements.drain(first..=last).collect();
        let removed_width = removed.last().map_or(0, |e| e.index + 1);
        self.width = self.elements.last().map_or(0, |e| e.index + 1);
        self.recent.set(0);
        Ok(SparseRow::from_parts(
            removed,
            removed_width,
            self.default_value().clone(),
        ))
    }

    /// Split at a virtual index.
    ///
    /// This row keeps `0..at`; the returned row holds `at..width` re-based to
    /// start at zero.
    pub fn split_at(&mut self, at: usize) -> Result<SparseRow<T>> {
        if at > self.width {
            return Err(Error::IndexOutOfBounds {
                index: at,
                size: self.width,
            });
        }
        let real = match seek_from(&self.elements, at, self.recent.get(), |e| e.index) {
            Ok(r) | Err(r) => r,
        };
        let right = self
            .elements
            .split_off(real)
            .into_iter()
            .map(|e| SparseElement::new(e.index - at, e.value))
            .collect();
        let right = SparseRow::from_parts(right, self.width - at, self.default_value().clone());
        self.width = at;
        self.recent.set(0);
        Ok(right)
    }

    /// Append `right` after this row, the inverse of [`split_at`](Self::split_at).
    pub fn merge_with(&mut self, right: SparseRow<T>) {
        let offset = self.width;
        self.width += right.width;
        let default = &*self.default;
        self.elements.extend(
            right
                .elements
                .into_iter()
                .filter(|e| e.value != *default)
                .map(|e| SparseElement::new(e.index + offset, e.value)),
        );
    }
}

impl<T: PartialEq> PartialEq for SparseRow<T> {
    fn eq(&self, other: &Self) -> bool {
        self.width == other.width
            && self.default == other.default
            && self.elements == other.elements
    }
}

impl<T: fmt::Debug> fmt::Debug for SparseRow<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SparseRow")
            .field("width", &self.width)
            .field("default", &self.default)
            .field("elements", &self.elements)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SparseRow<i32> {
        let mut row = SparseRow::new(6, 0);
        row.set(0, 1).unwrap();
        row.set(2, 3).unwrap();
        row.set(4, 5).unwrap();
        row
    }

    #[test]
    fn test_get_set() {
        let row = sample();
        assert_eq!(row.nnz(), 3);
        assert_eq!(*row.get(0), 1);
        assert_eq!(*row.get(1), 0);
        assert_eq!(*row.get(4), 5);
        assert_eq!(*row.get(100), 0);
        assert_eq!(row.indices().collect::<Vec<_>>(), vec![0, 2, 4]);
    }

    #[test]
    fn test_set_default_removes() {
        let mut row = sample();
        row.set(2, 0).unwrap();
        assert_eq!(row.nnz(), 2);
        assert!(!row.contains(2));
        row.set(3, 0).unwrap();
        assert_eq!(row.nnz(), 2);
    }

    #[test]
    fn test_set_out_of_width() {
        let mut row = sample();
        assert!(matches!(
            row.set(6, 1),
            Err(Error::IndexOutOfBounds { index: 6, size: 6 })
        ));
    }

    #[test]
    fn test_backward_walk() {
        let row = sample();
        assert_eq!(*row.get(4), 5);
        assert_eq!(row.recent_index(), Some(4));
        assert_eq!(*row.get(0), 1);
        assert_eq!(row.recent_index(), Some(0));
    }

    #[test]
    fn test_swap_elements() {
        let mut row = sample();
        row.swap_elements(2, 4).unwrap();
        assert_eq!(*row.get(2), 5);
        assert_eq!(*row.get(4), 3);

        row.swap_elements(0, 1).unwrap();
        assert_eq!(*row.get(0), 0);
        assert_eq!(*row.get(1), 1);
        assert_eq!(row.indices().collect::<Vec<_>>(), vec![1, 2, 4]);
    }

    #[test]
    fn test_insert_at_checks_order() {
        let mut row = sample();
        row.insert_at(1, SparseElement::new(1, 9)).unwrap();
        assert_eq!(*row.get(1), 9);
        assert!(matches!(
            row.insert_at(0, SparseElement::new(3, 7)),
            Err(Error::InvalidArgument { .. })
        ));
        assert!(matches!(
            row.insert_at(9, SparseElement::new(5, 7)),
            Err(Error::IndexOutOfBounds { .. })
        ));
    }

    #[test]
    fn test_insert_at_rejects_default() {
        let mut row = SparseRow::new(6, 0.0);
        assert!(matches!(
            row.insert_at(0, SparseElement::new(3, 0.0)),
            Err(Error::InvalidArgument { .. })
        ));
        assert_eq!(row.nnz(), 0);
        assert!(!row.contains(3));
    }

    #[test]
    fn test_remove_range() {
        let mut row = sample();
        let removed = row.remove_range(1, 2).unwrap();
        assert_eq!(row.width(), 1);
        assert_eq!(row.nnz(), 1);
        assert_eq!(removed.width(), 5);
        assert_eq!(removed.indices().collect::<Vec<_>>(), vec![2, 4]);
        assert!(row.remove_range(0, 3).is_err());
    }

    #[test]
    fn test_split_and_merge() {
        let mut row = sample();
        let original = row.clone();
        let right = row.split_at(3).unwrap();
        assert_eq!(row.width(), 3);
        assert_eq!(right.width(), 3);
        assert_eq!(*right.get(1), 5);
        row.merge_with(right);
        assert_eq!(row, original);
    }

    #[test]
    fn test_dense_conversion() {
        let row = SparseRow::from_dense(&[0, 7, 0, 8], 0);
        assert_eq!(row.nnz(), 2);
        assert_eq!(row.to_dense(), vec![0, 7, 0, 8]);
    }

    #[test]
    fn test_from_elements_validates() {
        let ok = SparseRow::from_elements(
            vec![SparseElement::new(1, 4), SparseElement::new(3, 2)],
            5,
            0,
        )
        .unwrap();
        assert_eq!(ok.to_dense(), vec![0, 4, 0, 2, 0]);

        let unsorted = vec![SparseElement::new(3, 4), SparseElement::new(1, 2)];
        assert!(matches!(
            SparseRow::from_elements(unsorted, 5, 0),
            Err(Error::InvalidArgument { .. })
        ));
        let wide = vec![SparseElement::new(5, 4)];
        assert!(matches!(
            SparseRow::from_elements(wide, 5, 0),
            Err(Error::IndexOutOfBounds { index: 5, size: 5 })
        ));
        let stored_default = vec![SparseElement::new(2, 0)];
        assert!(SparseRow::from_elements(stored_default, 5, 0).is_err());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_deserialize_validates() {
        let row = sample();
        let json = serde_json::to_string(&row).unwrap();
        let back: SparseRow<i32> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, row);

        let stored_default = r#"{"elements":[{"index":3,"value":0}],"width":6,"default":0}"#;
        assert!(serde_json::from_str::<SparseRow<i32>>(stored_default).is_err());
        let out_of_width = r#"{"elements":[{"index":9,"value":1}],"width":6,"default":0}"#;
        assert!(serde_json::from_str::<SparseRow<i32>>(out_of_width).is_err());
    }

    #[test]
    fn test_trim_excess_space() {
        let mut row = SparseRow::with_capacity(100, 0, 64);
        row.set(3, 1).unwrap();
        row.trim_excess_space();
        assert!(row.capacity() < 64);
    }
}
