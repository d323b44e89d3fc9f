//! Sparse matrix of sparse rows with copy-on-write row materialization.

use std::fmt;
use std::ops::Deref;

use super::cursor::Cursor;
use super::ops::{intersect, merge, Merged};
use super::row::{SparseElement, SparseRow};
use crate::algebra::Algebra;
use crate::error::{Error, Result};

/// A row owned by a [`SparseMatrix`].
///
/// Stored rows carry their explicit row index. The matrix's shared dummy row
/// has none and reads as the default everywhere.
#[derive(Clone, PartialEq)]
pub struct SparseMatrixRow<T> {
    row: SparseRow<T>,
    explicit_index: Option<usize>,
}

impl<T> SparseMatrixRow<T> {
    fn stored(index: usize, row: SparseRow<T>) -> Self {
        Self {
            row,
            explicit_index: Some(index),
        }
    }

    /// Explicit row index, `None` for the dummy row.
    #[inline]
    pub fn explicit_index(&self) -> Option<usize> {
        self.explicit_index
    }

    /// Whether this is the placeholder for an absent row.
    #[inline]
    pub fn is_dummy(&self) -> bool {
        self.explicit_index.is_none()
    }

    /// The underlying sparse row.
    #[inline]
    pub fn row(&self) -> &SparseRow<T> {
        &self.row
    }

    // Stored rows always carry an index; the dummy never takes part in a walk.
    #[inline]
    fn key(&self) -> usize {
        self.explicit_index.unwrap_or(usize::MAX)
    }
}

impl<T> Deref for SparseMatrixRow<T> {
    type Target = SparseRow<T>;

    fn deref(&self) -> &SparseRow<T> {
        &self.row
    }
}

impl<T: fmt::Debug> fmt::Debug for SparseMatrixRow<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SparseMatrixRow")
            .field("explicit_index", &self.explicit_index)
            .field("row", &self.row)
            .finish()
    }
}

/// A `height × width` matrix that stores only rows with at least one
/// non-default value.
///
/// Asking for an absent row yields a dummy that reads as the default; a
/// mutable handle on an absent row allocates the row only when a non-default
/// value is written through it.
///
/// # Example
///
/// ```rust
/// use sparsetensor::SparseMatrix;
///
/// let mut m = SparseMatrix::new(3, 3, 0);
/// assert!(m.row(1).is_dummy());
///
/// let mut row = m.row_mut(1).unwrap();
/// row.set(2, 0).unwrap(); // default write: nothing allocated
/// assert!(row.is_dummy());
/// row.set(2, 7).unwrap();
/// assert!(!row.is_dummy());
///
/// assert_eq!(*m.get(1, 2), 7);
/// assert_eq!(m.stored_rows(), 1);
/// ```
#[derive(Clone)]
pub struct SparseMatrix<T> {
    rows: Vec<SparseMatrixRow<T>>,
    height: usize,
    width: usize,
    dummy: SparseMatrixRow<T>,
    recent: Cursor,
}

impl<T: Clone> SparseMatrix<T> {
    /// Create an empty matrix.
    pub fn new(height: usize, width: usize, default: T) -> Self {
        Self {
            rows: Vec::new(),
            height,
            width,
            dummy: SparseMatrixRow {
                row: SparseRow::with_capacity(width, default, 0),
                explicit_index: None,
            },
            recent: Cursor::default(),
        }
    }

    fn empty_like(&self, height: usize, width: usize) -> Self {
        Self::new(height, width, self.default_value().clone())
    }
}

impl<T> SparseMatrix<T> {
    // ========================================================================
    // Metadata
    // ========================================================================

    /// Number of logical rows.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of logical columns.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Value of every unstored entry.
    #[inline]
    pub fn default_value(&self) -> &T {
        self.dummy.row.default_value()
    }

    /// Number of materialized rows.
    #[inline]
    pub fn stored_rows(&self) -> usize {
        self.rows.len()
    }

    /// Number of stored entries across all rows.
    pub fn nnz(&self) -> usize {
        self.rows.iter().map(|r| r.nnz()).sum()
    }

    /// Materialized rows in ascending explicit index order.
    pub fn rows(&self) -> impl Iterator<Item = &SparseMatrixRow<T>> + '_ {
        self.rows.iter()
    }

    // ========================================================================
    // Row Access
    // ========================================================================

    fn locate_row(&self, index: usize) -> std::result::Result<usize, usize> {
        self.recent.seek(&self.rows, index, SparseMatrixRow::key)
    }

    fn check_row(&self, index: usize) -> Result<()> {
        if index >= self.height {
            return Err(Error::IndexOutOfBounds {
                index,
                size: self.height,
            });
        }
        Ok(())
    }

    /// Row at an explicit index, or the dummy row if it is not stored.
    pub fn row(&self, index: usize) -> &SparseMatrixRow<T> {
        match self.locate_row(index) {
            Ok(real) => &self.rows[real],
            Err(_) => &self.dummy,
        }
    }

    /// Mutable handle on a row that materializes it on first non-default
    /// write.
    pub fn row_mut(&mut self, index: usize) -> Result<RowMut<'_, T>> {
        self.check_row(index)?;
        let slot = self.locate_row(index);
        Ok(RowMut {
            matrix: self,
            index,
            slot,
        })
    }

    /// Value at `(row, column)`.
    pub fn get(&self, row: usize, column: usize) -> &T {
        self.row(row).get(column)
    }
}

impl<T: Clone + PartialEq> SparseMatrix<T> {
    /// Build a matrix from dense rows of equal length.
    pub fn from_dense(rows: &[Vec<T>], default: T) -> Result<Self> {
        let width = rows.first().map_or(0, Vec::len);
        let mut matrix = Self::new(rows.len(), width, default);
        for (i, values) in rows.iter().enumerate() {
            if values.len() != width {
                return Err(Error::shape_mismatch(&[width], &[values.len()]));
            }
            let row = SparseRow::from_dense(values, matrix.default_value().clone());
            if !row.is_empty() {
                let stored = SparseMatrixRow::stored(i, row);
                matrix.rows.push(stored);
            }
        }
        Ok(matrix)
    }

    /// Dense copy, row by row.
    pub fn to_dense(&self) -> Vec<Vec<T>> {
        (0..self.height)
            .map(|i| match self.locate_row(i) {
                Ok(real) => self.rows[real].to_dense(),
                Err(_) => vec![self.default_value().clone(); self.width],
            })
            .collect()
    }

    /// Write a value at `(row, column)`.
    pub fn set(&mut self, row: usize, column: usize, value: T) -> Result<()> {
        self.row_mut(row)?.set(column, value)
    }

    // ========================================================================
    // Structural Operations
    // ========================================================================

    /// Exchange two rows; either may be absent.
    pub fn swap_rows(&mut self, a: usize, b: usize) -> Result<()> {
        self.check_row(a)?;
        self.check_row(b)?;
        if a == b {
            return Ok(());
        }
        match (self.locate_row(a), self.locate_row(b)) {
            (Ok(ra), Ok(rb)) => {
                let (lo, hi) = (ra.min(rb), ra.max(rb));
                let (left, right) = self.rows.split_at_mut(hi);
                std::mem::swap(&mut left[lo].row, &mut right[0].row);
            }
            (Ok(ra), Err(_)) => self.move_row(ra, b),
            (Err(_), Ok(rb)) => self.move_row(rb, a),
            (Err(_), Err(_)) => {}
        }
        Ok(())
    }

    fn move_row(&mut self, real: usize, to: usize) {
        let mut moved = self.rows.remove(real);
        moved.explicit_index = Some(to);
        let position = match self.locate_row(to) {
            Ok(p) | Err(p) => p,
        };
        self.rows.insert(position, moved);
    }

    /// Exchange two columns in every stored row.
    pub fn swap_columns(&mut self, a: usize, b: usize) -> Result<()> {
        for index in [a, b] {
            if index >= self.width {
                return Err(Error::IndexOutOfBounds {
                    index,
                    size: self.width,
                });
            }
        }
        for r in &mut self.rows {
            r.row.swap_elements(a, b)?;
        }
        Ok(())
    }

    /// Apply column swaps in order.
    pub fn apply_column_swaps(&mut self, swaps: &[(usize, usize)]) -> Result<()> {
        for &(a, b) in swaps {
            self.swap_columns(a, b)?;
        }
        Ok(())
    }

    /// Keep rows `0..at` and return rows `at..height` as a new matrix with
    /// re-based explicit indices.
    pub fn split_at_row(&mut self, at: usize) -> Result<SparseMatrix<T>> {
        if at > self.height {
            return Err(Error::IndexOutOfBounds {
                index: at,
                size: self.height,
            });
        }
        let real = match self.locate_row(at) {
            Ok(r) | Err(r) => r,
        };
        let mut lower = self.empty_like(self.height - at, self.width);
        lower.rows = self.rows.split_off(real);
        for r in &mut lower.rows {
            r.explicit_index = r.explicit_index.map(|i| i - at);
        }
        self.height = at;
        self.recent.set(0);
        Ok(lower)
    }

    /// Keep columns `0..at` and return columns `at..width` as a new matrix.
    pub fn split_at_column(&mut self, at: usize) -> Result<SparseMatrix<T>> {
        if at > self.width {
            return Err(Error::IndexOutOfBounds {
                index: at,
                size: self.width,
            });
        }
        let mut right = self.empty_like(self.height, self.width - at);
        for r in &mut self.rows {
            let part = r.row.split_at(at)?;
            if !part.is_empty() {
                right.rows.push(SparseMatrixRow {
                    row: part,
                    explicit_index: r.explicit_index,
                });
            }
        }
        self.rows.retain(|r| !r.row.is_empty());
        self.width = at;
        self.dummy.row = SparseRow::with_capacity(at, self.default_value().clone(), 0);
        self.recent.set(0);
        Ok(right)
    }

    /// Remove rows `first..=last` and return them as a new matrix.
    ///
    /// Rows below the removed block move up to close the gap.
    pub fn remove_rows(&mut self, first: usize, last: usize) -> Result<SparseMatrix<T>> {
        self.check_row(last)?;
        if first > last {
            return Err(Error::InvalidArgument {
                arg: "first",
                reason: format!("range start {} is past its end {}", first, last),
            });
        }
        let count = last - first + 1;
        let mut removed = self.empty_like(count, self.width);
        let mut kept = Vec::with_capacity(self.rows.len());
        for mut r in self.rows.drain(..) {
            match r.explicit_index {
                Some(i) if i < first => kept.push(r),
                Some(i) if i <= last => {
                    r.explicit_index = Some(i - first);
                    removed.rows.push(r);
                }
                Some(i) => {
                    r.explicit_index = Some(i - count);
                    kept.push(r);
                }
                None => {}
            }
        }
        self.rows = kept;
        self.height -= count;
        self.recent.set(0);
        Ok(removed)
    }

    // ========================================================================
    // Algebra Operations
    // ========================================================================

    /// Element-wise `self + other`.
    pub fn sum<A: Algebra<Elem = T>>(&self, other: &Self) -> Result<Self> {
        if (self.height, self.width) != (other.height, other.width) {
            return Err(Error::shape_mismatch(
                &[self.height, self.width],
                &[other.height, other.width],
            ));
        }
        self.dummy.row.check_zero_default::<A>()?;
        other.dummy.row.check_zero_default::<A>()?;
        let lhs = self.indexed_rows();
        let rhs = other.indexed_rows();
        let merged = merge(&lhs, &rhs, |step| {
            let row = match step {
                Merged::Left(a) | Merged::Right(a) => SparseRow::clone(a),
                Merged::Both(a, b) => a.sum::<A>(b)?,
            };
            Ok((!row.is_empty()).then_some(row))
        })?;
        let mut result = self.empty_like(self.height, self.width);
        result.rows = merged
            .into_iter()
            .map(|e| SparseMatrixRow::stored(e.index, e.value))
            .collect();
        Ok(result)
    }

    /// Matrix times column vector.
    pub fn mul_vector<A: Algebra<Elem = T>>(&self, vector: &SparseRow<T>) -> Result<SparseRow<T>> {
        if vector.width() != self.width {
            return Err(Error::shape_mismatch(&[self.width], &[vector.width()]));
        }
        self.dummy.row.check_zero_default::<A>()?;
        vector.check_zero_default::<A>()?;
        let mut result = SparseRow::new(self.height, A::zero()?);
        for r in &self.rows {
            let value = r.row.dot::<A>(vector)?;
            if !A::is_zero(&value) {
                result.push(r.key(), value);
            }
        }
        Ok(result)
    }

    /// Row vector times matrix.
    pub fn vector_mul<A: Algebra<Elem = T>>(&self, vector: &SparseRow<T>) -> Result<SparseRow<T>> {
        if vector.width() != self.height {
            return Err(Error::shape_mismatch(&[self.height], &[vector.width()]));
        }
        self.dummy.row.check_zero_default::<A>()?;
        vector.check_zero_default::<A>()?;
        let mut result = SparseRow::new(self.width, A::zero()?);
        let rows = self.indexed_rows();
        for (_, coefficient, row) in intersect(vector.elements(), &rows) {
            result.sum_into::<A>(&row.map_values::<A>(|v| A::mul(coefficient, v))?)?;
        }
        Ok(result)
    }

    fn indexed_rows(&self) -> Vec<SparseElement<&SparseRow<T>>> {
        self.rows
            .iter()
            .map(|r| SparseElement::new(r.key(), &r.row))
            .collect()
    }
}

impl<T: PartialEq> PartialEq for SparseMatrix<T> {
    fn eq(&self, other: &Self) -> bool {
        self.height == other.height && self.width == other.width && self.rows == other.rows
    }
}

impl<T: fmt::Debug> fmt::Debug for SparseMatrix<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SparseMatrix")
            .field("height", &self.height)
            .field("width", &self.width)
            .field("rows", &self.rows)
            .finish()
    }
}

/// Mutable access to one matrix row, stored or not yet materialized.
///
/// For an absent row the handle remembers where the row would be inserted;
/// the first non-default write creates it there.
pub struct RowMut<'a, T> {
    matrix: &'a mut SparseMatrix<T>,
    index: usize,
    slot: std::result::Result<usize, usize>,
}

impl<T: Clone + PartialEq> RowMut<'_, T> {
    /// Explicit row index this handle refers to.
    pub fn explicit_index(&self) -> usize {
        self.index
    }

    /// Whether the row is still unmaterialized.
    pub fn is_dummy(&self) -> bool {
        self.slot.is_err()
    }

    /// Value at a column.
    pub fn get(&self, column: usize) -> &T {
        match self.slot {
            Ok(real) => self.matrix.rows[real].get(column),
            Err(_) => self.matrix.default_value(),
        }
    }

    /// Write a value at a column, materializing the row if needed.
    pub fn set(&mut self, column: usize, value: T) -> Result<()> {
        match self.slot {
            Ok(real) => self.matrix.rows[real].row.set(column, value),
            Err(position) => {
                if column >= self.matrix.width {
                    return Err(Error::IndexOutOfBounds {
                        index: column,
                        size: self.matrix.width,
                    });
                }
                if value == *self.matrix.default_value() {
                    return Ok(());
                }
                let mut row = SparseRow::new(self.matrix.width, self.matrix.default_value().clone());
                row.put(column, value);
                let stored = SparseMatrixRow::stored(self.index, row);
                self.matrix.rows.insert(position, stored);
                self.matrix.recent.set(position);
                self.slot = Ok(position);
                tracing::trace!(row = self.index, position, "materialized matrix row");
                Ok(())
            }
        }
    }
}
