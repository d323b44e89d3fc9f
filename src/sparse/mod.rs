//! Sparse storage substrate.
//!
//! - [`SparseRow`]: a sorted list of `(virtual index, value)` pairs with a
//!   locality cache for index translation
//! - [`SparseMatrix`]: rows of [`SparseRow`]s where absent rows are
//!   materialized on first write
//!
//! Arithmetic on rows is driven by an [`Algebra`](crate::algebra::Algebra)
//! chosen per call, e.g. `row.sum::<Standard<f64>>(&other)`.

mod cursor;
mod matrix;
mod ops;
mod row;

pub(crate) use ops::{intersect, merge, Merged};

pub use matrix::{RowMut, SparseMatrix, SparseMatrixRow};
pub use row::{SparseElement, SparseRow};
