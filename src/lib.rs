//! # sparsetensor
//!
//! Sparse multi-rank tensors whose arithmetic is supplied by a swappable algebra.
//!
//! ## Features
//!
//! - **Algebra-agnostic**: the same containers hold reals, integers, complex numbers
//!   or functions of two variables, with all arithmetic routed through [`Algebra`]
//! - **Sparse all the way down**: only non-zero leaves and non-empty subtensors are stored
//! - **Contraction**: generalized matrix multiplication over any pair of axes
//! - **Bracket exchange format**: `{{1, 2}, {3, 4}}` text parsed into a [`Hierarchy`]
//!   and converted to and from rectangular arrays and tensors
//!
//! ## Quick Start
//!
//! ```rust
//! use sparsetensor::{Hierarchy, Standard, Tensor};
//!
//! let a = Tensor::<Standard<f64>>::from_flat(&[2, 2], &[1.0, 2.0, 3.0, 4.0]).unwrap();
//! let b: Hierarchy<f64> = "{{5, 6}, {7, 8}}".parse().unwrap();
//! let b = Tensor::<Standard<f64>>::from_hierarchy(&b).unwrap();
//!
//! // C[i,k] = Σ_j A[i,j] × B[j,k]
//! let c = a.contract_top(&b, 1, 0).unwrap();
//! assert_eq!(c.to_hierarchy().unwrap().to_string(), "{{19, 22}, {43, 50}}");
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      Hierarchy<T>                           │
//! │   parse("{{1, 2}, {3, 4}}") ⇄ Display / write_to           │
//! │   to_array() ⇄ from_array()  (rectangular NdArray)         │
//! └─────────────────────────────────────────────────────────────┘
//!                               │
//!                               ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       Tensor<A>                             │
//! │   sum / sub / negated / scaled (+ *_into variants)         │
//! │   tensor_product, reduce_rank, contract_top, trace         │
//! └─────────────────────────────────────────────────────────────┘
//!                               │
//!                               ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │              SparseRow<T> / SparseMatrix<T>                 │
//! │   sorted (index, value) pairs + cursor cache               │
//! │   dummy rows materialized on first write                   │
//! └─────────────────────────────────────────────────────────────┘
//!                               │
//!                               ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   Algebra dispatch                          │
//! │   Standard<T>: (+, -, ×, ÷) over f32/f64/i32/i64/complex   │
//! │   FnAlgebra:   pointwise on f(x, y)                        │
//! │   NoAlgebra<T>: refuses every operation                    │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod algebra;
pub mod error;
pub mod hierarchy;
pub mod sparse;
pub mod tensor;

// Re-exports
pub use algebra::{Algebra, Complex32, Complex64, FnAlgebra, Func2, NoAlgebra, Scalar, Standard};
pub use error::{Error, Result};
pub use hierarchy::{Hierarchy, NdArray, Nested, NodeId, RankedNode};
pub use sparse::{RowMut, SparseElement, SparseMatrix, SparseMatrixRow, SparseRow};
pub use tensor::Tensor;
