//! Integration tests for sparse matrices and their dummy rows.

use sparsetensor::{Error, SparseMatrix, SparseRow, Standard};

type F = Standard<f64>;

fn diagonal(n: usize) -> SparseMatrix<f64> {
    let mut m = SparseMatrix::new(n, n, 0.0);
    for i in 0..n {
        m.set(i, i, (i + 1) as f64).unwrap();
    }
    m
}

#[test]
fn test_absent_rows_stay_unallocated() {
    let mut m = SparseMatrix::new(100, 100, 0.0);
    for i in 0..100 {
        assert_eq!(*m.get(i, i), 0.0);
        assert!(m.row(i).is_dummy());
    }
    m.row_mut(50).unwrap().set(3, 0.0).unwrap();
    assert_eq!(m.stored_rows(), 0);
    m.row_mut(50).unwrap().set(3, 1.5).unwrap();
    assert_eq!(m.stored_rows(), 1);
    assert_eq!(m.row(50).explicit_index(), Some(50));
}

#[test]
fn test_handle_writes_after_materialization() {
    let mut m = SparseMatrix::new(4, 4, 0);
    let mut row = m.row_mut(2).unwrap();
    assert!(row.is_dummy());
    assert_eq!(row.explicit_index(), 2);
    row.set(0, 5).unwrap();
    row.set(3, 6).unwrap();
    assert!(!row.is_dummy());
    assert_eq!(*row.get(3), 6);
    assert!(row.set(4, 1).is_err());
    assert_eq!(m.to_dense()[2], vec![5, 0, 0, 6]);
    assert_eq!(m.nnz(), 2);
}

#[test]
fn test_rows_keep_order_when_materialized_out_of_order() {
    let mut m = SparseMatrix::new(5, 2, 0);
    for &r in &[4, 0, 2] {
        m.set(r, 1, r as i32 + 1).unwrap();
    }
    let order: Vec<_> = m.rows().filter_map(|r| r.explicit_index()).collect();
    assert_eq!(order, vec![0, 2, 4]);
    assert!(matches!(
        m.row_mut(5),
        Err(Error::IndexOutOfBounds { index: 5, size: 5 })
    ));
}

#[test]
fn test_swap_rows_and_columns() {
    let mut m = diagonal(3);
    m.swap_rows(0, 2).unwrap();
    assert_eq!(
        m.to_dense(),
        vec![vec![0.0, 0.0, 3.0], vec![0.0, 2.0, 0.0], vec![1.0, 0.0, 0.0]]
    );
    m.swap_columns(0, 2).unwrap();
    assert_eq!(
        m.to_dense(),
        vec![vec![3.0, 0.0, 0.0], vec![0.0, 2.0, 0.0], vec![0.0, 0.0, 1.0]]
    );
}

#[test]
fn test_swap_with_absent_row() {
    let mut m = SparseMatrix::new(3, 2, 0);
    m.set(0, 1, 9).unwrap();
    m.swap_rows(0, 2).unwrap();
    assert!(m.row(0).is_dummy());
    assert_eq!(*m.get(2, 1), 9);
    assert_eq!(m.row(2).explicit_index(), Some(2));
}

#[test]
fn test_matrix_vector_products() {
    let m = SparseMatrix::from_dense(
        &[vec![1.0, 0.0, 2.0], vec![0.0, 0.0, 0.0], vec![0.0, 3.0, 0.0]],
        0.0,
    )
    .unwrap();
    let v = SparseRow::from_dense(&[1.0, 1.0, 1.0], 0.0);
    assert_eq!(m.mul_vector::<F>(&v).unwrap().to_dense(), vec![3.0, 0.0, 3.0]);
    assert_eq!(m.vector_mul::<F>(&v).unwrap().to_dense(), vec![1.0, 3.0, 2.0]);
    assert!(m.mul_vector::<F>(&SparseRow::new(2, 0.0)).is_err());
}

#[test]
fn test_matrix_sum_drops_cancelled_rows() {
    let a = diagonal(3);
    let mut b = SparseMatrix::new(3, 3, 0.0);
    b.set(1, 1, -2.0).unwrap();
    b.set(2, 0, 4.0).unwrap();
    let s = a.sum::<F>(&b).unwrap();
    assert_eq!(s.stored_rows(), 2);
    assert!(s.row(1).is_dummy());
    assert_eq!(s.to_dense()[2], vec![4.0, 0.0, 3.0]);
    assert!(a.sum::<F>(&SparseMatrix::new(3, 2, 0.0)).is_err());
}

#[test]
fn test_remove_rows_renumbers() {
    let mut m = diagonal(5);
    let removed = m.remove_rows(1, 2).unwrap();
    assert_eq!(m.height(), 3);
    assert_eq!(removed.height(), 2);
    assert_eq!(*removed.get(1, 2), 3.0);
    assert_eq!(*m.get(1, 3), 4.0);
    assert_eq!(*m.get(2, 4), 5.0);
    assert!(m.remove_rows(2, 1).is_err());
}

#[test]
fn test_split_at_column() {
    let mut m = diagonal(4);
    let right = m.split_at_column(2).unwrap();
    assert_eq!(m.width(), 2);
    assert_eq!(right.width(), 2);
    assert_eq!(m.stored_rows(), 2);
    assert_eq!(right.stored_rows(), 2);
    assert_eq!(*right.get(3, 1), 4.0);
    assert_eq!(*m.get(3, 1), 0.0);
}

#[test]
fn test_from_dense_rejects_ragged_rows() {
    let err = SparseMatrix::from_dense(&[vec![1, 2], vec![3]], 0).unwrap_err();
    assert!(matches!(err, Error::ShapeMismatch { .. }));
}
