//! Integration tests for tensor products and contraction.

use sparsetensor::{Error, Standard, Tensor};

type T64 = Tensor<Standard<f64>>;
type I64 = Tensor<Standard<i64>>;

/// Dense reference product of row-major `m × k` and `k × n` matrices.
fn matmul(a: &[i64], b: &[i64], m: usize, k: usize, n: usize) -> Vec<i64> {
    let mut c = vec![0; m * n];
    for i in 0..m {
        for j in 0..n {
            c[i * n + j] = (0..k).map(|l| a[i * k + l] * b[l * n + j]).sum();
        }
    }
    c
}

#[test]
fn test_matmul_3x3_hand_computed() {
    let a = T64::from_flat(&[3, 3], &[1.0, 2.0, 0.0, 0.0, 1.0, 3.0, 4.0, 0.0, 1.0]).unwrap();
    let b = T64::from_flat(&[3, 3], &[2.0, 0.0, 1.0, 1.0, 3.0, 0.0, 0.0, 1.0, 5.0]).unwrap();
    let c = a.contract_top(&b, 1, 0).unwrap();

    // [[1,2,0],[0,1,3],[4,0,1]] @ [[2,0,1],[1,3,0],[0,1,5]]
    assert_eq!(c.structure(), &[3, 3]);
    assert_eq!(
        c.to_flat().unwrap(),
        vec![4.0, 6.0, 1.0, 1.0, 6.0, 15.0, 8.0, 1.0, 9.0]
    );
}

#[test]
fn test_rectangular_matches_reference() {
    let a: Vec<i64> = (0..12).map(|x| if x % 3 == 1 { 0 } else { x - 5 }).collect();
    let b: Vec<i64> = (0..8).map(|x| if x % 2 == 0 { x } else { 0 }).collect();
    let ta = I64::from_flat(&[3, 4], &a).unwrap();
    let tb = I64::from_flat(&[4, 2], &b).unwrap();
    let tc = ta.contract_top(&tb, 1, 0).unwrap();
    assert_eq!(tc.to_flat().unwrap(), matmul(&a, &b, 3, 4, 2));
}

#[test]
fn test_contract_other_axes() {
    // Σ_j A[j, i] B[j, k] = (Aᵀ B)[i, k]
    let a = I64::from_flat(&[2, 3], &[1, 2, 3, 4, 5, 6]).unwrap();
    let b = I64::from_flat(&[2, 2], &[1, 0, 0, 1]).unwrap();
    let c = a.contract_top(&b, 0, 0).unwrap();
    assert_eq!(c.structure(), &[3, 2]);
    assert_eq!(c.to_flat().unwrap(), vec![1, 4, 2, 5, 3, 6]);
}

#[test]
fn test_rank_three_contraction_structure() {
    let mut a = I64::new(&[2, 3, 4]).unwrap();
    a.set(&[1, 2, 3], 2).unwrap();
    a.set(&[0, 1, 3], 5).unwrap();
    let mut b = I64::new(&[4, 5]).unwrap();
    b.set(&[3, 4], 7).unwrap();

    let c = a.contract_top(&b, 2, 0).unwrap();
    assert_eq!(c.structure(), &[2, 3, 5]);
    assert_eq!(c.rank(), a.rank() + b.rank() - 2);
    assert_eq!(c.nnz(), 2);
    assert_eq!(*c.get(&[1, 2, 4]).unwrap(), 14);
    assert_eq!(*c.get(&[0, 1, 4]).unwrap(), 35);
}

#[test]
fn test_disjoint_sparsity_gives_empty_result() {
    let a = I64::from_flat(&[2, 3], &[1, 0, 0, 1, 0, 0]).unwrap();
    let b = I64::from_flat(&[3, 2], &[0, 0, 1, 1, 1, 1]).unwrap();
    let c = a.contract_top(&b, 1, 0).unwrap();
    assert!(c.is_empty());
    assert_eq!(c.structure(), &[2, 2]);
}

#[test]
fn test_vector_dot_is_rank_zero() {
    let u = I64::from_flat(&[3], &[1, 2, 3]).unwrap();
    let v = I64::from_flat(&[3], &[4, 0, 6]).unwrap();
    let d = u.contract_top(&v, 0, 0).unwrap();
    assert_eq!(d.rank(), 0);
    assert_eq!(d.scalar_value(), Some(&22));
}

#[test]
fn test_contraction_errors() {
    let a = I64::new(&[2, 3]).unwrap();
    let b = I64::new(&[2, 3]).unwrap();
    assert!(matches!(
        a.contract_top(&b, 1, 0),
        Err(Error::ShapeMismatch { .. })
    ));
    assert!(matches!(
        a.contract_top(&b, 2, 0),
        Err(Error::InvalidDimension { dim: 2, ndim: 2 })
    ));
}

#[test]
fn test_reduce_rank_and_slices() {
    let t = I64::from_flat(&[2, 3], &[1, 0, 2, 0, 0, 3]).unwrap();
    assert_eq!(t.reduce_rank(1, 2).unwrap().to_flat().unwrap(), vec![2, 3]);
    assert_eq!(t.reduce_rank(0, 1).unwrap().to_flat().unwrap(), vec![0, 0, 3]);
    assert!(t.reduce_rank(1, 3).is_err());

    let slices = t.slices_along(1).unwrap();
    let indices: Vec<_> = slices.iter().map(|(i, _)| *i).collect();
    assert_eq!(indices, vec![0, 2]);
}

#[test]
fn test_trace_and_self_contract() {
    let t = I64::from_flat(&[3, 3], &[1, 2, 3, 4, 5, 6, 7, 8, 9]).unwrap();
    assert_eq!(t.trace().unwrap(), 15);

    let mut cube = I64::new(&[2, 3, 2]).unwrap();
    cube.set(&[0, 1, 0], 4).unwrap();
    cube.set(&[1, 1, 1], 6).unwrap();
    cube.set(&[1, 2, 0], 9).unwrap();
    let partial = cube.self_contract(0, 2).unwrap();
    assert_eq!(partial.to_flat().unwrap(), vec![0, 10, 0]);
    assert!(cube.self_contract(1, 1).is_err());
}

#[test]
fn test_tensor_product() {
    let u = I64::from_flat(&[2], &[0, 3]).unwrap();
    let m = I64::from_flat(&[2, 2], &[1, 0, 0, 2]).unwrap();
    let p = u.tensor_product(&m).unwrap();
    assert_eq!(p.structure(), &[2, 2, 2]);
    assert_eq!(p.to_flat().unwrap(), vec![0, 0, 0, 0, 3, 0, 0, 6]);
    assert_eq!(p.nnz(), 2);
}
