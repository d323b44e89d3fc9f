//! Integration tests for tensor construction and element-wise arithmetic.

use approx::assert_relative_eq;
use sparsetensor::{Complex64, Error, FnAlgebra, Func2, NoAlgebra, Standard, Tensor};

type T64 = Tensor<Standard<f64>>;

#[test]
fn test_rank_three_set_get() {
    let mut t = T64::new(&[4, 5, 6]).unwrap();
    t.set(&[3, 0, 5], 1.25).unwrap();
    t.set(&[0, 4, 0], -2.0).unwrap();
    assert_eq!(t.rank(), 3);
    assert_eq!(t.nnz(), 2);
    assert_eq!(*t.get(&[3, 0, 5]).unwrap(), 1.25);
    assert_eq!(*t.get(&[3, 0, 4]).unwrap(), 0.0);
    assert_eq!(t.children().count(), 2);

    t.set(&[3, 0, 5], 0.0).unwrap();
    assert_eq!(t.children().count(), 1);
    assert!(matches!(
        t.get(&[4, 0, 0]),
        Err(Error::IndexOutOfBounds { index: 4, size: 4 })
    ));
    assert!(matches!(t.get(&[0, 0]), Err(Error::InvalidArgument { .. })));
}

#[test]
fn test_deep_copy_is_independent() {
    let a = T64::from_flat(&[2, 2], &[1.0, 2.0, 0.0, 4.0]).unwrap();
    let mut b = a.clone();
    b.set(&[0, 0], 10.0).unwrap();
    b.set(&[1, 0], 3.0).unwrap();
    assert_eq!(*a.get(&[0, 0]).unwrap(), 1.0);
    assert_eq!(*a.get(&[1, 0]).unwrap(), 0.0);
    assert!(!a.equal_s(&b));
}

#[test]
fn test_additive_inverse() {
    let a = T64::from_flat(&[2, 3], &[1.0, 0.0, -2.0, 0.5, 0.0, 7.0]).unwrap();
    let zero = a.sum(&a.negated().unwrap()).unwrap();
    assert!(zero.is_empty());
    assert!(zero.equal_s(&T64::new(&[2, 3]).unwrap()));
}

#[test]
fn test_in_place_mismatch_is_all_or_nothing() {
    let mut a = T64::from_flat(&[2, 2], &[1.0, 2.0, 3.0, 4.0]).unwrap();
    let before = a.clone();
    let b = T64::from_flat(&[2, 3], &[1.0; 6]).unwrap();
    assert!(matches!(a.sub_into(&b), Err(Error::ShapeMismatch { .. })));
    assert!(a.equal_s(&before));
}

#[test]
fn test_integer_division_by_zero_surfaces() {
    let a = Tensor::<Standard<i64>>::from_flat(&[2], &[4, 6]).unwrap();
    assert_eq!(a.scaled(&3).unwrap().to_flat().unwrap(), vec![12, 18]);
    assert!(matches!(
        <Standard<i64> as sparsetensor::Algebra>::div(&4, &0),
        Err(Error::DivisionByZero)
    ));
}

#[test]
fn test_integer_overflow_surfaces() {
    let mut a = Tensor::<Standard<i32>>::from_flat(&[2], &[i32::MAX, 1]).unwrap();
    let before = a.clone();
    let b = Tensor::<Standard<i32>>::from_flat(&[2], &[1, 1]).unwrap();
    assert!(matches!(a.sum_into(&b), Err(Error::Overflow { op: "sum" })));
    assert!(a.equal_s(&before));
    assert!(matches!(a.scaled(&2), Err(Error::Overflow { op: "mul" })));
    assert!(matches!(
        <Standard<i32> as sparsetensor::Algebra>::div(&i32::MIN, &-1),
        Err(Error::Overflow { op: "div" })
    ));
}

#[test]
fn test_complex_tensor() {
    let i = Complex64::new(0.0, 1.0);
    let mut t = Tensor::<Standard<Complex64>>::new(&[2]).unwrap();
    t.set(&[1], i).unwrap();
    let squared = t.scaled(&i).unwrap();
    let v = squared.get(&[1]).unwrap();
    assert_relative_eq!(v.re, -1.0);
    assert_relative_eq!(v.im, 0.0);
}

#[test]
fn test_function_tensor_arithmetic() {
    let mut a = Tensor::<FnAlgebra>::new(&[2, 2]).unwrap();
    a.set(&[0, 1], Some(Func2::new(|x, y| x * y))).unwrap();
    let b = a.negated().unwrap();
    let f = b.get(&[0, 1]).unwrap().as_ref().unwrap();
    assert_eq!(f.eval(2.0, 3.0), -6.0);
    assert!(b.get(&[1, 1]).unwrap().is_none());
}

#[test]
fn test_placeholder_algebra_refuses() {
    let err = Tensor::<NoAlgebra<u8>>::new(&[2]).unwrap_err();
    assert!(matches!(err, Error::NotSupported { .. }));
}

#[test]
fn test_debug_lists_entries() {
    let t = T64::from_flat(&[2], &[0.0, 3.0]).unwrap();
    let text = format!("{:?}", t);
    assert!(text.contains("structure: [2]"));
    assert!(text.contains("nnz: 1"));
}
