//! Expression construction tests.

use std::rc::Rc;

use kirin_dtype::DType;

use crate::types::{ConstValue, ConstValueHash};
use crate::{Error, Expr, ExprOp};

#[test]
fn test_const_carries_dtype_and_value() {
    let c = Expr::const_(DType::Float32, ConstValue::Float(1.5));
    assert_eq!(c.dtype(), DType::Float32);
    assert_eq!(c.as_const(), Some(ConstValue::Float(1.5)));
}

#[test]
fn test_index_const_is_int32() {
    let idx = Expr::index_const(7);
    assert_eq!(idx.dtype(), DType::Int32);
    assert_eq!(idx.as_const(), Some(ConstValue::Int(7)));
}

#[test]
fn test_binary_preserves_dtype() {
    let a = Expr::index_const(2);
    let b = Expr::index_const(3);
    let sum = a.try_add(&b).unwrap();
    assert_eq!(sum.dtype(), DType::Int32);
    assert!(matches!(sum.op(), ExprOp::Binary(crate::BinaryOp::Add, _, _)));
}

#[test]
fn test_binary_rejects_mixed_dtypes() {
    let a = Expr::index_const(2);
    let b = Expr::const_(DType::Float32, ConstValue::Float(3.0));
    let err = a.try_mul(&b).unwrap_err();
    assert_eq!(err, Error::DTypeMismatch { op: "Mul", lhs: DType::Int32, rhs: DType::Float32 });
}

#[test]
fn test_comparison_yields_bool() {
    let a = Expr::const_(DType::Float32, ConstValue::Float(1.0));
    let b = Expr::const_(DType::Float32, ConstValue::Float(2.0));
    let cmp = a.try_cmp_gt(&b).unwrap();
    assert_eq!(cmp.dtype(), DType::Bool);
}

#[test]
fn test_cast_same_dtype_is_identity() {
    let a = Expr::const_(DType::Float32, ConstValue::Float(1.0));
    let cast = Expr::cast(&a, DType::Float32);
    assert!(Rc::ptr_eq(&a, &cast));
}

#[test]
fn test_cast_changes_dtype() {
    let a = Expr::const_(DType::Float64, ConstValue::Float(1.0));
    let cast = Expr::cast(&a, DType::Float32);
    assert_eq!(cast.dtype(), DType::Float32);
    assert!(matches!(cast.op(), ExprOp::Cast { .. }));
}

#[test]
fn test_const_hash_nan_bit_equality() {
    let a = ConstValueHash(ConstValue::Float(f64::NAN));
    let b = ConstValueHash(ConstValue::Float(f64::NAN));
    assert_eq!(a, b);
    assert_ne!(ConstValueHash(ConstValue::Float(0.0)), ConstValueHash(ConstValue::Float(-0.0)));
}

#[test]
fn test_display() {
    let product = Expr::index_const(2).try_mul(&Expr::index_const(3)).unwrap();
    assert_eq!(product.to_string(), "(2 * 3)");

    let sum = product.try_add(&Expr::index_const(1)).unwrap();
    assert_eq!(sum.to_string(), "((2 * 3) + 1)");
}
