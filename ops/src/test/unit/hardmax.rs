use kirin_ir::{DType, TensorRole};
use test_case::test_case;

use super::run_unary;
use crate::error::Error;
use crate::hardmax::hardmax;

#[test]
fn test_worked_example() {
    // Rows of a (2, 3) matrix, reduced along axis 1.
    let op = hardmax(&[2, 3], 1, DType::Float32).unwrap();
    let out = run_unary(&op, vec![1.0, 5.0, 3.0, 9.0, 2.0, 2.0]);
    assert_eq!(out, vec![0.0, 1.0, 0.0, 1.0, 0.0, 0.0]);
}

#[test]
fn test_tie_resolves_to_lowest_offset() {
    let op = hardmax(&[1, 3], 1, DType::Float32).unwrap();
    let out = run_unary(&op, vec![4.0, 4.0, 1.0]);
    assert_eq!(out, vec![1.0, 0.0, 0.0]);
}

#[test]
fn test_axis_extent_one_is_all_ones() {
    // Every column holds a single element, which is trivially its maximum.
    let op = hardmax(&[3, 1], 1, DType::Float32).unwrap();
    let out = run_unary(&op, vec![-7.0, 0.0, 2.5]);
    assert_eq!(out, vec![1.0, 1.0, 1.0]);
}

#[test]
fn test_middle_axis() {
    // (2, 2, 2) along axis 1: columns are (i, *, k) pairs.
    let op = hardmax(&[2, 2, 2], 1, DType::Float32).unwrap();
    let data = vec![
        1.0, 8.0, // i=0, j=0
        5.0, 2.0, // i=0, j=1
        3.0, 3.0, // i=1, j=0
        4.0, 3.0, // i=1, j=1
    ];
    let out = run_unary(&op, data);
    assert_eq!(out, vec![0.0, 1.0, 1.0, 0.0, 0.0, 1.0, 1.0, 0.0]);
}

#[test]
fn test_negative_axis_counts_from_the_end() {
    let data = vec![1.0, 5.0, 3.0, 9.0, 2.0, 2.0];
    let from_end = hardmax(&[2, 3], -1, DType::Float32).unwrap();
    let explicit = hardmax(&[2, 3], 1, DType::Float32).unwrap();
    assert_eq!(run_unary(&from_end, data.clone()), run_unary(&explicit, data));
}

#[test]
fn test_integer_elements() {
    let op = hardmax(&[1, 3], 1, DType::Int32).unwrap();
    let out = run_unary(&op, vec![3.0, 7.0, 5.0]);
    assert_eq!(out, vec![0.0, 1.0, 0.0]);
}

#[test]
fn test_all_negative_column() {
    // -inf initialization: the maximum of a fully negative column still wins.
    let op = hardmax(&[1, 3], 1, DType::Float32).unwrap();
    let out = run_unary(&op, vec![-30.0, -1.0, -20.0]);
    assert_eq!(out, vec![0.0, 1.0, 0.0]);
}

#[test]
fn test_idempotent() {
    let op = hardmax(&[2, 3], 1, DType::Float32).unwrap();
    let once = run_unary(&op, vec![1.0, 5.0, 3.0, 9.0, 2.0, 2.0]);
    let twice = run_unary(&op, once.clone());
    assert_eq!(once, twice);
}

#[test]
fn test_binding_contract() {
    let op = hardmax(&[4, 2], 0, DType::Float64).unwrap();
    assert_eq!(op.name(), "hardmax");
    assert_eq!(op.inputs().len(), 1);
    assert_eq!(op.inputs()[0].role(), TensorRole::Input);
    assert_eq!(op.input_views().len(), 1);
    assert_ne!(op.input_views()[0], op.output_view());
    assert_eq!(op.output_shape().as_slice(), &[4, 2]);
    assert_eq!(op.output_dtype(), DType::Float64);
}

#[test_case(&[2, 3], 5; "too large")]
#[test_case(&[2, 3], -3; "too negative")]
fn test_axis_out_of_range(shape: &[isize], axis: isize) {
    let err = hardmax(shape, axis, DType::Float32).unwrap_err();
    assert!(matches!(err, Error::Ir { source: kirin_ir::Error::AxisOutOfRange { rank: 2, .. } }), "{err:?}");
}

#[test_case(&[2, 0], 0; "zero dim")]
#[test_case(&[-1, 3], 0; "negative dim")]
fn test_invalid_shape(shape: &[isize], axis: isize) {
    let err = hardmax(shape, axis, DType::Float32).unwrap_err();
    assert!(matches!(err, Error::Ir { source: kirin_ir::Error::InvalidShape { .. } }), "{err:?}");
}

#[test]
fn test_bool_elements_rejected() {
    let err = hardmax(&[2, 3], 1, DType::Bool).unwrap_err();
    assert!(matches!(err, Error::UnsupportedElementType { ref dtype } if *dtype == DType::Bool), "{err:?}");
}
