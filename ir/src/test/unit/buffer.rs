//! Buffer view direction and lifetime tests.

use kirin_dtype::{DType, ScalarDType};
use smallvec::smallvec;

use crate::{Direction, Error, Expr, KernelBuilder, TensorArg, TensorRole};

fn input_arg() -> TensorArg {
    TensorArg::input(smallvec![4], DType::Float32)
}

fn output_arg() -> TensorArg {
    TensorArg::output(smallvec![4], DType::Float32)
}

#[test]
fn test_view_direction_must_match_role() {
    let mut ib = KernelBuilder::new();

    assert!(ib.buffer_view(&input_arg(), Direction::ReadOnly).is_ok());
    assert!(ib.buffer_view(&output_arg(), Direction::WriteOnly).is_ok());

    let err = ib.buffer_view(&input_arg(), Direction::WriteOnly).unwrap_err();
    assert_eq!(err, Error::TypeMismatch { direction: Direction::WriteOnly, access: "wrap an input tensor" });

    let err = ib.buffer_view(&output_arg(), Direction::ReadOnly).unwrap_err();
    assert_eq!(err, Error::TypeMismatch { direction: Direction::ReadOnly, access: "wrap an output tensor" });
}

#[test]
fn test_view_ids_are_session_unique() {
    let mut ib = KernelBuilder::new();
    let a = ib.buffer_view(&input_arg(), Direction::ReadOnly).unwrap();
    let b = ib.buffer_view(&output_arg(), Direction::WriteOnly).unwrap();
    assert_ne!(a.id(), b.id());
}

#[test]
fn test_view_is_a_pointer_over_elements() {
    let mut ib = KernelBuilder::new();
    let view = ib.buffer_view(&TensorArg::input(smallvec![2, 3], DType::Float64), Direction::ReadOnly).unwrap();
    assert_eq!(view.len(), 6);
    assert!(view.dtype().is_ptr());
    assert_eq!(view.dtype().base(), ScalarDType::Float64);
    assert_eq!(view.element_dtype(), DType::Float64);
}

#[test]
fn test_load_through_write_only_view_fails() {
    let mut ib = KernelBuilder::new();
    let out = ib.buffer_view(&output_arg(), Direction::WriteOnly).unwrap();
    let err = out.load(&Expr::index_const(0)).unwrap_err();
    assert_eq!(err, Error::TypeMismatch { direction: Direction::WriteOnly, access: "load" });
}

#[test]
fn test_store_through_read_only_view_fails() {
    let mut ib = KernelBuilder::new();
    let input = ib.buffer_view(&input_arg(), Direction::ReadOnly).unwrap();
    let value = Expr::const_(DType::Float32, crate::ConstValue::Float(1.0));
    let err = ib.store(&input, &Expr::index_const(0), &value).unwrap_err();
    assert_eq!(err, Error::TypeMismatch { direction: Direction::ReadOnly, access: "store" });
}

#[test]
fn test_load_bounds_checks_constant_offsets() {
    let mut ib = KernelBuilder::new();
    let input = ib.buffer_view(&input_arg(), Direction::ReadOnly).unwrap();
    assert!(input.load(&Expr::index_const(3)).is_ok());
    assert_eq!(input.load(&Expr::index_const(4)).unwrap_err(), Error::IndexOutOfBounds { index: 4, len: 4 });
}

#[test]
fn test_load_after_seal_fails() {
    let mut ib = KernelBuilder::new();
    let input = ib.buffer_view(&input_arg(), Direction::ReadOnly).unwrap();
    ib.seal().unwrap();

    let err = input.load(&Expr::index_const(0)).unwrap_err();
    assert_eq!(err, Error::UseAfterSeal { what: "buffer view" });
}

#[test]
fn test_tensor_arg_accessors() {
    let arg = TensorArg::input(smallvec![2, 3], DType::Float32);
    assert_eq!(arg.role(), TensorRole::Input);
    assert_eq!(arg.shape().as_slice(), &[2, 3]);
    assert_eq!(arg.dtype(), DType::Float32);
}
