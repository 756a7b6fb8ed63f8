//! Forwarding wrappers around the precompiled operator library.
//!
//! These operators already exist as tuned native kernels; nothing is
//! authored in IR for them. The wrappers only shuttle arguments through the
//! [`NativeLibrary`] seam, with `full_like` reading shape and dtype off its
//! input node before delegating to `full`.

use kirin_ir::{ConstValue, DType, Shape};

/// Handle to a tensor owned by the native library.
pub trait TensorNode {
    fn shape(&self) -> &Shape;
    fn dtype(&self) -> DType;
}

/// The precompiled operator library.
///
/// Implementations own validation of their arguments; the free functions
/// below add no checks of their own.
pub trait NativeLibrary {
    type Tensor: TensorNode;

    /// Element-wise sum of same-shaped tensors.
    fn elemwise_sum(&self, xs: &[Self::Tensor]) -> Self::Tensor;

    /// Tensor of the given shape and dtype filled with one value.
    fn full(&self, shape: &Shape, dtype: DType, fill_value: ConstValue) -> Self::Tensor;
}

/// Element-wise sum of `xs`, delegated to the native library.
pub fn elemwise_sum<L: NativeLibrary>(lib: &L, xs: &[L::Tensor]) -> L::Tensor {
    lib.elemwise_sum(xs)
}

/// Filled tensor of the given shape and dtype, delegated to the native
/// library.
pub fn full<L: NativeLibrary>(lib: &L, shape: &Shape, dtype: DType, fill_value: ConstValue) -> L::Tensor {
    lib.full(shape, dtype, fill_value)
}

/// Filled tensor shaped and typed like `x`.
pub fn full_like<L: NativeLibrary>(lib: &L, x: &L::Tensor, fill_value: ConstValue) -> L::Tensor {
    lib.full(x.shape(), x.dtype(), fill_value)
}
