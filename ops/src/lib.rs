//! Hand-authored tensor operator kernels.
//!
//! Most operators are declarative tensor expressions and never touch this
//! crate. The ones that cannot be expressed that way are written here
//! directly against the [`kirin_ir`] builder and packaged as extern-bound
//! kernels for the downstream compiler. A few others are pure forwards to
//! the precompiled native operator library.
//!
//! # Module Organization
//!
//! - [`hardmax`] - One-hot-of-maximum kernel, built imperatively
//! - [`extern_op`] - Sealed kernel body plus its tensor-binding contract
//! - [`native`] - Forwarding wrappers over the native operator library
//! - [`error`] - Error types and result handling

pub mod error;
pub mod extern_op;
pub mod hardmax;
pub mod native;

#[cfg(test)]
mod test;

pub use error::{Error, Result};
pub use extern_op::ExternOp;
pub use hardmax::hardmax;
pub use native::{elemwise_sum, full, full_like, NativeLibrary, TensorNode};
