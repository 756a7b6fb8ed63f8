//! Statement-tree kernel IR for hand-authored tensor operator bodies.
//!
//! Some computations cannot be expressed as a declarative tensor expression
//! (tracking the *index* of a running maximum, for example). For those, a
//! kernel body is assembled imperatively: a [`KernelBuilder`] session emits
//! loops, conditionals, buffer stores and scratch stores, then seals them
//! into an immutable [`Stmt`] tree that a downstream lowering stage consumes.
//!
//! # Module Organization
//!
//! - [`types`] - Constant values and operator enums
//! - [`expr`] - Expression nodes (loads, constants, arithmetic, comparisons)
//! - [`stmt`] - Statement nodes (sequences, loops, conditionals, stores)
//! - [`shape`] - Shape validation and row-major addressing helpers
//! - [`buffer`] - Directional views over externally-owned tensor memory
//! - [`scratch`] - Session-local scratch storage
//! - [`builder`] - The scoped builder session
//! - [`interp`] - Reference interpreter for sealed trees
//! - [`error`] - Error types and result handling

pub mod buffer;
pub mod builder;
pub mod error;
pub mod expr;
pub mod interp;
pub mod prelude;
pub mod scratch;
pub mod shape;
pub mod stmt;
pub mod types;

#[cfg(test)]
mod test;

pub use buffer::{BufferView, Direction, TensorArg, TensorRole, ViewId};
pub use builder::{IntoExtent, KernelBuilder};
pub use error::{Error, Result};
pub use expr::{Expr, ExprOp, IterVar};
pub use interp::Machine;
pub use scratch::{Scratch, ScratchId};
pub use shape::{element_count, flat_offset, normalize_axis, row_major_strides, validate_shape, Shape};
pub use stmt::Stmt;
pub use types::{BinaryOp, CmpOp, ConstValue, ConstValueHash};

// Re-export external types for convenience
pub use kirin_dtype::{AddrSpace, DType, ScalarDType};
