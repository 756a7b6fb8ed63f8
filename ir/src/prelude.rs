//! Common imports for authoring kernel bodies.
//!
//! ```rust,ignore
//! use kirin_ir::prelude::*;
//! ```

pub use crate::buffer::{BufferView, Direction, TensorArg, TensorRole, ViewId};
pub use crate::builder::{IntoExtent, KernelBuilder};
pub use crate::error::{Error, Result};
pub use crate::expr::{Expr, ExprOp, IterVar};
pub use crate::interp::Machine;
pub use crate::scratch::{Scratch, ScratchId};
pub use crate::shape::{element_count, flat_offset, normalize_axis, row_major_strides, validate_shape, Shape};
pub use crate::stmt::Stmt;
pub use crate::types::{BinaryOp, CmpOp, ConstValue, ConstValueHash};

// Re-exports from dependencies
pub use kirin_dtype::{AddrSpace, DType, ScalarDType};
