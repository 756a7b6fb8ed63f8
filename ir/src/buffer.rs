//! Directional, addressed views over externally-owned tensor memory.
//!
//! A [`BufferView`] never owns the region it addresses; it exists so the
//! kernel body can emit flat-indexed loads and stores against a tensor
//! that will only be materialized by the downstream lowering stage.

use std::rc::Rc;

use snafu::ensure;

use kirin_dtype::{AddrSpace, DType};

use crate::builder::SessionToken;
use crate::error::{IndexOutOfBoundsSnafu, Result, TypeMismatchSnafu, UseAfterSealSnafu};
use crate::expr::Expr;
use crate::shape::Shape;
use crate::types::ConstValue;

/// Access direction of a buffer view.
///
/// Inputs are wrapped read-only, outputs write-only; violating either at
/// load/store time is an error, never a silent success.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    ReadOnly,
    WriteOnly,
}

/// Role a tensor plays in the extern-binding contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TensorRole {
    Input,
    Output,
}

/// Descriptor of an externally-owned tensor the kernel will be bound to.
#[derive(Debug, Clone, PartialEq)]
pub struct TensorArg {
    role: TensorRole,
    shape: Shape,
    dtype: DType,
}

impl TensorArg {
    pub fn input(shape: Shape, dtype: DType) -> Self {
        Self { role: TensorRole::Input, shape, dtype }
    }

    pub fn output(shape: Shape, dtype: DType) -> Self {
        Self { role: TensorRole::Output, shape, dtype }
    }

    pub fn role(&self) -> TensorRole {
        self.role
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn dtype(&self) -> DType {
        self.dtype.clone()
    }
}

/// Session-unique identity of a buffer view inside the statement tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ViewId(pub usize);

/// Typed, directional view over an external tensor region.
///
/// Carries a `Ptr` dtype to the element scalar. Owned by the builder
/// session: once the session is sealed the view fails fast with
/// `UseAfterSeal` instead of producing statements for a dead session.
#[derive(Debug, Clone)]
pub struct BufferView {
    id: ViewId,
    dtype: DType,
    direction: Direction,
    len: usize,
    token: SessionToken,
}

impl BufferView {
    pub(crate) fn new(id: ViewId, element: DType, direction: Direction, len: usize, token: SessionToken) -> Self {
        Self { id, dtype: element.ptr(AddrSpace::Global), direction, len, token }
    }

    pub fn id(&self) -> ViewId {
        self.id
    }

    /// Pointer dtype of the view.
    pub fn dtype(&self) -> DType {
        self.dtype.clone()
    }

    /// Element dtype of the underlying tensor.
    pub fn element_dtype(&self) -> DType {
        match &self.dtype {
            DType::Ptr { base, .. } => (**base).clone(),
            other => other.clone(),
        }
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Number of addressable elements.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Emit a flat-indexed load through this view.
    ///
    /// Fails with `TypeMismatch` on a write-only view and `UseAfterSeal`
    /// once the owning session has been sealed.
    pub fn load(&self, index: &Rc<Expr>) -> Result<Rc<Expr>> {
        ensure!(!self.token.is_sealed(), UseAfterSealSnafu { what: "buffer view" });
        ensure!(
            self.direction == Direction::ReadOnly,
            TypeMismatchSnafu { direction: self.direction, access: "load" }
        );
        if let Some(ConstValue::Int(offset)) = index.as_const() {
            ensure!(
                offset >= 0 && (offset as usize) < self.len,
                IndexOutOfBoundsSnafu { index: offset, len: self.len }
            );
        }
        Ok(Expr::buffer_load(self.id, self.element_dtype(), index.clone()))
    }
}
