//! Sealed kernels packaged with their binding contract.
//!
//! An [`ExternOp`] is the unit handed to a backend: an immutable statement
//! tree plus the ordered list of tensor arguments the tree's buffer views
//! refer to. View identifiers in the body line up positionally with the
//! argument list, so a backend (or the reference [`Machine`]) can bind real
//! storage without inspecting the tree.
//!
//! [`Machine`]: kirin_ir::Machine

use std::rc::Rc;

use kirin_ir::{DType, Shape, Stmt, TensorArg, ViewId};

/// An immutable kernel with its calling convention.
#[derive(Debug, Clone)]
pub struct ExternOp {
    name: String,
    body: Rc<Stmt>,
    inputs: Vec<TensorArg>,
    input_views: Vec<ViewId>,
    output: TensorArg,
    output_view: ViewId,
}

impl ExternOp {
    pub(crate) fn new(
        name: impl Into<String>,
        body: Rc<Stmt>,
        inputs: Vec<TensorArg>,
        input_views: Vec<ViewId>,
        output: TensorArg,
        output_view: ViewId,
    ) -> Self {
        debug_assert_eq!(inputs.len(), input_views.len());
        Self { name: name.into(), body, inputs, input_views, output, output_view }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The sealed statement tree.
    pub fn body(&self) -> &Rc<Stmt> {
        &self.body
    }

    /// Input tensors in call order.
    pub fn inputs(&self) -> &[TensorArg] {
        &self.inputs
    }

    /// View identifiers of the inputs, parallel to [`Self::inputs`].
    pub fn input_views(&self) -> &[ViewId] {
        &self.input_views
    }

    pub fn output(&self) -> &TensorArg {
        &self.output
    }

    pub fn output_view(&self) -> ViewId {
        self.output_view
    }

    /// Shape of the produced tensor.
    pub fn output_shape(&self) -> &Shape {
        self.output.shape()
    }

    /// Element type of the produced tensor.
    pub fn output_dtype(&self) -> DType {
        self.output.dtype()
    }
}
