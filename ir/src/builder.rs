//! The scoped kernel builder session.
//!
//! A [`KernelBuilder`] accumulates statements into a stack of scope frames.
//! Loops and conditionals are opened through closure-scoped methods: the
//! closure runs against a freshly pushed frame, and the frame is popped and
//! appended to the parent as one compound node on every exit path, the
//! error path included. `seal` consumes the session and hands back the
//! immutable root statement.
//!
//! Builders are single-threaded and non-reentrant; independent kernels
//! under construction need independent builder instances.

use std::cell::Cell;
use std::rc::Rc;

use smallvec::SmallVec;
use snafu::ensure;
use tracing::{debug, trace};

use kirin_dtype::{AddrSpace, DType};

use crate::buffer::{BufferView, Direction, TensorArg, TensorRole, ViewId};
use crate::error::{
    DTypeMismatchSnafu, IndexOutOfBoundsSnafu, NegativeExtentSnafu, NonIntegerExtentSnafu, Result,
    TypeMismatchSnafu, UnclosedScopeSnafu, UseAfterSealSnafu,
};
use crate::expr::{Expr, IterVar};
use crate::scratch::{Scratch, ScratchId};
use crate::shape::element_count;
use crate::stmt::Stmt;
use crate::types::ConstValue;

/// Shared liveness flag of a builder session.
///
/// Buffer views and scratch values hold a clone; sealing flips it so any
/// surviving handle fails fast instead of emitting into a dead session.
#[derive(Debug, Clone)]
pub(crate) struct SessionToken(Rc<Cell<bool>>);

impl SessionToken {
    fn new() -> Self {
        Self(Rc::new(Cell::new(false)))
    }

    pub(crate) fn is_sealed(&self) -> bool {
        self.0.get()
    }

    fn seal(&self) {
        self.0.set(true);
    }
}

/// Conversion into a validated loop extent expression.
///
/// Extents must be integer-typed; constant extents must be non-negative.
pub trait IntoExtent {
    fn into_extent(self) -> Result<Rc<Expr>>;
}

impl IntoExtent for usize {
    fn into_extent(self) -> Result<Rc<Expr>> {
        Ok(Expr::index_const(self as i64))
    }
}

impl IntoExtent for i64 {
    fn into_extent(self) -> Result<Rc<Expr>> {
        ensure!(self >= 0, NegativeExtentSnafu { extent: self });
        Ok(Expr::index_const(self))
    }
}

impl IntoExtent for Rc<Expr> {
    fn into_extent(self) -> Result<Rc<Expr>> {
        ensure!(self.dtype().is_int(), NonIntegerExtentSnafu { dtype: self.dtype() });
        if let Some(ConstValue::Int(extent)) = self.as_const() {
            ensure!(extent >= 0, NegativeExtentSnafu { extent });
        }
        Ok(self)
    }
}

impl IntoExtent for &Rc<Expr> {
    fn into_extent(self) -> Result<Rc<Expr>> {
        self.clone().into_extent()
    }
}

/// Mutable kernel-authoring session.
pub struct KernelBuilder {
    /// Statement frames; index 0 is the root scope.
    frames: Vec<Vec<Rc<Stmt>>>,
    token: SessionToken,
    next_view: usize,
    next_scratch: usize,
    next_iter: u64,
}

impl Default for KernelBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl KernelBuilder {
    /// Open a fresh authoring session.
    pub fn new() -> Self {
        trace!("kernel builder session opened");
        Self { frames: vec![Vec::new()], token: SessionToken::new(), next_view: 0, next_scratch: 0, next_iter: 0 }
    }

    /// Wrap an external tensor for addressed access.
    ///
    /// The direction must agree with the tensor's declared role: inputs are
    /// wrapped read-only, outputs write-only. A conflict is `TypeMismatch`.
    pub fn buffer_view(&mut self, arg: &TensorArg, direction: Direction) -> Result<BufferView> {
        let access = match arg.role() {
            TensorRole::Input => "wrap an input tensor",
            TensorRole::Output => "wrap an output tensor",
        };
        let compatible = matches!(
            (arg.role(), direction),
            (TensorRole::Input, Direction::ReadOnly) | (TensorRole::Output, Direction::WriteOnly)
        );
        ensure!(compatible, TypeMismatchSnafu { direction, access });

        let id = ViewId(self.next_view);
        self.next_view += 1;
        Ok(BufferView::new(id, arg.dtype(), direction, element_count(arg.shape()), self.token.clone()))
    }

    /// Allocate fixed-extent scratch storage local to this session.
    pub fn allocate(&mut self, dtype: DType, extent: usize, addrspace: AddrSpace) -> Scratch {
        let id = ScratchId(self.next_scratch);
        self.next_scratch += 1;
        Scratch::new(id, dtype, extent, addrspace, self.token.clone())
    }

    /// Open a for-range scope over `[0, extent)`.
    ///
    /// The closure receives the fresh induction-variable expression. Each
    /// call mints a distinct variable, so loops never shadow each other.
    pub fn for_range<E, F>(&mut self, extent: E, body: F) -> Result<()>
    where
        E: IntoExtent,
        F: FnOnce(&mut Self, Rc<Expr>) -> Result<()>,
    {
        let name = format!("i{}", self.next_iter);
        self.for_range_named(&name, extent, body)
    }

    /// `for_range` with an explicit display name for the induction variable.
    pub fn for_range_named<E, F>(&mut self, name: &str, extent: E, body: F) -> Result<()>
    where
        E: IntoExtent,
        F: FnOnce(&mut Self, Rc<Expr>) -> Result<()>,
    {
        let extent = extent.into_extent()?;
        let var = IterVar { id: self.next_iter, name: name.to_owned() };
        self.next_iter += 1;

        self.frames.push(Vec::new());
        let result = body(self, Expr::iter(var.clone()));
        let stmts = self.pop_frame();
        result?;

        self.push(Rc::new(Stmt::For { var, extent, body: Stmt::seq(stmts) }));
        Ok(())
    }

    /// Open a conditional scope. The condition must be `Bool`-typed.
    pub fn if_scope<F>(&mut self, cond: Rc<Expr>, body: F) -> Result<()>
    where
        F: FnOnce(&mut Self) -> Result<()>,
    {
        self.if_scope_inner(cond, body, None::<fn(&mut Self) -> Result<()>>)
    }

    /// Conditional scope with an else branch.
    pub fn if_else_scope<F, G>(&mut self, cond: Rc<Expr>, then_body: F, else_body: G) -> Result<()>
    where
        F: FnOnce(&mut Self) -> Result<()>,
        G: FnOnce(&mut Self) -> Result<()>,
    {
        self.if_scope_inner(cond, then_body, Some(else_body))
    }

    fn if_scope_inner<F, G>(&mut self, cond: Rc<Expr>, then_body: F, else_body: Option<G>) -> Result<()>
    where
        F: FnOnce(&mut Self) -> Result<()>,
        G: FnOnce(&mut Self) -> Result<()>,
    {
        ensure!(
            cond.dtype().is_bool(),
            DTypeMismatchSnafu { op: "if condition", lhs: cond.dtype(), rhs: DType::Bool }
        );

        self.frames.push(Vec::new());
        let result = then_body(self);
        let then_stmts = self.pop_frame();
        result?;

        let else_stmt = match else_body {
            None => None,
            Some(else_body) => {
                self.frames.push(Vec::new());
                let result = else_body(self);
                let else_stmts = self.pop_frame();
                result?;
                Some(Stmt::seq(else_stmts))
            }
        };

        self.push(Rc::new(Stmt::If { cond, then_body: Stmt::seq(then_stmts), else_body: else_stmt }));
        Ok(())
    }

    /// Emit a flat-indexed store through a write-only buffer view.
    pub fn store(&mut self, view: &BufferView, index: &Rc<Expr>, value: &Rc<Expr>) -> Result<()> {
        ensure!(!self.token.is_sealed(), UseAfterSealSnafu { what: "buffer view" });
        ensure!(
            view.direction() == Direction::WriteOnly,
            TypeMismatchSnafu { direction: view.direction(), access: "store" }
        );
        ensure!(
            index.dtype().is_int(),
            DTypeMismatchSnafu { op: "store index", lhs: index.dtype(), rhs: DType::Int32 }
        );
        ensure!(
            value.dtype() == view.element_dtype(),
            DTypeMismatchSnafu { op: "store", lhs: value.dtype(), rhs: view.element_dtype() }
        );
        if let Some(ConstValue::Int(offset)) = index.as_const() {
            ensure!(
                offset >= 0 && (offset as usize) < view.len(),
                IndexOutOfBoundsSnafu { index: offset, len: view.len() }
            );
        }

        self.push(Rc::new(Stmt::BufferStore { view: view.id(), index: index.clone(), value: value.clone() }));
        Ok(())
    }

    /// Emit a store into a scratch slot.
    pub fn scratch_store(&mut self, scratch: &Scratch, index: &Rc<Expr>, value: &Rc<Expr>) -> Result<()> {
        ensure!(!scratch.is_sealed(), UseAfterSealSnafu { what: "scratch value" });
        scratch.check_slot(index)?;
        ensure!(
            value.dtype() == scratch.dtype(),
            DTypeMismatchSnafu { op: "scratch store", lhs: value.dtype(), rhs: scratch.dtype() }
        );

        self.push(Rc::new(Stmt::ScratchStore { scratch: scratch.id(), index: index.clone(), value: value.clone() }));
        Ok(())
    }

    /// Finalize the session into the immutable root statement.
    ///
    /// The closure-scoped construction API keeps scopes balanced
    /// structurally; the `UnclosedScope` check remains as the runtime
    /// backstop. Sealing invalidates every buffer view and scratch value
    /// handed out by this session.
    pub fn seal(mut self) -> Result<Rc<Stmt>> {
        ensure!(self.frames.len() == 1, UnclosedScopeSnafu { depth: self.frames.len() - 1 });

        let root = self.frames.pop().expect("root frame present");
        self.token.seal();
        debug!(statements = root.len(), "kernel body sealed");
        Ok(Rc::new(Stmt::Seq(SmallVec::from_vec(root))))
    }

    fn push(&mut self, stmt: Rc<Stmt>) {
        self.frames.last_mut().expect("at least the root frame is open").push(stmt);
    }

    fn pop_frame(&mut self) -> Vec<Rc<Stmt>> {
        self.frames.pop().expect("scope frame pushed by the caller")
    }

    /// Open a frame without the closing discipline. Exists only so tests
    /// can reach the `UnclosedScope` backstop in `seal`.
    #[cfg(test)]
    pub(crate) fn open_raw_scope(&mut self) {
        self.frames.push(Vec::new());
    }
}
