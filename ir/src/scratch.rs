//! Session-local scratch storage.
//!
//! Scratch values are small fixed-extent mutable cells ("local/register"
//! storage class), distinct from tensor-sized buffers. Their lifetime is
//! bound to the builder session that allocated them.

use std::rc::Rc;

use snafu::ensure;

use kirin_dtype::{AddrSpace, DType};

use crate::builder::SessionToken;
use crate::error::{IndexOutOfBoundsSnafu, Result, UseAfterSealSnafu};
use crate::expr::Expr;
use crate::types::ConstValue;

/// Session-unique identity of a scratch allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScratchId(pub usize);

/// Fixed-extent mutable storage local to a builder session.
#[derive(Debug, Clone)]
pub struct Scratch {
    id: ScratchId,
    dtype: DType,
    extent: usize,
    addrspace: AddrSpace,
    token: SessionToken,
}

impl Scratch {
    pub(crate) fn new(id: ScratchId, dtype: DType, extent: usize, addrspace: AddrSpace, token: SessionToken) -> Self {
        Self { id, dtype, extent, addrspace, token }
    }

    pub fn id(&self) -> ScratchId {
        self.id
    }

    pub fn dtype(&self) -> DType {
        self.dtype.clone()
    }

    pub fn extent(&self) -> usize {
        self.extent
    }

    pub fn addrspace(&self) -> AddrSpace {
        self.addrspace
    }

    /// Emit a load of a scratch slot.
    ///
    /// Constant slot indices are bounds-checked against the extent at
    /// construction time; `UseAfterSeal` once the session is sealed.
    pub fn load(&self, index: &Rc<Expr>) -> Result<Rc<Expr>> {
        ensure!(!self.token.is_sealed(), UseAfterSealSnafu { what: "scratch value" });
        self.check_slot(index)?;
        Ok(Expr::scratch_load(self.id, self.dtype.clone(), index.clone()))
    }

    pub(crate) fn check_slot(&self, index: &Rc<Expr>) -> Result<()> {
        if let Some(ConstValue::Int(slot)) = index.as_const() {
            ensure!(
                slot >= 0 && (slot as usize) < self.extent,
                IndexOutOfBoundsSnafu { index: slot, len: self.extent }
            );
        }
        Ok(())
    }

    pub(crate) fn is_sealed(&self) -> bool {
        self.token.is_sealed()
    }
}
