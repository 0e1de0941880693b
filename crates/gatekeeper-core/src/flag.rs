//! Boolean single-flag gate

use crate::{GateError, GateKind, GateResult};

/// Allows exactly one passage between opens.
///
/// [`FlagGate::attempt_passage`] returns `true` iff the gate was open at call
/// time and always leaves it closed. Only [`FlagGate::end_passage`] or
/// [`FlagGate::reset`] reopen it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FlagGate {
    open: bool,
}

impl Default for FlagGate {
    fn default() -> Self {
        Self::new()
    }
}

impl FlagGate {
    /// Create an open gate
    pub const fn new() -> Self {
        FlagGate { open: true }
    }

    /// Create a gate that starts closed
    pub const fn closed() -> Self {
        FlagGate { open: false }
    }

    /// Close the gate, returning whether it was open
    pub fn attempt_passage(&mut self) -> bool {
        let admitted = std::mem::replace(&mut self.open, false);
        tracing::trace!(gate = %GateKind::Flag, admitted, "passage attempt");
        admitted
    }

    /// Like [`attempt_passage`](Self::attempt_passage), rejecting with [`GateError::Closed`]
    pub fn require_passage(&mut self) -> GateResult<()> {
        if self.attempt_passage() {
            Ok(())
        } else {
            Err(GateError::Closed)
        }
    }

    #[inline]
    pub fn passage_allowed(&self) -> bool {
        self.open
    }

    /// Reopen after a completed passage
    pub fn end_passage(&mut self) {
        self.reset();
    }

    /// Reopen regardless of prior state
    pub fn reset(&mut self) {
        tracing::trace!(gate = %GateKind::Flag, "reset");
        self.open = true;
    }
}
