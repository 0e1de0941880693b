//! Monotonic gate - admits only strictly greater values
//!
//! Guards against stale or out-of-order updates such as timestamps and
//! sequence numbers. Repeating the last accepted value is a no-op.

use crate::{GateError, GateKind, GateResult};

/// Admits a value only if strictly greater than the last accepted one.
///
/// Ties reject. With a partial order, values incomparable to the stored one
/// (e.g. `f64::NAN`) also reject.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MonotonicGate<T> {
    last: T,
}

impl<T: PartialOrd> MonotonicGate<T> {
    pub fn new(initial: T) -> Self {
        MonotonicGate { last: initial }
    }

    /// Store `value` and return true iff `value > last`
    pub fn attempt_passage(&mut self, value: T) -> bool {
        let admitted = value > self.last;
        if admitted {
            self.last = value;
        }
        tracing::trace!(gate = %GateKind::Monotonic, admitted, "passage attempt");
        admitted
    }

    /// Like [`attempt_passage`](Self::attempt_passage), rejecting with [`GateError::NotGreater`]
    pub fn require_greater(&mut self, value: T) -> GateResult<()> {
        if self.attempt_passage(value) {
            Ok(())
        } else {
            Err(GateError::NotGreater)
        }
    }

    #[inline]
    pub fn passage_allowed(&self, value: &T) -> bool {
        *value > self.last
    }

    /// Overwrite the stored value unconditionally; may move it backwards
    pub fn set(&mut self, value: T) {
        tracing::trace!(gate = %GateKind::Monotonic, "forced set");
        self.last = value;
    }
}
