//! Changed-value gate

use crate::{GateError, GateKind, GateResult};

/// Admits a value only when it differs from the last accepted one.
///
/// The first stored value is supplied at construction, so the first attempt
/// is compared against it like any other.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ChangeGate<T> {
    last: T,
}

impl<T: PartialEq> ChangeGate<T> {
    pub fn new(initial: T) -> Self {
        ChangeGate { last: initial }
    }

    /// Store `value` and return true iff it differs from the stored value
    pub fn attempt_passage(&mut self, value: T) -> bool {
        let admitted = value != self.last;
        if admitted {
            self.last = value;
        }
        tracing::trace!(gate = %GateKind::Change, admitted, "passage attempt");
        admitted
    }

    /// Like [`attempt_passage`](Self::attempt_passage), rejecting with [`GateError::Unchanged`]
    pub fn require_change(&mut self, value: T) -> GateResult<()> {
        if self.attempt_passage(value) {
            Ok(())
        } else {
            Err(GateError::Unchanged)
        }
    }

    /// Whether `value` would currently be admitted
    #[inline]
    pub fn passage_allowed(&self, value: &T) -> bool {
        *value != self.last
    }

    /// Overwrite the stored value without counting as a change
    pub fn set(&mut self, value: T) {
        tracing::trace!(gate = %GateKind::Change, "forced set");
        self.last = value;
    }
}
