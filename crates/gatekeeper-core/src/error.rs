//! Error types for gate admission
//!
//! Gate operations are total and report rejection as `false`. These types
//! back the opt-in `require_*` adapters for callers that prefer `?`.

use std::fmt;

use thiserror::Error;

/// The gate family members
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GateKind {
    Flag,
    Set,
    Change,
    Monotonic,
    Auth,
}

impl GateKind {
    #[inline]
    pub fn name(self) -> &'static str {
        match self {
            GateKind::Flag => "flag",
            GateKind::Set => "set",
            GateKind::Change => "change",
            GateKind::Monotonic => "monotonic",
            GateKind::Auth => "auth",
        }
    }
}

impl fmt::Display for GateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Gate rejection errors
#[derive(Error, Clone, Copy, Debug, PartialEq, Eq)]
pub enum GateError {
    #[error("Gate closed: passage already in progress")]
    Closed,

    #[error("Key blocked: passage already granted for this key")]
    KeyBlocked,

    #[error("Value unchanged")]
    Unchanged,

    #[error("Value not greater than last accepted")]
    NotGreater,

    #[error("Not authenticated")]
    Unauthenticated,
}

impl GateError {
    /// Gate that produced this rejection
    pub fn kind(self) -> GateKind {
        match self {
            GateError::Closed => GateKind::Flag,
            GateError::KeyBlocked => GateKind::Set,
            GateError::Unchanged => GateKind::Change,
            GateError::NotGreater => GateKind::Monotonic,
            GateError::Unauthenticated => GateKind::Auth,
        }
    }
}

/// Result type for gate adapters
pub type GateResult<T> = Result<T, GateError>;
