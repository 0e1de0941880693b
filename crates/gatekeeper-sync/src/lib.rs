//! Gatekeeper Sync - Opt-in shared ownership for gates
//!
//! This crate provides:
//! - `SharedGate`, a cloneable handle over one mutex-guarded gate
//! - Per-gate convenience operations on shared handles
//! - RAII passages that end themselves on drop

pub mod passage;
pub mod shared;

pub use passage::*;
pub use shared::*;
