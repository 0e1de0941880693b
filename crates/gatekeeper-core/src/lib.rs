//! Gatekeeper Core - Single-owner admission gates
//!
//! Each gate holds one value and admits a passage at most once until reset:
//! - Flag gate (one passage between opens)
//! - Set gate (one passage per key)
//! - Change gate (only values that differ from the last accepted)
//! - Monotonic gate (only values strictly greater than the last accepted)
//! - Auth gate (manually driven authenticated flag)
//!
//! Gates are plain values with no internal synchronization. Share them across
//! threads through `gatekeeper-sync` or your own lock.

pub mod auth;
pub mod change;
pub mod error;
pub mod flag;
pub mod monotonic;
pub mod set;

pub use auth::*;
pub use change::*;
pub use error::*;
pub use flag::*;
pub use monotonic::*;
pub use set::*;
