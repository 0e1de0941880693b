//! Gatekeeper Test Harness - Gate validation
//!
//! This crate provides:
//! - Model-checking fuzzing of every gate
//! - Scripted set-gate scenarios
//! - Criterion benchmarks (see `benches/`)

pub mod gate_fuzzer;
pub mod scenario;

pub use gate_fuzzer::*;
pub use scenario::*;
