//! Gate Fuzzer - Model-checking for gate admission rules
//!
//! Drives seeded random operation sequences against every gate and a plain
//! reference model, recording each step where the two disagree.
//!
//! Tests:
//! - Flag gate single passage between resets
//! - Set gate per-key independence
//! - Change gate equality rule and forced sets
//! - Monotonic gate strict ordering and rewinds
//! - Auth gate manual transitions and pure queries
//! - Shared set gate with RAII passages held and released out of order

use std::collections::HashSet;

use gatekeeper_core::{AuthGate, ChangeGate, FlagGate, GateKind, MonotonicGate, SetGate};
use gatekeeper_sync::{KeyPassage, SharedGate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Fuzzer configuration
#[derive(Clone, Debug)]
pub struct FuzzerConfig {
    /// Operations per gate
    pub op_count: usize,
    /// Distinct keys for set gates
    pub key_space: u32,
    /// Distinct values for change/monotonic gates
    pub value_space: u32,
    /// Probability of a reset or forced set (0.0 - 1.0)
    pub reset_prob: f64,
    /// Random seed
    pub seed: u64,
}

impl Default for FuzzerConfig {
    fn default() -> Self {
        FuzzerConfig {
            op_count: 1000,
            key_space: 16,
            value_space: 32,
            reset_prob: 0.2,
            seed: 42,
        }
    }
}

impl FuzzerConfig {
    /// Light fuzzing for quick tests
    pub fn light() -> Self {
        FuzzerConfig {
            op_count: 100,
            key_space: 4,
            value_space: 8,
            reset_prob: 0.1,
            seed: 42,
        }
    }

    /// Heavy fuzzing for thorough testing
    pub fn heavy() -> Self {
        FuzzerConfig {
            op_count: 20_000,
            key_space: 256,
            value_space: 1024,
            reset_prob: 0.3,
            seed: 42,
        }
    }
}

/// A step where a gate disagreed with the reference model
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Violation {
    pub gate: GateKind,
    pub step: usize,
    pub detail: String,
}

/// Fuzzing result
#[derive(Debug, Default)]
pub struct FuzzResult {
    pub ops_executed: u64,
    pub admissions: u64,
    pub violations: Vec<Violation>,
}

impl FuzzResult {
    pub fn new() -> Self {
        FuzzResult::default()
    }

    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    fn record(&mut self, admitted: bool) {
        self.ops_executed += 1;
        if admitted {
            self.admissions += 1;
        }
    }

    fn check(&mut self, gate: GateKind, step: usize, actual: bool, expected: bool, op: &str) {
        if actual != expected {
            self.violations.push(Violation {
                gate,
                step,
                detail: format!("{op}: gate returned {actual}, model expected {expected}"),
            });
        }
    }
}

/// Gate fuzzer
pub struct GateFuzzer {
    config: FuzzerConfig,
    rng: StdRng,
}

impl GateFuzzer {
    /// Create a new fuzzer
    pub fn new(config: FuzzerConfig) -> Self {
        let rng = StdRng::seed_from_u64(config.seed);
        GateFuzzer { config, rng }
    }

    /// Run the fuzzer over every gate
    pub fn run(&mut self) -> FuzzResult {
        let mut result = FuzzResult::new();

        self.fuzz_flag(&mut result);
        self.fuzz_set(&mut result);
        self.fuzz_change(&mut result);
        self.fuzz_monotonic(&mut result);
        self.fuzz_auth(&mut result);
        self.fuzz_shared_set(&mut result);

        tracing::debug!(
            ops = result.ops_executed,
            admissions = result.admissions,
            violations = result.violations.len(),
            "gate fuzz complete"
        );
        result
    }

    fn roll_reset(&mut self) -> bool {
        self.rng.gen::<f64>() < self.config.reset_prob
    }

    fn fuzz_flag(&mut self, result: &mut FuzzResult) {
        let mut gate = FlagGate::new();
        let mut open = true;

        for step in 0..self.config.op_count {
            if self.roll_reset() {
                gate.reset();
                open = true;
                continue;
            }

            result.check(GateKind::Flag, step, gate.passage_allowed(), open, "query");
            let admitted = gate.attempt_passage();
            result.check(GateKind::Flag, step, admitted, open, "attempt");
            result.record(admitted);
            open = false;
        }
    }

    fn fuzz_set(&mut self, result: &mut FuzzResult) {
        let mut gate = SetGate::new();
        let mut blocked: HashSet<u32> = HashSet::new();

        for step in 0..self.config.op_count {
            let key = self.rng.gen_range(0..self.config.key_space);

            if self.roll_reset() {
                gate.reset(&key);
                blocked.remove(&key);
                continue;
            }

            let expected = !blocked.contains(&key);
            result.check(GateKind::Set, step, gate.passage_allowed(&key), expected, "query");
            let admitted = gate.attempt_passage(key);
            result.check(GateKind::Set, step, admitted, expected, "attempt");
            result.record(admitted);
            blocked.insert(key);
        }

        if gate.blocked_count() != blocked.len() {
            result.violations.push(Violation {
                gate: GateKind::Set,
                step: self.config.op_count,
                detail: format!(
                    "blocked count {} differs from model {}",
                    gate.blocked_count(),
                    blocked.len()
                ),
            });
        }
    }

    fn fuzz_change(&mut self, result: &mut FuzzResult) {
        let mut gate = ChangeGate::new(0u32);
        let mut last = 0u32;

        for step in 0..self.config.op_count {
            let value = self.rng.gen_range(0..self.config.value_space);

            if self.roll_reset() {
                gate.set(value);
                last = value;
                continue;
            }

            let admitted = gate.attempt_passage(value);
            result.check(GateKind::Change, step, admitted, value != last, "attempt");
            result.record(admitted);
            last = value;
        }
    }

    fn fuzz_monotonic(&mut self, result: &mut FuzzResult) {
        let mut gate = MonotonicGate::new(0u32);
        let mut last = 0u32;

        for step in 0..self.config.op_count {
            let value = self.rng.gen_range(0..self.config.value_space);

            if self.roll_reset() {
                // Rewind so the gate keeps admitting over a bounded value space
                gate.set(value);
                last = value;
                continue;
            }

            let admitted = gate.attempt_passage(value);
            result.check(GateKind::Monotonic, step, admitted, value > last, "attempt");
            result.record(admitted);
            last = last.max(value);
        }
    }

    fn fuzz_auth(&mut self, result: &mut FuzzResult) {
        let mut gate = AuthGate::new();
        let mut authenticated = false;

        for step in 0..self.config.op_count {
            match self.rng.gen_range(0..3) {
                0 => {
                    gate.authenticate();
                    authenticated = true;
                }
                1 => {
                    gate.deauthenticate();
                    authenticated = false;
                }
                _ => {
                    let actual = gate.is_authenticated();
                    result.check(GateKind::Auth, step, actual, authenticated, "query");
                    result.record(actual);
                }
            }
        }
    }

    fn fuzz_shared_set(&mut self, result: &mut FuzzResult) {
        let gate: SharedGate<SetGate<u32>> = SharedGate::default();
        let mut held: Vec<KeyPassage<u32, HashSet<u32>>> = Vec::new();

        for step in 0..self.config.op_count {
            if !held.is_empty() && self.roll_reset() {
                let idx = self.rng.gen_range(0..held.len());
                drop(held.swap_remove(idx));
                continue;
            }

            let key = self.rng.gen_range(0..self.config.key_space);
            let expected = !held.iter().any(|p| *p.key() == key);
            let passage = gate.try_enter(key);
            result.check(GateKind::Set, step, passage.is_some(), expected, "try_enter");
            result.record(passage.is_some());
            held.extend(passage);
        }

        if gate.blocked_count() != held.len() {
            result.violations.push(Violation {
                gate: GateKind::Set,
                step: self.config.op_count,
                detail: format!(
                    "{} keys blocked with {} passages held",
                    gate.blocked_count(),
                    held.len()
                ),
            });
        }

        drop(held);
        if !gate.with(|g| g.is_empty()) {
            result.violations.push(Violation {
                gate: GateKind::Set,
                step: self.config.op_count,
                detail: "keys still blocked after all passages dropped".to_string(),
            });
        }
    }
}
