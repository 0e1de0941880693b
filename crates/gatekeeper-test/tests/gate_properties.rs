//! Property tests across the gate family

use gatekeeper_core::{AuthGate, FlagGate, MonotonicGate, SetGate};
use gatekeeper_sync::SharedGate;
use gatekeeper_test::{run_set_script, FuzzerConfig, GateFuzzer, Step};
use proptest::prelude::*;

#[derive(Clone, Debug)]
enum FlagOp {
    Attempt,
    Query,
    Reset,
}

fn flag_op() -> impl Strategy<Value = FlagOp> {
    prop_oneof![Just(FlagOp::Attempt), Just(FlagOp::Query), Just(FlagOp::Reset)]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn fuzzer_valid_for_any_seed(seed in any::<u64>(), reset_prob in 0.0f64..1.0) {
        let config = FuzzerConfig {
            seed,
            reset_prob,
            ..FuzzerConfig::light()
        };
        let result = GateFuzzer::new(config).run();
        prop_assert!(result.is_valid(), "violations: {:?}", result.violations);
    }

    #[test]
    fn flag_admits_once_between_resets(ops in proptest::collection::vec(flag_op(), 0..64)) {
        let mut gate = FlagGate::new();
        let mut open = true;
        for op in ops {
            match op {
                FlagOp::Attempt => {
                    prop_assert_eq!(gate.attempt_passage(), open);
                    open = false;
                }
                FlagOp::Query => prop_assert_eq!(gate.passage_allowed(), open),
                FlagOp::Reset => {
                    gate.reset();
                    open = true;
                }
            }
        }
    }

    #[test]
    fn monotonic_ties_always_reject(start in any::<u64>()) {
        let mut gate = MonotonicGate::new(start);
        prop_assert!(!gate.attempt_passage(start));
        if let Some(next) = start.checked_add(1) {
            prop_assert!(gate.attempt_passage(next));
            prop_assert!(!gate.attempt_passage(next));
            prop_assert!(!gate.attempt_passage(start));
        }
    }

    #[test]
    fn set_attempt_twice_then_reset(key in any::<i64>()) {
        let mut gate = SetGate::new();
        let steps = vec![
            Step::Attempt(key, true),
            Step::Attempt(key, false),
            Step::Reset(key),
            Step::Allowed(key, true),
            Step::Attempt(key, true),
        ];
        prop_assert_eq!(run_set_script(&mut gate, &steps), Ok(5));
    }
}

#[test]
fn auth_gate_query_never_mutates() {
    let mut gate = AuthGate::default();
    assert!(!gate.is_authenticated());
    assert!(!gate.is_authenticated());

    gate.authenticate();
    assert!(gate.is_authenticated());
    assert!(gate.is_authenticated());

    gate.deauthenticate();
    assert!(!gate.is_authenticated());
}

#[test]
fn shared_and_owned_gates_agree() {
    let mut owned = FlagGate::new();
    let shared = SharedGate::new(FlagGate::new());

    for round in 0..10 {
        if round % 3 == 0 {
            owned.reset();
            shared.reset();
        }
        assert_eq!(owned.attempt_passage(), shared.attempt_passage());
    }
    assert_eq!(owned, shared.snapshot());
}
