//! Scripted set-gate scenarios
//!
//! A script is a list of steps with expected outcomes, replayed in order
//! against one gate. The first mismatch stops the run.

use std::fmt::Debug;

use gatekeeper_core::{KeySet, SetGate};
use thiserror::Error;

/// One scripted operation
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Step<K> {
    /// Attempt passage and expect the given outcome
    Attempt(K, bool),
    /// Query and expect the given outcome
    Allowed(K, bool),
    /// Reset the key
    Reset(K),
}

/// Script failure
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ScenarioError {
    #[error("Step {index} ({step}): expected {expected}, got {actual}")]
    Mismatch {
        index: usize,
        step: String,
        expected: bool,
        actual: bool,
    },
}

/// Replay `steps` against `gate`, returning the number of steps run
pub fn run_set_script<K, C>(
    gate: &mut SetGate<K, C>,
    steps: &[Step<K>],
) -> Result<usize, ScenarioError>
where
    K: Clone + Debug,
    C: KeySet<K>,
{
    for (index, step) in steps.iter().enumerate() {
        let (expected, actual) = match step {
            Step::Attempt(key, expected) => (*expected, gate.attempt_passage(key.clone())),
            Step::Allowed(key, expected) => (*expected, gate.passage_allowed(key)),
            Step::Reset(key) => {
                gate.reset(key);
                continue;
            }
        };

        if expected != actual {
            return Err(ScenarioError::Mismatch {
                index,
                step: format!("{:?}", step),
                expected,
                actual,
            });
        }
    }

    Ok(steps.len())
}

/// The two-key admission scenario over keys "a" and "b"
pub fn two_key_script() -> Vec<Step<&'static str>> {
    vec![
        Step::Attempt("a", true),
        Step::Attempt("a", false),
        Step::Attempt("b", true),
        Step::Reset("a"),
        Step::Attempt("a", true),
        Step::Attempt("b", false),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn test_two_key_script() {
        let mut gate = SetGate::new();
        assert_eq!(run_set_script(&mut gate, &two_key_script()), Ok(6));
        assert_eq!(gate.blocked_count(), 2);
    }

    #[test]
    fn test_two_key_script_btree() {
        let mut gate: SetGate<&str, BTreeSet<&str>> = SetGate::default();
        assert!(run_set_script(&mut gate, &two_key_script()).is_ok());
    }

    #[test]
    fn test_mismatch_reported() {
        let mut gate = SetGate::new();
        let steps = vec![
            Step::Attempt(1u8, true),
            Step::Allowed(1, false),
            Step::Attempt(1, true),
        ];

        let err = run_set_script(&mut gate, &steps).unwrap_err();
        assert_eq!(
            err,
            ScenarioError::Mismatch {
                index: 2,
                step: "Attempt(1, true)".to_string(),
                expected: true,
                actual: false,
            }
        );
    }
}
