//! RAII passages
//!
//! A passage is returned on admission and ends itself when dropped, so an
//! early return or `?` cannot leave the gate closed. Each passage holds a
//! lease; once a reset through the shared handle revokes it, dropping the
//! passage leaves the gate alone.

use std::fmt;

use gatekeeper_core::{FlagGate, KeySet, SetGate};

use crate::SharedGate;

/// Held passage through a shared [`FlagGate`]
#[must_use = "dropping the passage reopens the gate immediately"]
#[derive(Debug)]
pub struct FlagPassage {
    gate: SharedGate<FlagGate>,
    token: Option<u64>,
}

impl FlagPassage {
    /// Whether a reset has revoked this passage
    pub fn is_revoked(&self) -> bool {
        match self.token {
            Some(token) => !self.gate.with_slot(|slot| slot.leases.is_live(token)),
            None => true,
        }
    }

    /// Keep the gate closed after this passage; only an explicit reset reopens it
    pub fn forget(mut self) {
        if let Some(token) = self.token.take() {
            self.gate.with_slot(|slot| slot.leases.release(token));
        }
    }
}

impl Drop for FlagPassage {
    fn drop(&mut self) {
        let Some(token) = self.token.take() else {
            return;
        };

        let released = self.gate.with_slot(|slot| {
            let live = slot.leases.release(token).is_some();
            if live {
                slot.gate.end_passage();
            }
            live
        });

        if !released {
            tracing::debug!("revoked flag passage dropped");
        } else if std::thread::panicking() {
            tracing::warn!("flag passage released during unwind");
        } else {
            tracing::debug!("flag passage released");
        }
    }
}

/// Held passage for one key of a shared [`SetGate`]
#[must_use = "dropping the passage unblocks the key immediately"]
pub struct KeyPassage<K, C: KeySet<K>> {
    gate: SharedGate<SetGate<K, C>>,
    key: K,
    token: Option<u64>,
}

impl<K, C: KeySet<K>> KeyPassage<K, C> {
    pub fn key(&self) -> &K {
        &self.key
    }

    /// Whether a reset of this key has revoked the passage
    pub fn is_revoked(&self) -> bool {
        match self.token {
            Some(token) => !self.gate.with_slot(|slot| slot.leases.is_live(token)),
            None => true,
        }
    }

    /// Keep the key blocked after this passage
    pub fn forget(mut self) {
        if let Some(token) = self.token.take() {
            self.gate.with_slot(|slot| slot.leases.release(token));
        }
    }
}

impl<K, C: KeySet<K>> Drop for KeyPassage<K, C> {
    fn drop(&mut self) {
        let Some(token) = self.token.take() else {
            return;
        };

        let released = self.gate.with_slot(|slot| match slot.leases.release(token) {
            Some(key) => {
                slot.gate.end_passage(&key);
                true
            }
            None => false,
        });

        if !released {
            tracing::debug!("revoked key passage dropped");
        } else if std::thread::panicking() {
            tracing::warn!("key passage released during unwind");
        } else {
            tracing::debug!("key passage released");
        }
    }
}

impl<K, C> fmt::Debug for KeyPassage<K, C>
where
    K: fmt::Debug,
    C: KeySet<K> + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPassage")
            .field("gate", &self.gate)
            .field("key", &self.key)
            .field("token", &self.token)
            .finish()
    }
}

impl SharedGate<FlagGate> {
    /// Attempt passage, returning a guard that reopens the gate on drop
    pub fn try_enter(&self) -> Option<FlagPassage> {
        let token = self.with_slot(|slot| {
            if slot.gate.attempt_passage() {
                Some(slot.leases.grant(()))
            } else {
                None
            }
        })?;

        Some(FlagPassage {
            gate: self.clone(),
            token: Some(token),
        })
    }
}

impl<K: Clone + PartialEq, C: KeySet<K>> SharedGate<SetGate<K, C>> {
    /// Attempt passage for `key`, returning a guard that unblocks it on drop
    pub fn try_enter(&self, key: K) -> Option<KeyPassage<K, C>> {
        let token = self.with_slot(|slot| {
            if slot.gate.attempt_passage(key.clone()) {
                Some(slot.leases.grant(key.clone()))
            } else {
                None
            }
        })?;

        Some(KeyPassage {
            gate: self.clone(),
            key,
            token: Some(token),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SharedSetGate;
    use std::panic;

    #[test]
    fn test_flag_passage_reopens_on_drop() {
        let gate = SharedGate::new(FlagGate::new());
        {
            let passage = gate.try_enter();
            assert!(passage.is_some());
            assert!(gate.try_enter().is_none());
            assert!(!gate.passage_allowed());
        }
        assert!(gate.passage_allowed());
    }

    #[test]
    fn test_flag_passage_forget() {
        let gate = SharedGate::new(FlagGate::new());
        if let Some(passage) = gate.try_enter() {
            passage.forget();
        }
        assert!(!gate.passage_allowed());

        gate.reset();
        assert!(gate.try_enter().is_some());
    }

    #[test]
    fn test_flag_passage_released_on_panic() {
        let gate = SharedGate::new(FlagGate::new());
        let inner = gate.clone();

        let result = panic::catch_unwind(panic::AssertUnwindSafe(move || {
            let _passage = inner.try_enter().unwrap();
            panic!("guarded work failed");
        }));

        assert!(result.is_err());
        assert!(gate.passage_allowed());
    }

    #[test]
    fn test_key_passage() {
        let gate: SharedSetGate<String> = SharedGate::default();

        let a = gate.try_enter("a".to_string()).unwrap();
        assert_eq!(a.key(), "a");
        assert!(gate.try_enter("a".to_string()).is_none());

        let b = gate.try_enter("b".to_string()).unwrap();
        drop(a);
        assert!(gate.passage_allowed(&"a".to_string()));
        assert!(!gate.passage_allowed(&"b".to_string()));

        b.forget();
        assert!(gate.try_enter("b".to_string()).is_none());
        assert_eq!(gate.blocked_count(), 1);
    }

    #[test]
    fn test_flag_reset_while_held() {
        let gate = SharedGate::new(FlagGate::new());

        let a = gate.try_enter().unwrap();
        gate.reset();
        assert!(a.is_revoked());

        let b = gate.try_enter().unwrap();
        drop(a);

        // The revoked passage must not reopen the gate under b
        assert!(!gate.passage_allowed());
        assert!(gate.try_enter().is_none());
        assert!(!b.is_revoked());
        assert_eq!(gate.held_passages(), 1);

        drop(b);
        assert!(gate.passage_allowed());
        assert_eq!(gate.held_passages(), 0);
    }

    #[test]
    fn test_key_reset_while_held() {
        let gate: SharedSetGate<&str> = SharedGate::default();

        let a = gate.try_enter("job").unwrap();
        let other = gate.try_enter("other").unwrap();
        gate.reset(&"job");
        assert!(a.is_revoked());
        assert!(!other.is_revoked());

        let b = gate.try_enter("job").unwrap();
        drop(a);

        assert!(!gate.passage_allowed(&"job"));
        assert!(gate.try_enter("job").is_none());

        drop(b);
        assert!(gate.passage_allowed(&"job"));
        assert!(!gate.passage_allowed(&"other"));
    }

    #[test]
    fn test_forget_releases_lease() {
        let gate = SharedGate::new(FlagGate::new());
        gate.try_enter().unwrap().forget();
        assert_eq!(gate.held_passages(), 0);
        assert!(!gate.passage_allowed());
    }

    #[test]
    fn test_key_passage_debug() {
        let gate: SharedSetGate<u8> = SharedGate::default();
        let passage = gate.try_enter(3).unwrap();
        assert!(format!("{:?}", passage).starts_with("KeyPassage"));
    }
}
