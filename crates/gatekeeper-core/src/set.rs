//! Set-membership gate - independent one-shot admission per key

use std::collections::{BTreeSet, HashSet};
use std::hash::{BuildHasher, Hash};

use crate::{GateError, GateKind, GateResult};

/// Set-like container backing a [`SetGate`]
pub trait KeySet<K> {
    /// Insert a key, returning true if it was absent
    fn insert_key(&mut self, key: K) -> bool;

    fn contains_key(&self, key: &K) -> bool;

    /// Remove a key, returning true if it was present
    fn remove_key(&mut self, key: &K) -> bool;

    fn key_count(&self) -> usize;

    fn clear_keys(&mut self);
}

impl<K, S> KeySet<K> for HashSet<K, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn insert_key(&mut self, key: K) -> bool {
        self.insert(key)
    }

    fn contains_key(&self, key: &K) -> bool {
        self.contains(key)
    }

    fn remove_key(&mut self, key: &K) -> bool {
        self.remove(key)
    }

    fn key_count(&self) -> usize {
        self.len()
    }

    fn clear_keys(&mut self) {
        self.clear();
    }
}

impl<K: Ord> KeySet<K> for BTreeSet<K> {
    fn insert_key(&mut self, key: K) -> bool {
        self.insert(key)
    }

    fn contains_key(&self, key: &K) -> bool {
        self.contains(key)
    }

    fn remove_key(&mut self, key: &K) -> bool {
        self.remove(key)
    }

    fn key_count(&self) -> usize {
        self.len()
    }

    fn clear_keys(&mut self) {
        self.clear();
    }
}

/// One-shot admission per key over a shared container.
///
/// A key is blocked iff it is present in the container. Admitting one key
/// never affects another.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SetGate<K, C = HashSet<K>> {
    blocked: C,
    _key: std::marker::PhantomData<fn(K) -> K>,
}

impl<K, C: Default> Default for SetGate<K, C> {
    fn default() -> Self {
        SetGate {
            blocked: C::default(),
            _key: std::marker::PhantomData,
        }
    }
}

impl<K: Eq + Hash> SetGate<K> {
    /// Create an empty hash-backed gate
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty hash-backed gate with room for `capacity` keys
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_container(HashSet::with_capacity(capacity))
    }
}

impl<K, C: KeySet<K>> SetGate<K, C> {
    /// Create a gate over an existing container; keys already present start blocked
    pub fn with_container(blocked: C) -> Self {
        SetGate {
            blocked,
            _key: std::marker::PhantomData,
        }
    }

    /// Admit `key` iff it is not already blocked
    pub fn attempt_passage(&mut self, key: K) -> bool {
        let admitted = self.blocked.insert_key(key);
        tracing::trace!(gate = %GateKind::Set, admitted, "passage attempt");
        admitted
    }

    /// Like [`attempt_passage`](Self::attempt_passage), rejecting with [`GateError::KeyBlocked`]
    pub fn require_passage(&mut self, key: K) -> GateResult<()> {
        if self.attempt_passage(key) {
            Ok(())
        } else {
            Err(GateError::KeyBlocked)
        }
    }

    #[inline]
    pub fn passage_allowed(&self, key: &K) -> bool {
        !self.blocked.contains_key(key)
    }

    /// Unblock `key` after a completed passage
    pub fn end_passage(&mut self, key: &K) {
        self.reset(key);
    }

    /// Unblock `key`; other keys are unaffected
    pub fn reset(&mut self, key: &K) {
        let removed = self.blocked.remove_key(key);
        tracing::trace!(gate = %GateKind::Set, removed, "reset key");
    }

    /// Unblock every key
    pub fn reset_all(&mut self) {
        tracing::trace!(gate = %GateKind::Set, count = self.blocked.key_count(), "reset all keys");
        self.blocked.clear_keys();
    }

    /// Number of keys currently blocked
    pub fn blocked_count(&self) -> usize {
        self.blocked.key_count()
    }

    pub fn is_empty(&self) -> bool {
        self.blocked.key_count() == 0
    }
}
