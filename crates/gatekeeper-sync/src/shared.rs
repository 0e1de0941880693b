//! Shared gate handle
//!
//! Gates from `gatekeeper-core` are single-owner values. [`SharedGate`] is
//! the explicit opt-in for multi-owner use: clones share one gate behind a
//! mutex, and every operation is a single locked transition.
//!
//! The lock also guards the leases of outstanding RAII passages. A reset
//! through the handle revokes the matching leases, so a passage admitted
//! before the reset cannot end a later holder's passage.

use std::collections::hash_map::RandomState;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use gatekeeper_core::{AuthGate, ChangeGate, FlagGate, KeySet, MonotonicGate, SetGate};
use parking_lot::Mutex;

/// Gates that can be held by a [`SharedGate`]
pub trait Gate {
    /// Identifies what a passage holds: `()` for single-flag gates, the key for set gates
    type Key;
}

impl Gate for FlagGate {
    type Key = ();
}

impl<K, C> Gate for SetGate<K, C> {
    type Key = K;
}

impl<T> Gate for ChangeGate<T> {
    type Key = ();
}

impl<T> Gate for MonotonicGate<T> {
    type Key = ();
}

impl Gate for AuthGate {
    type Key = ();
}

/// Live passage leases, one per outstanding guard
#[derive(Debug)]
pub(crate) struct Leases<K> {
    next_token: u64,
    live: Vec<(u64, K)>,
}

impl<K> Leases<K> {
    fn new() -> Self {
        Leases {
            next_token: 0,
            live: Vec::new(),
        }
    }

    pub(crate) fn grant(&mut self, key: K) -> u64 {
        self.next_token = self.next_token.wrapping_add(1);
        self.live.push((self.next_token, key));
        self.next_token
    }

    /// Remove a lease, returning its key if it was still live
    pub(crate) fn release(&mut self, token: u64) -> Option<K> {
        let idx = self.live.iter().position(|(t, _)| *t == token)?;
        Some(self.live.swap_remove(idx).1)
    }

    pub(crate) fn is_live(&self, token: u64) -> bool {
        self.live.iter().any(|(t, _)| *t == token)
    }

    fn revoke(&mut self, key: &K) -> usize
    where
        K: PartialEq,
    {
        let before = self.live.len();
        self.live.retain(|(_, k)| k != key);
        before - self.live.len()
    }

    pub(crate) fn len(&self) -> usize {
        self.live.len()
    }
}

pub(crate) struct Slot<G: Gate> {
    pub(crate) gate: G,
    pub(crate) leases: Leases<G::Key>,
}

/// A gate shared between owners
pub struct SharedGate<G: Gate> {
    inner: Arc<Mutex<Slot<G>>>,
}

impl<G: Gate> SharedGate<G> {
    pub fn new(gate: G) -> Self {
        SharedGate {
            inner: Arc::new(Mutex::new(Slot {
                gate,
                leases: Leases::new(),
            })),
        }
    }

    /// Run `f` with exclusive access to the gate.
    ///
    /// The mutex is held for the whole call and is not reentrant: calling any
    /// method of this handle (or a clone of it) inside `f` deadlocks. Keep `f`
    /// short. Resets made through `f` do not revoke outstanding passages; use
    /// the handle's own `reset` for that.
    pub fn with<R>(&self, f: impl FnOnce(&mut G) -> R) -> R {
        let mut slot = self.inner.lock();
        f(&mut slot.gate)
    }

    pub(crate) fn with_slot<R>(&self, f: impl FnOnce(&mut Slot<G>) -> R) -> R {
        let mut slot = self.inner.lock();
        f(&mut slot)
    }

    /// Independent copy of the current gate state
    pub fn snapshot(&self) -> G
    where
        G: Clone,
    {
        self.inner.lock().gate.clone()
    }

    /// Whether both handles refer to the same gate
    pub fn shares_with(&self, other: &SharedGate<G>) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Number of RAII passages currently holding the gate
    pub fn held_passages(&self) -> usize {
        self.inner.lock().leases.len()
    }
}

impl<G: Gate> Clone for SharedGate<G> {
    fn clone(&self) -> Self {
        SharedGate {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<G: Gate + Default> Default for SharedGate<G> {
    fn default() -> Self {
        Self::new(G::default())
    }
}

impl<G: Gate + fmt::Debug> fmt::Debug for SharedGate<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SharedGate").field(&self.inner.lock().gate).finish()
    }
}

impl SharedGate<FlagGate> {
    pub fn attempt_passage(&self) -> bool {
        self.with(|g| g.attempt_passage())
    }

    pub fn passage_allowed(&self) -> bool {
        self.with(|g| g.passage_allowed())
    }

    /// Reopen the gate, revoking any held passage
    pub fn end_passage(&self) {
        self.reset();
    }

    /// Reopen the gate, revoking any held passage
    pub fn reset(&self) {
        self.with_slot(|slot| {
            let revoked = slot.leases.revoke(&());
            if revoked > 0 {
                tracing::debug!(revoked, "flag reset revoked held passage");
            }
            slot.gate.reset();
        })
    }
}

impl<K: PartialEq, C: KeySet<K>> SharedGate<SetGate<K, C>> {
    pub fn attempt_passage(&self, key: K) -> bool {
        self.with(|g| g.attempt_passage(key))
    }

    pub fn passage_allowed(&self, key: &K) -> bool {
        self.with(|g| g.passage_allowed(key))
    }

    /// Unblock `key`, revoking any passage held for it
    pub fn end_passage(&self, key: &K) {
        self.reset(key);
    }

    /// Unblock `key`, revoking any passage held for it
    pub fn reset(&self, key: &K) {
        self.with_slot(|slot| {
            let revoked = slot.leases.revoke(key);
            if revoked > 0 {
                tracing::debug!(revoked, "key reset revoked held passage");
            }
            slot.gate.reset(key);
        })
    }

    pub fn blocked_count(&self) -> usize {
        self.with(|g| g.blocked_count())
    }
}

impl<T: PartialEq> SharedGate<ChangeGate<T>> {
    pub fn attempt_passage(&self, value: T) -> bool {
        self.with(|g| g.attempt_passage(value))
    }

    pub fn set(&self, value: T) {
        self.with(|g| g.set(value))
    }
}

impl<T: PartialOrd> SharedGate<MonotonicGate<T>> {
    pub fn attempt_passage(&self, value: T) -> bool {
        self.with(|g| g.attempt_passage(value))
    }

    pub fn set(&self, value: T) {
        self.with(|g| g.set(value))
    }
}

impl SharedGate<AuthGate> {
    pub fn is_authenticated(&self) -> bool {
        self.with(|g| g.is_authenticated())
    }

    pub fn authenticate(&self) {
        self.with(|g| g.authenticate())
    }

    pub fn deauthenticate(&self) {
        self.with(|g| g.deauthenticate())
    }
}

/// Shared hash-backed set gate
pub type SharedSetGate<K, S = RandomState> = SharedGate<SetGate<K, HashSet<K, S>>>;
