//! Authentication gate - a manually driven flag

use crate::{GateError, GateKind, GateResult};

/// Authenticated flag set only by [`authenticate`](AuthGate::authenticate)
/// and [`deauthenticate`](AuthGate::deauthenticate).
///
/// Unlike [`FlagGate`](crate::FlagGate), querying never closes the gate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AuthGate {
    authenticated: bool,
}

impl AuthGate {
    /// Create an unauthenticated gate
    pub const fn new() -> Self {
        AuthGate {
            authenticated: false,
        }
    }

    pub const fn authenticated() -> Self {
        AuthGate {
            authenticated: true,
        }
    }

    #[inline]
    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    /// Query the authenticated state. Does not mutate.
    #[deprecated(note = "pure query; use `is_authenticated`")]
    #[inline]
    pub fn attempt_passage(&self) -> bool {
        self.is_authenticated()
    }

    pub fn require_authenticated(&self) -> GateResult<()> {
        if self.authenticated {
            Ok(())
        } else {
            Err(GateError::Unauthenticated)
        }
    }

    pub fn authenticate(&mut self) {
        tracing::debug!(gate = %GateKind::Auth, "authenticated");
        self.authenticated = true;
    }

    pub fn deauthenticate(&mut self) {
        tracing::debug!(gate = %GateKind::Auth, "deauthenticated");
        self.authenticated = false;
    }
}
