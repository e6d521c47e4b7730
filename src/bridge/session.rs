//! Per-caller bridge session state.
//!
//! A [`BridgeSession`] tracks one caller's progress through the confirmation
//! protocol. Sessions live in a [`SessionStore`] keyed by the caller's wallet
//! address, so one adapter instance can serve several conversations without
//! them observing each other's state.
//!
//! Expiry and abandonment are absolute deadlines recorded in the session and
//! evaluated at the top of every turn; there are no background timers. Each
//! kind of deadline has exactly one slot, so arming a new one always replaces
//! the previous one.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Instant;

use alloy_primitives::Address;

use super::prepare::PreparedTransaction;

/// Where a session stands in the confirmation protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// No bridge in progress; the next call starts with token discovery.
    #[default]
    Initial,
    /// Tokens are resolved (or listed); the next call quotes and shows the
    /// confirmation summary.
    Confirmation,
    /// A confirmation summary has been shown; the next call either executes
    /// (confirmed) or cancels.
    Execution,
}

/// Durable state of one caller's bridge conversation.
#[derive(Debug, Clone, Default)]
pub struct BridgeSession {
    pub phase: Phase,
    /// The quoted transaction shown at confirmation time, reused at execution
    /// time so both steps see the same numbers.
    pub prepared: Option<PreparedTransaction>,
    /// When the shown confirmation stops being valid.
    pub expires_at: Option<Instant>,
    /// When the whole session is abandoned.
    pub abandon_at: Option<Instant>,
    /// Set when a confirmation window lapsed and the user must re-confirm
    /// fresh numbers.
    pub expired: bool,
}

impl BridgeSession {
    /// Whether the abandonment deadline has passed.
    pub fn abandoned(&self, now: Instant) -> bool {
        self.abandon_at.is_some_and(|deadline| now >= deadline)
    }

    /// Whether the confirmation expiry deadline has passed.
    pub fn expiry_elapsed(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|deadline| now >= deadline)
    }
}

/// In-memory session store keyed by caller address.
///
/// Multi-instance deployments that need sessions to survive a process can
/// wrap the adapter with their own persistence; the orchestrator only loads a
/// session at the top of a turn and writes it back at each exit.
#[derive(Debug, Default)]
pub struct SessionStore {
    inner: Mutex<HashMap<Address, BridgeSession>>,
}

impl SessionStore {
    /// Returns a copy of the caller's session, or a fresh one.
    pub fn load(&self, caller: Address) -> BridgeSession {
        self.inner
            .lock()
            .expect("session store lock poisoned")
            .get(&caller)
            .cloned()
            .unwrap_or_default()
    }

    /// Writes the caller's session back.
    pub fn put(&self, caller: Address, session: BridgeSession) {
        self.inner
            .lock()
            .expect("session store lock poisoned")
            .insert(caller, session);
    }

    /// Discards the caller's session; the next turn starts from
    /// [`Phase::Initial`].
    pub fn reset(&self, caller: Address) {
        self.inner
            .lock()
            .expect("session store lock poisoned")
            .remove(&caller);
    }
}
