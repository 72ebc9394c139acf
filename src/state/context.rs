//! Reactive handle around the app's single [`SessionStore`].
//!
//! SYSTEM CONTEXT
//! ==============
//! `App` creates one `SessionContext` and provides it via Leptos context.
//! The store subscription mirrors every commit into a signal so components
//! re-render, and counts `Expired` events so the navigation layer can send
//! the user to `/login` without the gateway touching `window.location`.

use leptos::prelude::*;

use crate::net::gateway::SessionLink;
use crate::net::types::User;
use crate::state::session::{AttemptTicket, SessionError, SessionEvent, SessionState, SessionStore};
use crate::util::storage::BrowserStorage;

#[derive(Clone, Copy)]
pub struct SessionContext {
    store: StoredValue<SessionStore<BrowserStorage>>,
    state: RwSignal<SessionState>,
    expirations: RwSignal<u64>,
}

impl SessionContext {
    pub fn new() -> Self {
        let state = RwSignal::new(SessionState::default());
        let expirations = RwSignal::new(0_u64);
        let mut store = SessionStore::new(BrowserStorage);
        store.subscribe(move |snapshot, event| {
            state.set(snapshot.clone());
            if event == SessionEvent::Expired {
                expirations.update(|n| *n += 1);
            }
        });
        Self { store: StoredValue::new(store), state, expirations }
    }

    /// Current session snapshot.
    pub fn state(&self) -> ReadSignal<SessionState> {
        self.state.read_only()
    }

    /// Bumped every time the backend rejects the active credential.
    pub fn expirations(&self) -> ReadSignal<u64> {
        self.expirations.read_only()
    }

    pub fn initialize(&self) {
        self.store.update_value(|store| {
            store.initialize();
        });
    }

    pub fn logout(&self) {
        self.store.update_value(SessionStore::logout);
    }

    pub fn begin_attempt(&self) -> AttemptTicket {
        self.store.with_value(SessionStore::begin_attempt)
    }

    /// Commit credentials returned by a login/registration started at `ticket`.
    ///
    /// # Errors
    ///
    /// See [`SessionStore::complete_login`].
    pub fn complete_login(&self, ticket: AttemptTicket, user: User, token: String) -> Result<(), SessionError> {
        let mut outcome = Err(SessionError::Superseded);
        self.store.update_value(|store| outcome = store.complete_login(ticket, user, token));
        outcome
    }
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionLink for SessionContext {
    fn bearer_token(&self) -> Option<String> {
        self.store.with_value(|store| store.token().map(str::to_owned))
    }

    fn revoke(&self, token: &str) {
        self.store.update_value(|store| {
            if store.token() == Some(token) {
                store.expire();
            }
        });
    }
}
