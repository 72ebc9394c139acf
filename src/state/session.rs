//! Authoritative session state for the current browser user.
//!
//! SYSTEM CONTEXT
//! ==============
//! `SessionStore` is the single source of truth for "who is signed in". The
//! app root owns one instance and injects it into the route guard and the
//! auth gateway; UI re-renders through [`SessionStore::subscribe`]. Every
//! mutation mirrors itself into durable storage before it is reported.
//!
//! INVARIANTS
//! ==========
//! - `user` and `token` are either both present or both absent.
//! - Storage holds either both keys or neither at every quiescent point.
//! - `initialize` never downgrades an authenticated session.
//! - Each commit advances `epoch`; a login attempt that started under an older
//!   epoch is discarded instead of resurrecting the session.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use crate::net::types::User;
use crate::util::storage::{KeyValueStore, StorageError};

/// Storage key holding the bearer token.
pub const TOKEN_KEY: &str = "geko_token";
/// Storage key holding the JSON-serialized [`User`].
pub const USER_KEY: &str = "geko_user";

/// Snapshot of the session as seen by the UI.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SessionState {
    pub user: Option<User>,
    pub token: Option<String>,
    /// False until the first `initialize` (or any other commit) has run.
    pub ready: bool,
}

impl SessionState {
    fn signed_in(user: User, token: String) -> Self {
        Self { user: Some(user), token: Some(token), ready: true }
    }

    fn signed_out() -> Self {
        Self { user: None, token: None, ready: true }
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some() && self.token.is_some()
    }

    /// Display handle of the signed-in user.
    #[must_use]
    pub fn username(&self) -> Option<&str> {
        self.user.as_ref().map(|u| u.username.as_str())
    }
}

/// What caused the most recent commit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionEvent {
    /// First initialization found nothing stored.
    Initialized,
    /// A stored session was rehydrated.
    Restored,
    /// Stored data was malformed or incomplete and has been wiped.
    Purged,
    LoggedIn,
    LoggedOut,
    /// The backend rejected the credential mid-session.
    Expired,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("user and token are required")]
    MissingCredentials,
    #[error("session changed while the request was in flight")]
    Superseded,
    #[error("could not serialize user: {0}")]
    Serialize(String),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Epoch captured when a login or registration request starts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AttemptTicket {
    epoch: u64,
}

/// Handle returned by [`SessionStore::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SubscriptionId(u64);

type Subscriber = Box<dyn Fn(&SessionState, SessionEvent) + Send + Sync>;

/// Session container synchronized with a [`KeyValueStore`].
pub struct SessionStore<S> {
    storage: S,
    state: SessionState,
    epoch: u64,
    next_subscription: u64,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
}

impl<S: KeyValueStore> SessionStore<S> {
    /// Create an empty, not-yet-initialized session.
    pub fn new(storage: S) -> Self {
        Self { storage, state: SessionState::default(), epoch: 0, next_subscription: 0, subscribers: Vec::new() }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.is_authenticated()
    }

    pub fn token(&self) -> Option<&str> {
        self.state.token.as_deref()
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Register a listener invoked after every commit.
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: Fn(&SessionState, SessionEvent) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) {
        self.subscribers.retain(|(sub_id, _)| *sub_id != id);
    }

    /// Rehydrate from storage.
    ///
    /// Safe to call any number of times: an authenticated session is left
    /// alone, and an unchanged empty storage produces no further commits.
    /// Malformed or half-present data wipes both keys.
    pub fn initialize(&mut self) -> &SessionState {
        if self.state.is_authenticated() {
            return &self.state;
        }

        let token = self.storage.get(TOKEN_KEY);
        let raw_user = self.storage.get(USER_KEY);
        if token.is_none() && raw_user.is_none() {
            if !self.state.ready {
                self.commit(SessionState::signed_out(), SessionEvent::Initialized);
            }
            return &self.state;
        }

        match rehydrate(token, raw_user) {
            Ok((user, token)) => {
                log::info!("session: restored for {}", user.username);
                self.commit(SessionState::signed_in(user, token), SessionEvent::Restored);
            }
            Err(reason) => {
                log::warn!("session: discarding stored session ({reason})");
                self.clear_storage();
                self.commit(SessionState::signed_out(), SessionEvent::Purged);
            }
        }
        &self.state
    }

    /// Persist and commit a signed-in session.
    ///
    /// Storage failure fails the whole login: partially written keys are
    /// removed and no authenticated state is committed. If a previous session
    /// was active it is torn down too, since its stored copy is gone.
    ///
    /// # Errors
    ///
    /// [`SessionError::MissingCredentials`] for a blank token or username,
    /// [`SessionError::Storage`] when the write is rejected.
    pub fn login(&mut self, user: User, token: impl Into<String>) -> Result<(), SessionError> {
        let token = token.into();
        if token.trim().is_empty() || !user.is_valid() {
            return Err(SessionError::MissingCredentials);
        }
        let raw_user = serde_json::to_string(&user).map_err(|e| SessionError::Serialize(e.to_string()))?;

        if let Err(err) = self.persist(&token, &raw_user) {
            log::warn!("session: login not persisted: {err}");
            self.clear_storage();
            if self.state.is_authenticated() {
                self.commit(SessionState::signed_out(), SessionEvent::LoggedOut);
            }
            return Err(err.into());
        }

        log::info!("session: logged in as {}", user.username);
        self.commit(SessionState::signed_in(user, token), SessionEvent::LoggedIn);
        Ok(())
    }

    /// Capture the current epoch before issuing a login/registration request.
    pub fn begin_attempt(&self) -> AttemptTicket {
        AttemptTicket { epoch: self.epoch }
    }

    /// Commit a login whose request started at `ticket`, unless any other
    /// commit (logout, expiry, another login) happened in the meantime.
    ///
    /// # Errors
    ///
    /// [`SessionError::Superseded`] when the epoch moved, otherwise as [`Self::login`].
    pub fn complete_login(&mut self, ticket: AttemptTicket, user: User, token: impl Into<String>) -> Result<(), SessionError> {
        if ticket.epoch != self.epoch {
            log::info!("session: discarding late login response");
            return Err(SessionError::Superseded);
        }
        self.login(user, token)
    }

    /// Clear storage and commit the empty session. Safe when already signed out.
    pub fn logout(&mut self) {
        self.clear_storage();
        if self.state.is_authenticated() {
            log::info!("session: logged out");
        }
        self.commit(SessionState::signed_out(), SessionEvent::LoggedOut);
    }

    /// Teardown after the backend rejected the credential.
    pub fn expire(&mut self) {
        self.clear_storage();
        log::info!("session: credential rejected, signing out");
        self.commit(SessionState::signed_out(), SessionEvent::Expired);
    }

    fn persist(&self, token: &str, raw_user: &str) -> Result<(), StorageError> {
        self.storage.set(TOKEN_KEY, token)?;
        self.storage.set(USER_KEY, raw_user)
    }

    /// Remove both keys. A token that cannot be deleted is blanked instead,
    /// which the next `initialize` purges rather than restores.
    fn clear_storage(&self) {
        if let Err(err) = self.storage.delete(TOKEN_KEY) {
            log::warn!("session: {err}");
            if let Err(err) = self.storage.set(TOKEN_KEY, "") {
                log::error!("session: stored token survives sign-out: {err}");
            }
        }
        if let Err(err) = self.storage.delete(USER_KEY) {
            log::warn!("session: {err}");
        }
    }

    fn commit(&mut self, state: SessionState, event: SessionEvent) {
        self.state = state;
        self.epoch += 1;
        for (_, listener) in &self.subscribers {
            listener(&self.state, event);
        }
    }
}

/// Why stored session data could not be used.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
enum RehydrateError {
    #[error("token without user")]
    MissingUser,
    #[error("user without token")]
    MissingToken,
    #[error("blank token")]
    BlankToken,
    #[error("malformed user: {0}")]
    MalformedUser(String),
    #[error("user has no handle")]
    InvalidUser,
}

fn rehydrate(token: Option<String>, raw_user: Option<String>) -> Result<(User, String), RehydrateError> {
    let token = token.ok_or(RehydrateError::MissingToken)?;
    let raw_user = raw_user.ok_or(RehydrateError::MissingUser)?;
    if token.trim().is_empty() {
        return Err(RehydrateError::BlankToken);
    }
    let user: User = serde_json::from_str(&raw_user).map_err(|e| RehydrateError::MalformedUser(e.to_string()))?;
    if !user.is_valid() {
        return Err(RehydrateError::InvalidUser);
    }
    Ok((user, token))
}
