use std::sync::{Arc, Mutex};

use super::*;
use crate::util::storage::MemoryStorage;

/// Memory storage that rejects writes to one key, and optionally all deletes.
#[derive(Clone, Default)]
struct FlakyStorage {
    inner: MemoryStorage,
    reject_writes_to: Option<&'static str>,
    reject_deletes: bool,
}

impl KeyValueStore for FlakyStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.reject_writes_to == Some(key) {
            return Err(StorageError::Write { key: key.to_owned(), reason: "QuotaExceededError".to_owned() });
        }
        self.inner.set(key, value)
    }

    fn delete(&self, key: &str) -> Result<(), StorageError> {
        if self.reject_deletes {
            return Err(StorageError::Delete { key: key.to_owned(), reason: "SecurityError".to_owned() });
        }
        self.inner.delete(key)
    }
}

fn alice() -> User {
    User::new("alice").with_id("u1")
}

fn store() -> (SessionStore<MemoryStorage>, MemoryStorage) {
    let storage = MemoryStorage::new();
    (SessionStore::new(storage.clone()), storage)
}

fn seeded(token: Option<&str>, user: Option<&str>) -> (SessionStore<MemoryStorage>, MemoryStorage) {
    let storage = MemoryStorage::new();
    if let Some(token) = token {
        storage.set(TOKEN_KEY, token).unwrap();
    }
    if let Some(user) = user {
        storage.set(USER_KEY, user).unwrap();
    }
    (SessionStore::new(storage.clone()), storage)
}

/// In-memory flag and persisted keys agree.
fn assert_consistent(session: &SessionStore<MemoryStorage>, storage: &MemoryStorage) {
    let state = session.state();
    assert_eq!(state.user.is_some(), state.token.is_some(), "partial in-memory session");
    assert_eq!(storage.contains(TOKEN_KEY), storage.contains(USER_KEY), "half-cleared storage");
    assert_eq!(state.is_authenticated(), storage.contains(TOKEN_KEY));
}

// =============================================================
// Defaults
// =============================================================

#[test]
fn new_session_is_empty_and_not_ready() {
    let (session, _) = store();
    assert_eq!(session.state(), &SessionState::default());
    assert!(!session.state().ready);
    assert!(!session.is_authenticated());
}

// =============================================================
// login / logout
// =============================================================

#[test]
fn login_persists_token_and_user() {
    let (mut session, storage) = store();
    session.login(User::new("alice"), "tok123").unwrap();

    assert!(session.is_authenticated());
    assert_eq!(storage.get(TOKEN_KEY).as_deref(), Some("tok123"));
    let stored: User = serde_json::from_str(&storage.get(USER_KEY).unwrap()).unwrap();
    assert_eq!(stored.username, "alice");
    assert_consistent(&session, &storage);
}

#[test]
fn login_rejects_blank_token() {
    let (mut session, storage) = store();
    assert_eq!(session.login(alice(), "  "), Err(SessionError::MissingCredentials));
    assert!(!session.is_authenticated());
    assert!(storage.is_empty());
}

#[test]
fn login_rejects_user_without_handle() {
    let (mut session, storage) = store();
    assert_eq!(session.login(User::new(""), "tok"), Err(SessionError::MissingCredentials));
    assert!(!session.is_authenticated());
    assert!(storage.is_empty());
}

#[test]
fn logout_clears_memory_and_storage() {
    let (mut session, storage) = store();
    session.login(alice(), "tok123").unwrap();
    session.logout();

    assert!(!session.is_authenticated());
    assert_eq!(session.state().user, None);
    assert!(!storage.contains(TOKEN_KEY));
    assert!(!storage.contains(USER_KEY));
}

#[test]
fn logout_with_failing_deletes_stays_signed_out_after_reload() {
    let storage = FlakyStorage { reject_deletes: true, ..FlakyStorage::default() };
    let mut session = SessionStore::new(storage.clone());
    session.login(alice(), "tok123").unwrap();

    session.logout();
    assert!(!session.is_authenticated());
    assert_eq!(storage.inner.get(TOKEN_KEY).as_deref(), Some(""));

    let mut reloaded = SessionStore::new(storage);
    assert!(!reloaded.initialize().is_authenticated());
}

#[test]
fn logout_when_signed_out_is_harmless() {
    let (mut session, storage) = store();
    session.logout();
    session.logout();
    assert!(!session.is_authenticated());
    assert!(session.state().ready);
    assert!(storage.is_empty());
}

#[test]
fn login_storage_failure_rolls_back_partial_write() {
    let storage = FlakyStorage { reject_writes_to: Some(USER_KEY), ..FlakyStorage::default() };
    let mut session = SessionStore::new(storage.clone());

    let err = session.login(alice(), "tok123").unwrap_err();
    assert!(matches!(err, SessionError::Storage(StorageError::Write { .. })));
    assert!(!session.is_authenticated());
    assert!(storage.inner.is_empty());
}

#[test]
fn login_storage_failure_tears_down_previous_session() {
    let mut storage = FlakyStorage::default();
    let mut session = SessionStore::new(storage.clone());
    session.login(alice(), "tok-old").unwrap();

    storage.reject_writes_to = Some(TOKEN_KEY);
    let mut session = SessionStore { storage, ..session };
    assert!(session.login(User::new("bob"), "tok-new").is_err());
    assert!(!session.is_authenticated());
    assert!(session.storage().inner.is_empty());
}

#[test]
fn login_without_storage_medium_fails_instead_of_half_committing() {
    let mut session = SessionStore::new(crate::util::storage::BrowserStorage);
    let err = session.login(alice(), "tok").unwrap_err();
    assert_eq!(err, SessionError::Storage(StorageError::Unavailable));
    assert!(!session.is_authenticated());
}

// =============================================================
// initialize
// =============================================================

#[test]
fn initialize_with_empty_storage_is_signed_out() {
    let (mut session, storage) = store();
    let state = session.initialize();
    assert!(!state.is_authenticated());
    assert!(state.ready);
    assert_eq!(state.user, None);
    assert_consistent(&session, &storage);
}

#[test]
fn initialize_restores_stored_session() {
    let (mut session, storage) = seeded(Some("tok123"), Some(r#"{"id":7,"username":"alice"}"#));
    session.initialize();

    assert!(session.is_authenticated());
    assert_eq!(session.token(), Some("tok123"));
    assert_eq!(session.state().username(), Some("alice"));
    assert_eq!(session.state().user.as_ref().and_then(|u| u.id.as_deref()), Some("7"));
    assert_consistent(&session, &storage);
}

#[test]
fn initialize_twice_yields_same_session() {
    let (mut session, _) = seeded(Some("tok123"), Some(r#"{"username":"alice"}"#));
    let first = session.initialize().clone();
    let second = session.initialize().clone();
    assert_eq!(first, second);

    let (mut empty, _) = store();
    let first = empty.initialize().clone();
    let second = empty.initialize().clone();
    assert_eq!(first, second);
}

#[test]
fn initialize_after_login_keeps_session() {
    let (mut session, storage) = store();
    session.login(alice(), "tok123").unwrap();

    // Even if storage were wiped externally, an authenticated session stays.
    storage.delete(TOKEN_KEY).unwrap();
    session.initialize();
    assert!(session.is_authenticated());
    assert_eq!(session.token(), Some("tok123"));
}

#[test]
fn initialize_with_malformed_user_purges_both_keys() {
    let (mut session, storage) = seeded(Some("tok123"), Some("{not json"));
    session.initialize();

    assert!(!session.is_authenticated());
    assert!(!storage.contains(TOKEN_KEY));
    assert!(!storage.contains(USER_KEY));
}

#[test]
fn initialize_with_token_but_no_user_clears_token_too() {
    let (mut session, storage) = seeded(Some("tok123"), None);
    session.initialize();

    assert!(!session.is_authenticated());
    assert!(storage.is_empty());
    assert_consistent(&session, &storage);
}

#[test]
fn initialize_with_user_but_no_token_is_signed_out() {
    let (mut session, storage) = seeded(None, Some(r#"{"username":"alice"}"#));
    session.initialize();
    assert!(!session.is_authenticated());
    assert!(storage.is_empty());
}

#[test]
fn initialize_with_blank_stored_token_is_purged() {
    let (mut session, storage) = seeded(Some(""), Some(r#"{"username":"alice"}"#));
    session.initialize();
    assert!(!session.is_authenticated());
    assert!(storage.is_empty());
}

#[test]
fn rehydrate_reports_reason() {
    assert_eq!(rehydrate(Some("t".to_owned()), None), Err(RehydrateError::MissingUser));
    assert_eq!(rehydrate(None, Some("{}".to_owned())), Err(RehydrateError::MissingToken));
    assert_eq!(
        rehydrate(Some("t".to_owned()), Some(r#"{"username":" "}"#.to_owned())),
        Err(RehydrateError::InvalidUser)
    );
    assert!(matches!(
        rehydrate(Some("t".to_owned()), Some("[]".to_owned())),
        Err(RehydrateError::MalformedUser(_))
    ));
}

// =============================================================
// expiry, ordering, subscriptions
// =============================================================

#[test]
fn expire_tears_down_like_logout() {
    let (mut session, storage) = store();
    session.login(alice(), "tok123").unwrap();
    session.expire();
    assert!(!session.is_authenticated());
    assert!(storage.is_empty());
}

#[test]
fn late_login_after_logout_is_discarded() {
    let (mut session, storage) = store();
    session.initialize();
    let ticket = session.begin_attempt();

    session.logout();
    let result = session.complete_login(ticket, alice(), "tok123");

    assert_eq!(result, Err(SessionError::Superseded));
    assert!(!session.is_authenticated());
    assert!(storage.is_empty());
}

#[test]
fn login_with_current_ticket_commits() {
    let (mut session, _) = store();
    session.initialize();
    let ticket = session.begin_attempt();
    session.complete_login(ticket, alice(), "tok123").unwrap();
    assert!(session.is_authenticated());
}

#[test]
fn repeated_initialize_does_not_supersede_pending_login() {
    let (mut session, _) = store();
    session.initialize();
    let ticket = session.begin_attempt();
    session.initialize();
    session.initialize();
    assert!(session.complete_login(ticket, alice(), "tok123").is_ok());
}

#[test]
fn subscribers_observe_each_commit() {
    let (mut session, _) = store();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    session.subscribe(move |state, event| sink.lock().unwrap().push((event, state.is_authenticated())));

    session.initialize();
    session.login(alice(), "tok").unwrap();
    session.expire();

    assert_eq!(
        *seen.lock().unwrap(),
        vec![
            (SessionEvent::Initialized, false),
            (SessionEvent::LoggedIn, true),
            (SessionEvent::Expired, false),
        ]
    );
}

#[test]
fn unsubscribed_listener_is_not_called() {
    let (mut session, _) = store();
    let calls = Arc::new(Mutex::new(0));
    let sink = calls.clone();
    let id = session.subscribe(move |_, _| *sink.lock().unwrap() += 1);
    session.unsubscribe(id);
    session.login(alice(), "tok").unwrap();
    assert_eq!(*calls.lock().unwrap(), 0);
}

#[test]
fn purge_is_reported_to_subscribers() {
    let (mut session, _) = seeded(Some("tok"), Some("garbage"));
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    session.subscribe(move |_, event| sink.lock().unwrap().push(event));
    session.initialize();
    assert_eq!(*seen.lock().unwrap(), vec![SessionEvent::Purged]);
}

#[test]
fn consistency_holds_across_operation_sequences() {
    let (mut session, storage) = store();
    session.initialize();
    assert_consistent(&session, &storage);
    session.login(alice(), "t1").unwrap();
    assert_consistent(&session, &storage);
    session.initialize();
    assert_consistent(&session, &storage);
    session.logout();
    assert_consistent(&session, &storage);
    session.login(User::new("bob"), "t2").unwrap();
    assert_consistent(&session, &storage);
    session.expire();
    assert_consistent(&session, &storage);
    session.initialize();
    assert_consistent(&session, &storage);
}
