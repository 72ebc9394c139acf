use std::cell::RefCell;
use std::rc::Rc;

use super::*;
use crate::config::ClientConfig;
use crate::net::gateway::{INVALID_CREDENTIALS_MESSAGE, RawResponse};
use crate::state::session::SessionStore;
use crate::util::storage::MemoryStorage;

fn parse(raw: &str) -> Option<AuthResponse> {
    serde_json::from_str(raw).unwrap()
}

#[test]
fn credentials_from_accepts_user_and_token() {
    let (user, token) = credentials_from(parse(r#"{"user":{"id":1,"username":"alice"},"token":"tok123"}"#)).unwrap();
    assert_eq!(user.username, "alice");
    assert_eq!(token, "tok123");
}

#[test]
fn credentials_from_rejects_missing_token() {
    assert_eq!(
        credentials_from(parse(r#"{"user":{"username":"alice"}}"#)),
        Err(ApiError::MissingCredentials)
    );
}

#[test]
fn credentials_from_rejects_blank_token_or_missing_user() {
    assert_eq!(
        credentials_from(parse(r#"{"user":{"username":"alice"},"token":""}"#)),
        Err(ApiError::MissingCredentials)
    );
    assert_eq!(credentials_from(parse(r#"{"token":"tok123"}"#)), Err(ApiError::MissingCredentials));
}

#[test]
fn endpoint_paths_match_backend_routes() {
    assert_eq!(LOGIN_PATH, "/api/auth/login");
    assert_eq!(REGISTER_PATH, "/api/auth/register");
}

#[test]
fn empty_success_body_reports_invalid_credentials() {
    let gateway = AuthGateway::new(ClientConfig::default(), Rc::new(RefCell::new(SessionStore::new(MemoryStorage::new()))));
    for body in ["", "null", "  "] {
        let response: Option<AuthResponse> =
            gateway.handle_response(RawResponse { status: 200, body: body.to_owned() }, None).unwrap();
        let err = credentials_from(response).unwrap_err();
        assert_eq!(err, ApiError::MissingCredentials);
        assert_eq!(err.user_message("Login failed. Please try again."), INVALID_CREDENTIALS_MESSAGE);
    }
}
