//! Authenticated HTTP gateway to the backend.
//!
//! Client-side (hydrate): real HTTP calls via `gloo-net` with a timeout race
//! against `gloo-timers`. Server-side (SSR): requests fail with
//! [`ApiError::Unavailable`] since the session only exists in the browser.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every request made through [`AuthGateway`] carries the session's bearer
//! token when one exists and never an empty header otherwise. A 401/403 for a
//! request that presented a token tears the session down through
//! [`SessionLink::revoke`]; the navigation layer observes that as an
//! `Expired` session event and redirects. Call sites never handle expiry
//! themselves.
//!
//! ERROR HANDLING
//! ==============
//! Timeouts and network failures are transport errors and never touch the
//! session. Other non-2xx statuses pass through with the server's message.

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "gateway_test.rs"]
mod gateway_test;

use std::cell::RefCell;
use std::rc::Rc;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::config::ClientConfig;
use crate::state::session::SessionStore;
use crate::util::storage::KeyValueStore;

/// Shown for a 2xx auth response that carries no credential.
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid credentials.";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The credential was rejected and the session has been torn down.
    #[error("session expired")]
    SessionExpired,
    #[error("request failed with status {status}")]
    Status { status: u16, message: Option<String> },
    #[error("response did not include credentials")]
    MissingCredentials,
    #[error("network error: {0}")]
    Transport(String),
    #[error("request timed out")]
    Timeout,
    #[error("invalid response body: {0}")]
    Decode(String),
    #[error("not available outside the browser")]
    Unavailable,
}

impl ApiError {
    /// Text to show inline in a form. Server messages are surfaced verbatim;
    /// anything without one falls back to `fallback`.
    #[must_use]
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Status { message: Some(message), .. } => message.clone(),
            Self::MissingCredentials => INVALID_CREDENTIALS_MESSAGE.to_owned(),
            _ => fallback.to_owned(),
        }
    }
}

/// The gateway's view of the session: read the credential, revoke it.
pub trait SessionLink {
    fn bearer_token(&self) -> Option<String>;

    /// Tear down the session if `token` is still the active credential.
    fn revoke(&self, token: &str);
}

impl<S: KeyValueStore> SessionLink for RefCell<SessionStore<S>> {
    fn bearer_token(&self) -> Option<String> {
        self.borrow().token().map(str::to_owned)
    }

    fn revoke(&self, token: &str) {
        let mut store = self.borrow_mut();
        if store.token() == Some(token) {
            store.expire();
        }
    }
}

impl<L: SessionLink + ?Sized> SessionLink for Rc<L> {
    fn bearer_token(&self) -> Option<String> {
        (**self).bearer_token()
    }

    fn revoke(&self, token: &str) {
        (**self).revoke(token);
    }
}

impl<L: SessionLink + ?Sized> SessionLink for &L {
    fn bearer_token(&self) -> Option<String> {
        (**self).bearer_token()
    }

    fn revoke(&self, token: &str) {
        (**self).revoke(token);
    }
}

/// Status and body of a completed HTTP exchange.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

/// 401 and 403 both mean the presented credential is no longer accepted.
#[must_use]
pub fn is_authorization_rejection(status: u16) -> bool {
    matches!(status, 401 | 403)
}

/// Headers for an outgoing JSON request.
#[must_use]
pub fn outgoing_headers(token: Option<&str>) -> Vec<(&'static str, String)> {
    let mut headers = vec![("Content-Type", "application/json".to_owned())];
    if let Some(token) = token.filter(|t| !t.trim().is_empty()) {
        headers.push(("Authorization", format!("Bearer {token}")));
    }
    headers
}

/// Pull a human-readable error out of a JSON error body.
///
/// Prefers `detail` (string, or a list of `{msg}` entries) over `message`.
#[must_use]
pub fn server_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    let detail = match value.get("detail") {
        Some(serde_json::Value::String(detail)) => Some(detail.clone()),
        Some(serde_json::Value::Array(items)) => {
            let joined = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(serde_json::Value::as_str))
                .collect::<Vec<_>>()
                .join("; ");
            Some(joined)
        }
        _ => None,
    };
    detail
        .filter(|d| !d.is_empty())
        .or_else(|| value.get("message").and_then(serde_json::Value::as_str).map(str::to_owned))
        .filter(|m| !m.trim().is_empty())
}

/// HTTP client wrapper bound to one session.
#[derive(Clone, Debug)]
pub struct AuthGateway<L> {
    config: ClientConfig,
    session: L,
}

impl<L: SessionLink> AuthGateway<L> {
    pub fn new(config: ClientConfig, session: L) -> Self {
        Self { config, session }
    }

    /// Headers for a request issued right now.
    pub fn headers(&self) -> Vec<(&'static str, String)> {
        outgoing_headers(self.session.bearer_token().as_deref())
    }

    /// Interpret a completed exchange.
    ///
    /// `sent_token` is the credential attached to the request, if any; only a
    /// rejection of a presented credential tears the session down.
    ///
    /// # Errors
    ///
    /// See [`ApiError`].
    pub fn handle_response<T: DeserializeOwned>(&self, response: RawResponse, sent_token: Option<&str>) -> Result<T, ApiError> {
        let RawResponse { status, body } = response;
        if (200..300).contains(&status) {
            let body = if body.trim().is_empty() { "null" } else { body.as_str() };
            return serde_json::from_str(body).map_err(|e| ApiError::Decode(e.to_string()));
        }
        if is_authorization_rejection(status) {
            if let Some(token) = sent_token {
                log::warn!("gateway: credential rejected with {status}");
                self.session.revoke(token);
                return Err(ApiError::SessionExpired);
            }
        }
        Err(ApiError::Status { status, message: server_message(&body) })
    }

    /// `POST` a JSON body and decode the JSON reply.
    ///
    /// # Errors
    ///
    /// See [`ApiError`]; serialization failures are reported as `Decode`.
    pub async fn post_json<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T, ApiError> {
        let body = serde_json::to_string(body).map_err(|e| ApiError::Decode(e.to_string()))?;
        self.send(path, body).await
    }

    async fn send<T: DeserializeOwned>(&self, path: &str, body: String) -> Result<T, ApiError> {
        let url = self.config.endpoint(path);
        #[cfg(feature = "hydrate")]
        {
            use futures::future::{Either, select};
            use gloo_net::http::Request;

            let token = self.session.bearer_token().filter(|t| !t.trim().is_empty());
            let mut builder = Request::post(&url);
            for (name, value) in outgoing_headers(token.as_deref()) {
                builder = builder.header(name, &value);
            }
            let request = builder.body(body).map_err(|e| ApiError::Transport(e.to_string()))?;

            let pending = Box::pin(request.send());
            let timer = Box::pin(gloo_timers::future::TimeoutFuture::new(self.config.request_timeout_ms));
            let response = match select(pending, timer).await {
                Either::Left((result, _)) => result.map_err(|e| {
                    log::warn!("gateway: POST {path} failed: {e}");
                    ApiError::Transport(e.to_string())
                })?,
                Either::Right(_) => {
                    log::warn!("gateway: POST {path} timed out");
                    return Err(ApiError::Timeout);
                }
            };

            let status = response.status();
            let body = response.text().await.map_err(|e| ApiError::Transport(e.to_string()))?;
            self.handle_response(RawResponse { status, body }, token.as_deref())
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (url, body);
            Err(ApiError::Unavailable)
        }
    }
}
