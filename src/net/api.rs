//! Authentication endpoints.
//!
//! ERROR HANDLING
//! ==============
//! Both calls return the `(user, token)` pair only when the server actually
//! issued a usable credential; a 2xx body without one is reported as
//! [`ApiError::MissingCredentials`] so the form can show an inline message.
//! An empty or `null` 2xx body counts as a reply without credentials.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use super::gateway::{ApiError, AuthGateway, SessionLink};
use super::types::{AuthResponse, LoginRequest, RegisterRequest, User};

pub const LOGIN_PATH: &str = "/api/auth/login";
pub const REGISTER_PATH: &str = "/api/auth/register";

/// Exchange email + password for a session via `POST /api/auth/login`.
///
/// # Errors
///
/// Returns [`ApiError`] on transport failure, non-2xx status, or a reply
/// without credentials.
pub async fn login<L: SessionLink>(gateway: &AuthGateway<L>, request: &LoginRequest) -> Result<(User, String), ApiError> {
    let response: Option<AuthResponse> = gateway.post_json(LOGIN_PATH, request).await?;
    credentials_from(response)
}

/// Create an account via `POST /api/auth/register`.
///
/// # Errors
///
/// Same as [`login`].
pub async fn register<L: SessionLink>(
    gateway: &AuthGateway<L>,
    request: &RegisterRequest,
) -> Result<(User, String), ApiError> {
    let response: Option<AuthResponse> = gateway.post_json(REGISTER_PATH, request).await?;
    credentials_from(response)
}

fn credentials_from(response: Option<AuthResponse>) -> Result<(User, String), ApiError> {
    match response {
        Some(AuthResponse { user: Some(user), token: Some(token) }) if user.is_valid() && !token.trim().is_empty() => {
            Ok((user, token))
        }
        _ => Err(ApiError::MissingCredentials),
    }
}
