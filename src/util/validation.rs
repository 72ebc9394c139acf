//! Client-side form validation for login and registration.
//!
//! Validation failures never reach the network; the returned [`FormError`]
//! is rendered inline by the page.

#[cfg(test)]
#[path = "validation_test.rs"]
mod validation_test;

use crate::net::types::{LoginRequest, RegisterRequest};

pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("All fields are required.")]
    MissingFields,
    #[error("Invalid email address.")]
    InvalidEmail,
    #[error("Passwords do not match.")]
    PasswordMismatch,
    #[error("Password must be at least 6 characters.")]
    PasswordTooShort,
}

/// `x@y.z` shape: a non-whitespace character before some `@`, followed by a
/// non-whitespace run containing an inner `.`.
#[must_use]
pub fn is_email_shaped(email: &str) -> bool {
    email.char_indices().filter(|(_, c)| *c == '@').any(|(at, _)| {
        let before = email[..at].chars().next_back();
        let domain = email[at + 1..].split(char::is_whitespace).next().unwrap_or_default();
        before.is_some_and(|c| !c.is_whitespace())
            && domain.char_indices().any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
    })
}

/// Validate the login form. The email is trimmed before sending.
///
/// # Errors
///
/// [`FormError::MissingFields`] or [`FormError::InvalidEmail`].
pub fn validate_login(email: &str, password: &str) -> Result<LoginRequest, FormError> {
    let email = email.trim();
    if email.is_empty() || password.is_empty() {
        return Err(FormError::MissingFields);
    }
    if !is_email_shaped(email) {
        return Err(FormError::InvalidEmail);
    }
    Ok(LoginRequest { email: email.to_owned(), password: password.to_owned() })
}

/// Validate the registration form and strip the confirmation field.
///
/// Checks run in the order the user sees them reported: required fields,
/// confirmation match, password length, then email shape.
///
/// # Errors
///
/// Any [`FormError`] variant.
pub fn validate_register(username: &str, email: &str, password: &str, confirm: &str) -> Result<RegisterRequest, FormError> {
    let username = username.trim();
    let email = email.trim();
    if username.is_empty() || email.is_empty() || password.is_empty() {
        return Err(FormError::MissingFields);
    }
    if password != confirm {
        return Err(FormError::PasswordMismatch);
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(FormError::PasswordTooShort);
    }
    if !is_email_shaped(email) {
        return Err(FormError::InvalidEmail);
    }
    Ok(RegisterRequest { username: username.to_owned(), email: email.to_owned(), password: password.to_owned() })
}
