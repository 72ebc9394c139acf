//! Networking modules for the backend REST API.
//!
//! SYSTEM CONTEXT
//! ==============
//! `gateway` owns bearer-token attachment and rejection handling, `api` wraps
//! the auth endpoints, and `types` defines the wire schema.

pub mod api;
pub mod gateway;
pub mod types;
