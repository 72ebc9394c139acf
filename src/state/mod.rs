//! Shared client-side state modules.
//!
//! DESIGN
//! ======
//! `session` is plain Rust and fully testable without a browser; `context`
//! is the thin reactive wrapper components read through Leptos context.

pub mod context;
pub mod session;
