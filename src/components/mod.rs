//! Reusable UI component modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Components render shared chrome and route gating while reading session
//! state from Leptos context.

pub mod layout;
pub mod route_gate;
