//! Page modules for route-level screens.
//!
//! ARCHITECTURE
//! ============
//! Each page owns route-scoped orchestration and delegates shared chrome to
//! `components`. Access control lives in the route table, not in pages.

pub mod account;
pub mod dashboard;
pub mod login;
pub mod register;
