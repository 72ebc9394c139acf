//! # dashboard-client
//!
//! Leptos + WASM frontend for the Geko dashboard: login and registration,
//! a protected area, and a browser session that survives reloads.
//!
//! The session layer (`state::session`), the storage adapter
//! (`util::storage`), the auth gateway (`net::gateway`) and the route guard
//! (`util::guard`) are plain Rust and run without a browser; pages and
//! components bind them to Leptos.

pub mod app;
pub mod components;
pub mod config;
pub mod net;
pub mod pages;
pub mod state;
pub mod util;

/// WASM entry point: install logging and hydrate the server-rendered body.
#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    console_error_panic_hook::set_once();
    if let Err(err) = console_log::init_with_level(log::Level::Debug) {
        leptos::logging::warn!("console logger not installed: {err}");
    }
    log::info!("hydrating dashboard client");
    leptos::mount::hydrate_body(app::App);
}
