//! Profile and settings pages.

#[cfg(test)]
#[path = "account_test.rs"]
mod account_test;

use leptos::prelude::*;
use leptos_router::components::A;

use crate::config::ClientConfig;
use crate::state::context::SessionContext;
use crate::state::session::SessionState;

/// Label/value rows describing the stored identity.
pub fn profile_rows(state: &SessionState) -> Vec<(&'static str, String)> {
    let Some(user) = state.user.as_ref() else {
        return Vec::new();
    };
    let mut rows = vec![("Username", user.username.clone())];
    if let Some(email) = &user.email {
        rows.push(("Email", email.clone()));
    }
    if let Some(id) = &user.id {
        rows.push(("ID", id.clone()));
    }
    rows
}

#[component]
pub fn ProfilePage() -> impl IntoView {
    let state = expect_context::<SessionContext>().state();

    view! {
        <div class="page">
            <div class="page__heading">
                <h1>"Profile"</h1>
                <p>"Manage your personal information."</p>
            </div>
            <dl class="panel profile">
                {move || {
                    profile_rows(&state.get())
                        .into_iter()
                        .map(|(label, value)| view! {
                            <dt>{label}</dt>
                            <dd>{value}</dd>
                        })
                        .collect_view()
                }}
            </dl>
        </div>
    }
}

#[component]
pub fn SettingsPage() -> impl IntoView {
    let config = expect_context::<ClientConfig>();

    view! {
        <div class="page">
            <div class="page__heading">
                <h1>"Settings"</h1>
                <p>"Configure application preferences."</p>
            </div>
            <dl class="panel settings">
                <dt>"API endpoint"</dt>
                <dd>{config.api_base_url.clone()}</dd>
                <dt>"Request timeout"</dt>
                <dd>{format!("{} ms", config.request_timeout_ms)}</dd>
            </dl>
        </div>
    }
}

#[component]
pub fn NotFoundPage() -> impl IntoView {
    view! {
        <div class="not-found">
            <h1>"404"</h1>
            <p>"Page not found"</p>
            <A href="/">"Back to the dashboard"</A>
        </div>
    }
}
