//! Route-level guards built on [`crate::util::guard::evaluate`].
//!
//! SYSTEM CONTEXT
//! ==============
//! Every guarded route initializes the session before deciding, so a fresh
//! page load rehydrates from storage first. Redirects replace the history
//! entry; the attempted destination is not remembered.

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;

use crate::state::context::SessionContext;
use crate::util::guard::{AppRoute, GuardDecision, LOGIN_PATH, evaluate};

fn replace() -> NavigateOptions {
    NavigateOptions { replace: true, ..NavigateOptions::default() }
}

/// Initialize the session, evaluate `route`, and follow any redirect.
pub fn use_route_guard(route: AppRoute) -> Memo<GuardDecision> {
    let session = expect_context::<SessionContext>();
    let navigate = use_navigate();

    Effect::new(move || session.initialize());

    let state = session.state();
    let decision = Memo::new(move |_| evaluate(route, &state.get()));
    Effect::new(move || {
        if let GuardDecision::Redirect(path) = decision.get() {
            navigate(path, replace());
        }
    });
    decision
}

/// Renders `children` only when the guard admits `route`.
#[component]
pub fn RouteGate(route: AppRoute, children: ChildrenFn) -> impl IntoView {
    let decision = use_route_guard(route);
    view! {
        <Show when=move || decision.get() == GuardDecision::Render>
            {children()}
        </Show>
    }
}

/// `/`: no content, only the session-dependent redirect.
#[component]
pub fn RootRedirect() -> impl IntoView {
    use_route_guard(AppRoute::Root);
}

/// Sends the user to login whenever the gateway reports an expired credential.
#[component]
pub fn ExpiryRedirect() -> impl IntoView {
    let expirations = expect_context::<SessionContext>().expirations();
    let navigate = use_navigate();
    Effect::new(move || {
        if expirations.get() > 0 {
            log::info!("session expired, redirecting to {LOGIN_PATH}");
            navigate(LOGIN_PATH, replace());
        }
    });
}
