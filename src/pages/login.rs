//! Login page: email + password against `POST /api/auth/login`.

#[cfg(test)]
#[path = "login_test.rs"]
mod login_test;

use leptos::prelude::*;
use leptos_router::components::A;

use crate::net::gateway::ApiError;
use crate::state::session::SessionError;
use crate::util::validation::validate_login;

pub const LOGIN_FALLBACK_MESSAGE: &str = "Login failed. Please try again.";

/// Inline message for a failed login request.
pub fn login_error_message(err: &ApiError) -> String {
    err.user_message(LOGIN_FALLBACK_MESSAGE)
}

/// Inline message when credentials arrived but could not be committed.
/// `None` means the attempt was superseded and should be dropped silently.
pub fn commit_error_message(err: &SessionError) -> Option<String> {
    match err {
        SessionError::Superseded => None,
        SessionError::MissingCredentials => Some(crate::net::gateway::INVALID_CREDENTIALS_MESSAGE.to_owned()),
        SessionError::Storage(_) | SessionError::Serialize(_) => {
            Some("Could not save your session in this browser. Check storage permissions and try again.".to_owned())
        }
    }
}

pub fn submit_label(busy: bool, idle: &'static str, pending: &'static str) -> &'static str {
    if busy { pending } else { idle }
}

#[component]
pub fn LoginPage() -> impl IntoView {
    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let error = RwSignal::new(String::new());
    let busy = RwSignal::new(false);

    #[cfg(feature = "hydrate")]
    let session = expect_context::<crate::state::context::SessionContext>();
    #[cfg(feature = "hydrate")]
    let config = expect_context::<crate::config::ClientConfig>();
    #[cfg(feature = "hydrate")]
    let navigate = leptos_router::hooks::use_navigate();

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get() {
            return;
        }
        error.set(String::new());
        let request = match validate_login(&email.get(), &password.get()) {
            Ok(request) => request,
            Err(e) => {
                error.set(e.to_string());
                return;
            }
        };
        busy.set(true);

        #[cfg(feature = "hydrate")]
        {
            let config = config.clone();
            let navigate = navigate.clone();
            leptos::task::spawn_local(async move {
                let ticket = session.begin_attempt();
                let gateway = crate::net::gateway::AuthGateway::new(config, session);
                match crate::net::api::login(&gateway, &request).await {
                    Ok((user, token)) => match session.complete_login(ticket, user, token) {
                        Ok(()) => navigate(crate::util::guard::DASHBOARD_PATH, leptos_router::NavigateOptions::default()),
                        Err(e) => {
                            if let Some(message) = commit_error_message(&e) {
                                error.set(message);
                            }
                        }
                    },
                    Err(e) => error.set(login_error_message(&e)),
                }
                busy.set(false);
            });
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = request;
        }
    };

    view! {
        <div class="auth-page">
            <div class="auth-card">
                <h1>"GEKO"</h1>
                <p class="auth-card__subtitle">"Sign in to your account"</p>
                <form class="auth-form" on:submit=on_submit>
                    <Show when=move || !error.get().is_empty()>
                        <div class="auth-error">{move || error.get()}</div>
                    </Show>
                    <label class="auth-label">
                        "Email"
                        <input
                            class="auth-input"
                            type="email"
                            placeholder="name@example.com"
                            prop:value=move || email.get()
                            on:input=move |ev| email.set(event_target_value(&ev))
                        />
                    </label>
                    <label class="auth-label">
                        "Password"
                        <input
                            class="auth-input"
                            type="password"
                            prop:value=move || password.get()
                            on:input=move |ev| password.set(event_target_value(&ev))
                        />
                    </label>
                    <button class="auth-button" type="submit" disabled=move || busy.get()>
                        {move || submit_label(busy.get(), "Sign in", "Signing in...")}
                    </button>
                </form>
                <p class="auth-card__switch">
                    "No account yet? "
                    <A href="/register">"Register"</A>
                </p>
            </div>
        </div>
    }
}
