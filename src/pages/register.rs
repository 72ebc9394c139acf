//! Registration page: creates an account and signs straight in.

#[cfg(test)]
#[path = "register_test.rs"]
mod register_test;

use leptos::prelude::*;
use leptos_router::components::A;

use super::login::submit_label;
use crate::net::gateway::ApiError;
use crate::util::validation::validate_register;

pub const REGISTER_FALLBACK_MESSAGE: &str = "Registration failed. Please try again.";

pub fn register_error_message(err: &ApiError) -> String {
    err.user_message(REGISTER_FALLBACK_MESSAGE)
}

#[component]
pub fn RegisterPage() -> impl IntoView {
    let username = RwSignal::new(String::new());
    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let confirm = RwSignal::new(String::new());
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
        let request = match validate_register(&username.get(), &email.get(), &password.get(), &confirm.get()) {
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
                match crate::net::api::register(&gateway, &request).await {
                    Ok((user, token)) => match session.complete_login(ticket, user, token) {
                        Ok(()) => navigate(crate::util::guard::DASHBOARD_PATH, leptos_router::NavigateOptions::default()),
                        Err(e) => {
                            if let Some(message) = super::login::commit_error_message(&e) {
                                error.set(message);
                            }
                        }
                    },
                    Err(e) => error.set(register_error_message(&e)),
                }
                busy.set(false);
            });
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = request;
        }
    };

    let field = move |label: &'static str, kind: &'static str, value: RwSignal<String>| {
        view! {
            <label class="auth-label">
                {label}
                <input
                    class="auth-input"
                    type=kind
                    prop:value=move || value.get()
                    on:input=move |ev| value.set(event_target_value(&ev))
                />
            </label>
        }
    };

    view! {
        <div class="auth-page">
            <div class="auth-card">
                <h1>"GEKO"</h1>
                <p class="auth-card__subtitle">"Create a new account"</p>
                <form class="auth-form" on:submit=on_submit>
                    <Show when=move || !error.get().is_empty()>
                        <div class="auth-error">{move || error.get()}</div>
                    </Show>
                    {field("Username", "text", username)}
                    {field("Email", "email", email)}
                    {field("Password", "password", password)}
                    {field("Confirm password", "password", confirm)}
                    <button class="auth-button" type="submit" disabled=move || busy.get()>
                        {move || submit_label(busy.get(), "Register", "Registering...")}
                    </button>
                </form>
                <p class="auth-card__switch">
                    "Already have an account? "
                    <A href="/login">"Sign in"</A>
                </p>
            </div>
        </div>
    }
}
