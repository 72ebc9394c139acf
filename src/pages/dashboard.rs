//! Dashboard page: the authenticated landing route.

#[cfg(test)]
#[path = "dashboard_test.rs"]
mod dashboard_test;

use leptos::prelude::*;

use crate::state::context::SessionContext;
use crate::state::session::SessionState;

/// Summary tiles shown under the greeting.
pub const STATS: [(&str, &str); 3] = [("Active projects", "12"), ("Users", "45"), ("Growth", "+23%")];

pub fn greeting(state: &SessionState) -> String {
    format!("Welcome, {}!", state.username().filter(|n| !n.trim().is_empty()).unwrap_or("User"))
}

#[component]
pub fn DashboardPage() -> impl IntoView {
    let state = expect_context::<SessionContext>().state();

    view! {
        <div class="page dashboard">
            <div class="page__heading">
                <h1>{move || greeting(&state.get())}</h1>
                <p>"Here is an overview of your dashboard."</p>
            </div>
            <div class="dashboard__stats">
                {STATS
                    .into_iter()
                    .map(|(label, value)| {
                        view! {
                            <div class="stat-card">
                                <p class="stat-card__label">{label}</p>
                                <p class="stat-card__value">{value}</p>
                            </div>
                        }
                    })
                    .collect_view()}
            </div>
            <section class="panel">
                <h2>"Geko AI Core"</h2>
                <p>"The system is up and ready. Use the sidebar to move between sections."</p>
            </section>
        </div>
    }
}
