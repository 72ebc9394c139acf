//! Chrome shared by the protected pages: header, sidebar, footer.

#[cfg(test)]
#[path = "layout_test.rs"]
mod layout_test;

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::components::A;
use leptos_router::hooks::use_navigate;

use crate::state::context::SessionContext;
use crate::state::session::SessionState;
use crate::util::guard::{AppRoute, LOGIN_PATH};

/// Sidebar entries in display order.
pub const NAV_ITEMS: [(AppRoute, &str); 3] =
    [(AppRoute::Dashboard, "Dashboard"), (AppRoute::Profile, "Profile"), (AppRoute::Settings, "Settings")];

const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Name shown in the header; a generic label until a user is committed.
pub fn display_name(state: &SessionState) -> String {
    state.username().unwrap_or("User").to_owned()
}

/// Header, sidebar and footer around protected page content.
#[component]
pub fn ProtectedLayout(children: Children) -> impl IntoView {
    view! {
        <div class="layout">
            <Header/>
            <div class="layout__body">
                <Sidebar/>
                <main class="layout__main">{children()}</main>
            </div>
            <Footer/>
        </div>
    }
}

#[component]
pub fn Header() -> impl IntoView {
    let session = expect_context::<SessionContext>();
    let navigate = use_navigate();
    let state = session.state();

    let on_logout = move |_| {
        session.logout();
        navigate(LOGIN_PATH, NavigateOptions::default());
    };

    view! {
        <header class="header">
            <div class="header__brand">
                <h1>"GEKO"</h1>
                <span class="header__tagline">"AI Core"</span>
            </div>
            <div class="header__user">
                <span class="header__name">{move || display_name(&state.get())}</span>
                <button class="header__logout" on:click=on_logout>
                    "Logout"
                </button>
            </div>
        </header>
    }
}

#[component]
pub fn Sidebar() -> impl IntoView {
    view! {
        <aside class="sidebar">
            <nav>
                <ul>
                    {NAV_ITEMS
                        .into_iter()
                        .map(|(route, label)| {
                            view! {
                                <li>
                                    <A href=route.path()>{label}</A>
                                </li>
                            }
                        })
                        .collect_view()}
                </ul>
            </nav>
        </aside>
    }
}

#[component]
pub fn Footer() -> impl IntoView {
    view! {
        <footer class="footer">
            <span>"© Geko AI Core"</span>
            <span class="footer__version">{format!("v{APP_VERSION}")}</span>
        </footer>
    }
}
