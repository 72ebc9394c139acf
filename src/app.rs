//! Root application component with routing and context providers.

use leptos::prelude::*;
use leptos::tachys::view::any_view::{AnyView, IntoAny};
use leptos_meta::{MetaTags, Stylesheet, Title, provide_meta_context};
use leptos_router::{
    StaticSegment,
    components::{Route, Router, Routes},
};

use crate::components::layout::ProtectedLayout;
use crate::components::route_gate::{ExpiryRedirect, RootRedirect, RouteGate};
use crate::config::ClientConfig;
use crate::pages::{
    account::{NotFoundPage, ProfilePage, SettingsPage},
    dashboard::DashboardPage,
    login::LoginPage,
    register::RegisterPage,
};
use crate::state::context::SessionContext;
use crate::util::guard::AppRoute;

/// HTML shell rendered on the server for SSR + hydration.
pub fn shell(options: LeptosOptions) -> impl IntoView {
    view! {
        <!DOCTYPE html>
        <html lang="en">
            <head>
                <meta charset="utf-8"/>
                <meta name="viewport" content="width=device-width, initial-scale=1"/>
                <AutoReload options=options.clone()/>
                <HydrationScripts options/>
                <MetaTags/>
            </head>
            <body>
                <App/>
            </body>
        </html>
    }
}

/// Root application component.
///
/// Owns the session container and configuration, provides them as context,
/// and maps each route to its guard.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    provide_context(ClientConfig::from_env());
    provide_context(SessionContext::new());

    view! {
        <Stylesheet id="leptos" href="/pkg/dashboard-client.css"/>
        <Title text="Geko"/>

        <Router>
            <ExpiryRedirect/>
            <Routes fallback=|| view! { <NotFoundPage/> }>
                <Route path=StaticSegment("") view=RootRedirect/>
                <Route
                    path=StaticSegment("login")
                    view=|| view! { <RouteGate route=AppRoute::Login><LoginPage/></RouteGate> }
                />
                <Route
                    path=StaticSegment("register")
                    view=|| view! { <RouteGate route=AppRoute::Register><RegisterPage/></RouteGate> }
                />
                <Route
                    path=StaticSegment("dashboard")
                    view=|| protected(AppRoute::Dashboard, || view! { <DashboardPage/> }.into_any())
                />
                <Route
                    path=StaticSegment("profile")
                    view=|| protected(AppRoute::Profile, || view! { <ProfilePage/> }.into_any())
                />
                <Route
                    path=StaticSegment("settings")
                    view=|| protected(AppRoute::Settings, || view! { <SettingsPage/> }.into_any())
                />
            </Routes>
        </Router>
    }
}

fn protected(route: AppRoute, page: fn() -> AnyView) -> impl IntoView {
    view! {
        <RouteGate route=route>
            <ProtectedLayout>{page()}</ProtectedLayout>
        </RouteGate>
    }
}
