//! Pense-Bête Frontend App
//!
//! Root component: provides the context and maps browser paths to pages.

use leptos::prelude::*;
use leptos_router::components::{Redirect, Route, Router, Routes};
use leptos_router::hooks::use_params;
use leptos_router::path;

use crate::components::{AccessPage, BoardPage, ListPicker};
use crate::config::AppConfig;
use crate::context::AppContext;
use crate::routes::{ListRouteParams, LISTS_PATH};
use crate::session::SessionContext;

#[component]
pub fn App() -> impl IntoView {
    let config = AppConfig::from_env();
    log::info!("[APP] API at {}", config.api_base_url);
    provide_context(AppContext::new(&config, SessionContext::browser()));

    view! {
        <Router>
            <main class="app">
                <Routes fallback=|| view! { <ListPicker /> }>
                    <Route path=path!("/") view=ListPicker />
                    <Route path=path!("/access/:id") view=AccessRoute />
                    <Route path=path!("/dashboard/:id") view=BoardRoute />
                </Routes>
            </main>
        </Router>
    }
}

/// List id from the current path, if it parses
fn use_list_id() -> Memo<Option<i64>> {
    let params = use_params::<ListRouteParams>();
    Memo::new(move |_| params.get().ok().and_then(|p| p.list_id()))
}

#[component]
fn AccessRoute() -> impl IntoView {
    let list_id = use_list_id();
    move || match list_id.get() {
        Some(id) => view! { <AccessPage list_id=id /> }.into_any(),
        None => view! { <Redirect path=LISTS_PATH /> }.into_any(),
    }
}

#[component]
fn BoardRoute() -> impl IntoView {
    let list_id = use_list_id();
    move || match list_id.get() {
        Some(id) => view! { <BoardPage list_id=id /> }.into_any(),
        None => view! { <Redirect path=LISTS_PATH /> }.into_any(),
    }
}
