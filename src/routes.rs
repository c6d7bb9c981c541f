//! Routes
//!
//! Browser paths of the three pages and a navigation handle that callbacks
//! and async tasks can carry around.

use leptos::prelude::*;
use leptos_router::hooks::use_navigate;
use leptos_router::params::Params;
use leptos_router::NavigateOptions;

/// All boards
pub const LISTS_PATH: &str = "/";

/// Access-code entry for one board
pub fn access_path(list_id: i64) -> String {
    format!("/access/{}", list_id)
}

pub fn board_path(list_id: i64) -> String {
    format!("/dashboard/{}", list_id)
}

/// `:id` segment of `/access/:id` and `/dashboard/:id`
#[derive(Params, PartialEq, Clone, Debug)]
pub struct ListRouteParams {
    pub id: Option<String>,
}

impl ListRouteParams {
    /// Numeric list id, if the segment is one
    pub fn list_id(&self) -> Option<i64> {
        self.id.as_deref()?.trim().parse().ok()
    }
}

type NavigateFn = Box<dyn Fn(&str, NavigateOptions) + Send + Sync>;

/// Router navigation that outlives the event handler it was taken in.
///
/// Becomes a no-op once the owning component is gone.
#[derive(Clone, Copy)]
pub struct Navigator(StoredValue<NavigateFn>);

impl Navigator {
    pub fn go(&self, path: &str) {
        log::debug!("[APP] navigate to {}", path);
        self.0.try_with_value(|navigate| navigate(path, NavigateOptions::default()));
    }
}

/// Navigation handle for the current router
pub fn use_navigator() -> Navigator {
    let navigate = use_navigate();
    let boxed: NavigateFn = Box::new(move |path: &str, options: NavigateOptions| navigate(path, options));
    Navigator(StoredValue::new(boxed))
}
