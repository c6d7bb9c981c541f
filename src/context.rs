//! Application Context
//!
//! Shared services provided via Leptos Context API.

use leptos::prelude::*;

use crate::api::ApiClient;
use crate::config::AppConfig;
use crate::session::SessionContext;

/// App-wide services provided via context
#[derive(Clone)]
pub struct AppContext {
    pub session: SessionContext,
    pub api: ApiClient,
}

impl AppContext {
    pub fn new(config: &AppConfig, session: SessionContext) -> Self {
        let api = ApiClient::new(config.api_base_url.clone(), session.clone());
        Self { session, api }
    }
}

/// Get the app context
pub fn use_app_context() -> AppContext {
    use_context::<AppContext>().expect("AppContext should be provided")
}
