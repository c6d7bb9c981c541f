//! Pense-Bête Frontend Entry Point

mod api;
mod app;
mod board;
mod components;
mod config;
mod context;
mod editor;
mod error;
mod layout;
mod logging;
mod models;
mod routes;
mod session;
mod store;

use app::App;
use config::AppConfig;
use leptos::prelude::*;

fn main() {
    console_error_panic_hook::set_once();
    logging::init(AppConfig::from_env().log_level);
    mount_to_body(App);
}
