pub mod api;
pub mod commands;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod events;
pub mod filter;
pub mod types;

#[cfg(test)]
mod testutil;

use std::sync::Mutex;

use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::api::ApiClient;
use crate::config::AppConfig;
use crate::dashboard::DashboardState;

/// Initialize structured logging with tracing.
/// Respects RUST_LOG env var; defaults to `info` level for this crate.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("ad_insights=info,ad_insights_lib=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();
}

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    init_tracing();

    // Load .env from the project root
    let manifest_dir = std::path::Path::new(env!("CARGO_MANIFEST_DIR"));
    dotenvy::from_path(manifest_dir.join(".env")).ok();

    let config = AppConfig::load(&config::config_path());
    info!(api = %config.api_base_url, "Starting Ad Insights Explorer");
    let client = ApiClient::new(config.api_base_url.clone());

    tauri::Builder::default()
        .plugin(tauri_plugin_opener::init())
        .manage(config)
        .manage(client)
        .manage(Mutex::new(DashboardState::new()))
        .invoke_handler(tauri::generate_handler![
            commands::config::config_get,
            commands::dashboard::dashboard_load,
            commands::dashboard::dashboard_refresh,
            commands::dashboard::dashboard_retry,
            commands::dashboard::dashboard_view,
            commands::dashboard::dashboard_sort,
            commands::dashboard::dashboard_search,
            commands::dashboard::dashboard_select_user,
            commands::dashboard::dashboard_clear_user,
            commands::posts::posts_list,
            commands::posts::posts_by_user,
            commands::posts::api_hello,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
