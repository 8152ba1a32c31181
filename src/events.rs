use serde::Serialize;
use tauri::{AppHandle, Emitter, Runtime};

/// Event names as constants — the webview listens on these.
pub mod event_names {
    pub const DASHBOARD_UPDATED: &str = "dashboard:updated";
    pub const DASHBOARD_ERROR: &str = "dashboard:error";
}

pub fn emit_event<R: Runtime, T: Serialize + Clone>(
    app: &AppHandle<R>,
    event: &str,
    payload: T,
) -> Result<(), String> {
    app.emit(event, payload).map_err(|e| e.to_string())
}
