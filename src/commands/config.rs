use tauri::State;

use crate::config::AppConfig;

#[tauri::command]
pub fn config_get(config: State<'_, AppConfig>) -> AppConfig {
    config.inner().clone()
}
