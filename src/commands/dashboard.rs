use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use tauri::{AppHandle, Manager, Runtime, State};
use tracing::{debug, warn};

use crate::api::{ApiClient, SummaryLimits};
use crate::config::AppConfig;
use crate::dashboard::{
    DashboardState, DashboardView, LoadStatus, RefreshTicket, SearchToken, ViewAction,
};
use crate::events::{emit_event, event_names};
use crate::types::view::SortColumn;

pub type SharedDashboard = Mutex<DashboardState>;

fn lock(dashboard: &SharedDashboard) -> MutexGuard<'_, DashboardState> {
    dashboard.lock().unwrap_or_else(|e| e.into_inner())
}

/// Fetch anomalies and summary concurrently and land both, or neither.
/// The lock is only taken after the requests complete.
pub async fn run_refresh(
    client: &ApiClient,
    dashboard: &SharedDashboard,
    ticket: RefreshTicket,
    limits: SummaryLimits,
) -> DashboardView {
    debug!(generation = ticket.generation, user_id = ?ticket.user_id, "Refreshing dashboard");
    let result = tokio::try_join!(
        client.anomalies(None, ticket.user_id),
        client.summary(None, limits),
    );
    let mut state = lock(dashboard);
    state.finish_refresh(ticket, result);
    state.snapshot()
}

pub async fn dashboard_refresh_with(
    client: &ApiClient,
    dashboard: &SharedDashboard,
    limits: SummaryLimits,
) -> DashboardView {
    let ticket = lock(dashboard).begin_refresh();
    run_refresh(client, dashboard, ticket, limits).await
}

pub async fn dashboard_dispatch_with(
    client: &ApiClient,
    dashboard: &SharedDashboard,
    limits: SummaryLimits,
    action: ViewAction,
) -> DashboardView {
    let ticket = lock(dashboard).dispatch(action);
    match ticket {
        Some(ticket) => run_refresh(client, dashboard, ticket, limits).await,
        None => lock(dashboard).snapshot(),
    }
}

pub fn dashboard_sort_with(dashboard: &SharedDashboard, column: SortColumn) -> DashboardView {
    let mut state = lock(dashboard);
    state.dispatch(ViewAction::Sort(column));
    state.snapshot()
}

/// Wait out the debounce window, then apply the search if no newer input
/// arrived in the meantime.
pub async fn debounced_commit(
    dashboard: &SharedDashboard,
    token: SearchToken,
    delay: Duration,
) -> Option<DashboardView> {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
    let mut state = lock(dashboard);
    if state.commit_search(token) {
        Some(state.snapshot())
    } else {
        debug!("Search superseded by newer input");
        None
    }
}

fn publish<R: Runtime>(app: &AppHandle<R>, view: &DashboardView) {
    if let LoadStatus::Failed(message) = &view.status {
        if let Err(e) = emit_event(app, event_names::DASHBOARD_ERROR, message.clone()) {
            warn!(error = %e, "Failed to emit dashboard error");
        }
    }
}

// Tauri command wrappers — these use managed state

#[tauri::command]
pub async fn dashboard_load(
    app: AppHandle,
    client: State<'_, ApiClient>,
    dashboard: State<'_, SharedDashboard>,
    config: State<'_, AppConfig>,
) -> Result<DashboardView, String> {
    let view = dashboard_refresh_with(&client, &dashboard, config.summary_limits()).await;
    publish(&app, &view);
    Ok(view)
}

/// Manual refresh from the header; re-fetches with the current user filter.
#[tauri::command]
pub async fn dashboard_refresh(
    app: AppHandle,
    client: State<'_, ApiClient>,
    dashboard: State<'_, SharedDashboard>,
    config: State<'_, AppConfig>,
) -> Result<DashboardView, String> {
    let view = dashboard_refresh_with(&client, &dashboard, config.summary_limits()).await;
    publish(&app, &view);
    Ok(view)
}

/// Retry re-issues the last fetch; it is the same cycle as a refresh.
#[tauri::command]
pub async fn dashboard_retry(
    app: AppHandle,
    client: State<'_, ApiClient>,
    dashboard: State<'_, SharedDashboard>,
    config: State<'_, AppConfig>,
) -> Result<DashboardView, String> {
    dashboard_load(app, client, dashboard, config).await
}

#[tauri::command]
pub fn dashboard_view(dashboard: State<'_, SharedDashboard>) -> DashboardView {
    lock(&dashboard).snapshot()
}

#[tauri::command]
pub fn dashboard_sort(dashboard: State<'_, SharedDashboard>, column: SortColumn) -> DashboardView {
    dashboard_sort_with(&dashboard, column)
}

#[tauri::command]
pub async fn dashboard_select_user(
    app: AppHandle,
    client: State<'_, ApiClient>,
    dashboard: State<'_, SharedDashboard>,
    config: State<'_, AppConfig>,
    user_id: i64,
) -> Result<DashboardView, String> {
    let view = dashboard_dispatch_with(
        &client,
        &dashboard,
        config.summary_limits(),
        ViewAction::SelectUser(user_id),
    )
    .await;
    publish(&app, &view);
    Ok(view)
}

#[tauri::command]
pub async fn dashboard_clear_user(
    app: AppHandle,
    client: State<'_, ApiClient>,
    dashboard: State<'_, SharedDashboard>,
    config: State<'_, AppConfig>,
) -> Result<DashboardView, String> {
    let view = dashboard_dispatch_with(
        &client,
        &dashboard,
        config.summary_limits(),
        ViewAction::ClearUser,
    )
    .await;
    publish(&app, &view);
    Ok(view)
}

/// Records the keystroke and returns right away; the filtered view follows
/// as a `dashboard:updated` event once typing pauses.
#[tauri::command]
pub fn dashboard_search(
    app: AppHandle,
    dashboard: State<'_, SharedDashboard>,
    config: State<'_, AppConfig>,
    text: String,
) -> DashboardView {
    let token = lock(&dashboard).search_input(text);
    let delay = config.search_debounce();

    if delay.is_zero() {
        let mut state = lock(&dashboard);
        state.commit_search(token);
        return state.snapshot();
    }

    let handle = app.clone();
    tauri::async_runtime::spawn(async move {
        let dashboard = handle.state::<SharedDashboard>();
        if let Some(view) = debounced_commit(dashboard.inner(), token, delay).await {
            if let Err(e) = emit_event(&handle, event_names::DASHBOARD_UPDATED, view) {
                warn!(error = %e, "Failed to emit dashboard update");
            }
        }
    });

    lock(&dashboard).snapshot()
}
