use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::get;
use axum::{Json, Router};

use super::identify;
use crate::auth::{require_capability, CAP_MANAGE_OPTIONS};
use crate::error::{AppError, Result};
use crate::models::{LogEntry, Settings, SettingsUpdate};
use crate::state::AppState;

/// Administration routes
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/email-log", get(list_email_log).delete(clear_email_log))
        .route("/settings", get(get_settings).put(update_settings))
}

fn require_admin(state: &AppState, headers: &HeaderMap) -> Result<()> {
    let identity = identify(state, headers);
    require_capability(identity.as_ref(), CAP_MANAGE_OPTIONS)
}

/// GET /api/v1/admin/email-log - Recent send attempts, newest first
async fn list_email_log(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<LogEntry>>> {
    require_admin(&state, &headers)?;
    Ok(Json(state.email_log.list().await?))
}

/// DELETE /api/v1/admin/email-log - Clear the log
async fn clear_email_log(State(state): State<AppState>, headers: HeaderMap) -> Result<StatusCode> {
    require_admin(&state, &headers)?;
    state.email_log.clear().await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/admin/settings
async fn get_settings(State(state): State<AppState>, headers: HeaderMap) -> Result<Json<Settings>> {
    require_admin(&state, &headers)?;
    Ok(Json(state.settings.load().await?))
}

/// PUT /api/v1/admin/settings - Sanitize and store a settings update
async fn update_settings(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: std::result::Result<Json<SettingsUpdate>, JsonRejection>,
) -> Result<Json<Settings>> {
    require_admin(&state, &headers)?;

    let Json(update) = body.map_err(|e| AppError::BadRequest(e.body_text()))?;
    Ok(Json(state.settings.update(update).await?))
}
