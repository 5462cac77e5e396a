//! Health check.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use chrono::{SecondsFormat, Utc};

use notebox_db::log_pool_metrics;

use crate::error::ApiError;
use crate::AppState;

/// `GET /api/health`
pub async fn health_check(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    log_pool_metrics(state.db.pool());
    let note_count = state.notes.note_count().await?;

    Ok(Json(serde_json::json!({
        "status": "healthy",
        "timestamp": Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true),
        "note_count": note_count,
        "version": env!("CARGO_PKG_VERSION"),
    })))
}
