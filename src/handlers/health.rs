use axum::{extract::State, http::StatusCode, response::Json};
use serde_json::{json, Value};

use crate::{db, AppState};

/// GET /health
///
/// Liveness plus a store ping; degrades to 503 when the database is
/// unreachable.
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    match db::check_connection(&state.db).await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "status": "healthy",
                "database": "up",
                "timestamp": chrono::Utc::now().to_rfc3339(),
            })),
        ),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "degraded",
                "database": "down",
                "error": e.response_message(),
                "timestamp": chrono::Utc::now().to_rfc3339(),
            })),
        ),
    }
}
