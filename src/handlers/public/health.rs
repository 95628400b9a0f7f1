use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::state::AppState;
use crate::store::with_deadline;

/// GET /health - pings both stores within the store deadline
pub async fn health_get(State(state): State<AppState>) -> Response {
    let now = chrono::Utc::now();
    let notes = with_deadline(state.store_timeout, state.notes.ping());
    let accounts = with_deadline(state.store_timeout, state.accounts.ping());

    match tokio::try_join!(notes, accounts) {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({ "status": "ok", "timestamp": now })),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "unavailable", "timestamp": now })),
            )
                .into_response()
        }
    }
}
