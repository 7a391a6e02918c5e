// POST /api/status — record an uptime-monitor ping.
// GET  /api/status — list recorded pings, ?limit= (default 1000).

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use tracing::error;

use crate::db::models::StatusCheck;
use crate::web::{api_error, AppState};

#[derive(Debug, Deserialize)]
pub struct StatusCheckCreate {
    pub client_name: String,
}

pub async fn create_status_check(
    State(state): State<AppState>,
    Json(payload): Json<StatusCheckCreate>,
) -> Response {
    let check = StatusCheck::new(payload.client_name, Utc::now());
    match state.db.insert_status_check(&check).await {
        Ok(()) => Json(check).into_response(),
        Err(e) => {
            error!(error = %e, "Failed to save status check");
            api_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to record status check",
            )
        }
    }
}

#[derive(Deserialize, Default)]
pub struct ListQuery {
    pub limit: Option<usize>,
}

pub async fn list_status_checks(
    State(state): State<AppState>,
    Query(params): Query<ListQuery>,
) -> Response {
    let limit = params.limit.unwrap_or(1000).min(1000);
    match state.db.get_status_checks(limit as u32).await {
        Ok(checks) => Json(checks).into_response(),
        Err(e) => {
            error!(error = %e, "Failed to retrieve status checks");
            api_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to retrieve status checks",
            )
        }
    }
}
