use axum::{extract::State, http::StatusCode, response::Json};
use log::error;
use serde::Serialize;
use serde_json::Value;

use crate::alerts::Alerts;
use crate::error::DashboardError;

use super::state::AppState;

/// The only body this endpoint sends on failure. Details go to the log.
pub const FETCH_FAILED: &str = "Failed to fetch alerts from database";

/// Error response structure
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn fetch_failed() -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: FETCH_FAILED.to_string(),
        }),
    )
}

/// GET /api/alerts
/// Every alert document, newest first, with `_id` as a string
pub async fn list_alerts(
    State(state): State<AppState>,
) -> Result<Json<Vec<Value>>, (StatusCode, Json<ErrorResponse>)> {
    let store = state.store.clone();

    let result = tokio::task::spawn_blocking(move || -> Result<Vec<Value>, DashboardError> {
        let handle = store.get_handle()?;
        Alerts::list_newest_first(&handle)
    })
    .await;

    match result {
        Ok(Ok(alerts)) => Ok(Json(alerts)),
        Ok(Err(e)) => {
            error!("Failed to fetch alerts: {}", e);
            Err(fetch_failed())
        }
        Err(e) => {
            error!("Alert fetch task failed: {}", e);
            Err(fetch_failed())
        }
    }
}
