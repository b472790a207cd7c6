use std::sync::Arc;

use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::errors::AppError;
use crate::models::JobSummary;
use crate::state::AppState;

#[allow(clippy::result_large_err)]
fn check_auth(headers: &HeaderMap, expected_token: &str) -> Result<(), Response> {
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    let token = auth.strip_prefix("Bearer ").unwrap_or("");
    if token != expected_token {
        return Err(AppError::Unauthorized.into_response());
    }
    Ok(())
}

// POST /api/reminders/run
pub async fn run_reminders(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<JobSummary>, Response> {
    check_auth(&headers, &state.config.admin_token)?;

    tracing::info!("manual reminder run requested");
    state
        .job
        .run()
        .await
        .map(Json)
        .map_err(IntoResponse::into_response)
}
