use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::models::JobSummary;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("authentication error: {0}")]
    Authentication(String),

    #[error("fetch error: {0}")]
    Fetch(String),

    #[error("data integrity error: {0}")]
    DataIntegrity(String),

    #[error("dispatch error: {0}")]
    Dispatch(String),

    #[error("mark-sent error: {0}")]
    MarkSent(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("unauthorized")]
    Unauthorized,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Authentication(_) => StatusCode::BAD_GATEWAY,
            AppError::Fetch(_) => StatusCode::BAD_GATEWAY,
            AppError::DataIntegrity(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Dispatch(_) => StatusCode::BAD_GATEWAY,
            AppError::MarkSent(_) => StatusCode::BAD_GATEWAY,
            AppError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
        };

        let body = serde_json::json!({ "error": self.to_string() });
        (status, axum::Json(body)).into_response()
    }
}

/// Job-level failure. Every variant that follows a started run carries the
/// summary so callers can still read per-client outcomes.
#[derive(Debug, thiserror::Error)]
pub enum JobError {
    #[error("reminder run aborted: {source}")]
    Authentication {
        source: AppError,
        summary: JobSummary,
    },

    #[error("reminder run failed for {failed} of {total} clients")]
    ClientsFailed {
        failed: usize,
        total: usize,
        summary: JobSummary,
    },

    #[error("a reminder run is already in progress")]
    AlreadyRunning,
}

impl JobError {
    pub fn summary(&self) -> Option<&JobSummary> {
        match self {
            JobError::Authentication { summary, .. } | JobError::ClientsFailed { summary, .. } => {
                Some(summary)
            }
            JobError::AlreadyRunning => None,
        }
    }
}

impl IntoResponse for JobError {
    fn into_response(self) -> Response {
        match self {
            JobError::AlreadyRunning => (
                StatusCode::CONFLICT,
                axum::Json(serde_json::json!({ "error": self.to_string() })),
            )
                .into_response(),
            JobError::Authentication { summary, .. } | JobError::ClientsFailed { summary, .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(summary)).into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_status_codes() {
        let cases = [
            (AppError::Authentication("x".into()), StatusCode::BAD_GATEWAY),
            (AppError::DataIntegrity("x".into()), StatusCode::UNPROCESSABLE_ENTITY),
            (AppError::Config("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (AppError::Unauthorized, StatusCode::UNAUTHORIZED),
        ];
        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }

    #[test]
    fn test_already_running_is_conflict() {
        let err = JobError::AlreadyRunning;
        assert!(err.summary().is_none());
        assert_eq!(err.into_response().status(), StatusCode::CONFLICT);
    }
}
