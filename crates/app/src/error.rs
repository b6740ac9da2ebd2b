//! Route-layer error taxonomy. The only place `ApiResult` tags become
//! HTTP status codes.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use domain::api::ApiResult;
use serde_json::Value;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("not found")]
    NotFound,

    #[error("upstream failure: {error}")]
    Upstream { error: String, status: Option<u16> },

    #[error("{0}")]
    Validation(String),

    #[error("internal error")]
    Internal,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::NotFound => (StatusCode::NOT_FOUND, "not found".to_owned()),
            AppError::Upstream { error, status } => {
                let message = match status {
                    Some(code) => format!("upstream failure (status {code}): {error}"),
                    None => format!("upstream failure: {error}"),
                };
                (StatusCode::BAD_GATEWAY, message)
            }
            AppError::Validation(message) => (StatusCode::BAD_REQUEST, message),
            // Never leak internals on unexpected projection errors.
            AppError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal error".to_owned(),
            ),
        };

        (status, Json(json!({"error": message}))).into_response()
    }
}

/// Branch on an [`ApiResult`] tag: success-with-data flows through, empty
/// success and upstream 404s become `NotFound`, everything else is an
/// upstream failure with the status echoed.
pub fn require_data(result: ApiResult<Value>) -> Result<Value, AppError> {
    match result {
        ApiResult::Success { data: Some(value) } => Ok(value),
        ApiResult::Success { data: None } => Err(AppError::NotFound),
        ApiResult::Failure {
            status: Some(404), ..
        } => Err(AppError::NotFound),
        ApiResult::Failure { error, status } => Err(AppError::Upstream { error, status }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_success_is_not_found() {
        assert!(matches!(
            require_data(ApiResult::empty()),
            Err(AppError::NotFound)
        ));
    }

    #[test]
    fn upstream_404_is_not_found() {
        let result = ApiResult::failure("upstream returned 404", Some(404));
        assert!(matches!(require_data(result), Err(AppError::NotFound)));
    }

    #[test]
    fn upstream_500_is_upstream_failure() {
        let result = ApiResult::failure("upstream returned 500", Some(500));
        match require_data(result) {
            Err(AppError::Upstream { status, .. }) => assert_eq!(status, Some(500)),
            other => panic!("expected upstream failure, got {other:?}"),
        }
    }

    #[test]
    fn transport_failure_is_upstream_failure() {
        let result = ApiResult::failure("upstream unreachable", None);
        assert!(matches!(
            require_data(result),
            Err(AppError::Upstream { status: None, .. })
        ));
    }
}
