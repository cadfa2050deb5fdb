//! API error taxonomy with HTTP response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::leaf::analyzer::AnalysisError;
use crate::weather::client::WeatherError;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("username already registered")]
    DuplicateUser,
    #[error("incorrect username or password")]
    InvalidCredentials,
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    InvalidImage(String),
    #[error("{0}")]
    Upstream(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::DuplicateUser | ApiError::BadRequest(_) | ApiError::InvalidImage(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::InvalidCredentials | ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
            ApiError::Internal(err) => {
                tracing::error!(error = %err, "internal server error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        let body = json!({ "error": self.to_string() });
        (status, Json(body)).into_response()
    }
}

impl From<AnalysisError> for ApiError {
    fn from(err: AnalysisError) -> Self {
        match err {
            AnalysisError::NotFound(path) => {
                ApiError::NotFound(format!("image file not found at {}", path.display()))
            }
            e @ AnalysisError::InvalidImage(_) => ApiError::InvalidImage(e.to_string()),
            AnalysisError::Io(e) => {
                ApiError::Internal(anyhow::Error::new(e).context("error processing image"))
            }
        }
    }
}

impl From<WeatherError> for ApiError {
    fn from(err: WeatherError) -> Self {
        ApiError::Upstream(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_map_to_expected_statuses() {
        let cases = [
            (ApiError::DuplicateUser, StatusCode::BAD_REQUEST),
            (ApiError::InvalidCredentials, StatusCode::UNAUTHORIZED),
            (
                ApiError::Unauthorized("missing token".into()),
                StatusCode::UNAUTHORIZED,
            ),
            (
                ApiError::BadRequest("no file".into()),
                StatusCode::BAD_REQUEST,
            ),
            (ApiError::NotFound("gone".into()), StatusCode::NOT_FOUND),
            (
                ApiError::InvalidImage("bad bytes".into()),
                StatusCode::BAD_REQUEST,
            ),
            (
                ApiError::Upstream("provider down".into()),
                StatusCode::BAD_GATEWAY,
            ),
        ];
        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }

    #[test]
    fn missing_source_image_becomes_not_found() {
        let err: ApiError = AnalysisError::NotFound("uploads/leaf.png".into()).into();
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }
}
