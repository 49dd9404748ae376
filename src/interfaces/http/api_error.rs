use crate::domain::errors::PredictionError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    pub detail: String,
}

/// HTTP face of a pipeline failure
#[derive(Debug)]
pub struct ApiError(pub PredictionError);

impl From<PredictionError> for ApiError {
    fn from(err: PredictionError) -> Self {
        Self(err)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self.0 {
            PredictionError::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            PredictionError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            PredictionError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.0.category(),
            detail: self.0.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}
