use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use tracing::error;

use crate::content::ContentError;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

#[derive(Debug)]
pub enum AppError {
    Unauthorized,
    FetchFailed {
        resource: &'static str,
        source: ContentError,
    },
}

#[derive(Debug)]
pub struct ApiError {
    pub error: AppError,
    pub request_id: String,
}

impl AppError {
    pub fn with_request_id(self, request_id: &str) -> ApiError {
        ApiError {
            error: self,
            request_id: request_id.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, message, details) = match self.error {
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string(), None),
            AppError::FetchFailed { resource, source } => {
                let details = source.details();
                error!(request_id = %self.request_id, error = %details, "error fetching {}", resource);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Failed to fetch {}", resource),
                    Some(details),
                )
            }
        };

        (
            status,
            Json(ErrorResponse {
                error: message,
                details,
            }),
        )
            .into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
