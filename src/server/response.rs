// src/server/response.rs
//! Response envelope and error mapping
//!
//! Every API response, success or failure, is shaped
//! `{ "statusCode", "message", "data" }`.

use crate::recipe::RecipeError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::Value;

/// Message used for plain successful reads and updates
pub const DEFAULT_MESSAGE: &str = "Request successful";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Envelope<T> {
    status_code: u16,
    message: String,
    data: T,
}

/// A successful response wrapped in the envelope
pub struct ApiResponse<T> {
    status: StatusCode,
    message: String,
    data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// 200 with the default message
    pub fn ok(data: T) -> Self {
        Self {
            status: StatusCode::OK,
            message: DEFAULT_MESSAGE.to_string(),
            data,
        }
    }

    /// 201 with a custom message
    pub fn created(data: T, message: &str) -> Self {
        Self {
            status: StatusCode::CREATED,
            message: message.to_string(),
            data,
        }
    }

    pub fn with_message(mut self, message: &str) -> Self {
        self.message = message.to_string();
        self
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let body = Envelope {
            status_code: self.status.as_u16(),
            message: self.message,
            data: self.data,
        };
        (self.status, Json(body)).into_response()
    }
}

/// Failures a handler can return
#[derive(Debug)]
pub enum ApiError {
    /// Failure from the recipe service
    Recipe(RecipeError),
    /// Malformed request (body, query, multipart, image type)
    BadRequest(String),
    /// Image or body over the configured cap
    PayloadTooLarge(String),
}

impl From<RecipeError> for ApiError {
    fn from(err: RecipeError) -> Self {
        ApiError::Recipe(err)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Recipe(err) => match err {
                RecipeError::Validation(_) | RecipeError::InvalidIdentifier(_) => {
                    StatusCode::BAD_REQUEST
                }
                RecipeError::NotFound(_) => StatusCode::NOT_FOUND,
                RecipeError::Upload(_) | RecipeError::Store(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
        }
    }

    /// Short machine-readable kind for log lines
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::Recipe(err) => err.kind(),
            ApiError::BadRequest(_) => "bad_request",
            ApiError::PayloadTooLarge(_) => "payload_too_large",
        }
    }

    /// Client-facing message; internal details stay in the logs
    pub fn message(&self) -> String {
        match self {
            ApiError::Recipe(RecipeError::Validation(_)) => "Validation failed".to_string(),
            ApiError::Recipe(RecipeError::Upload(_)) => "Image upload failed".to_string(),
            ApiError::Recipe(RecipeError::Store(_)) => "Internal server error".to_string(),
            ApiError::Recipe(err) => err.to_string(),
            ApiError::BadRequest(message) | ApiError::PayloadTooLarge(message) => message.clone(),
        }
    }

    fn data(&self) -> Value {
        match self {
            ApiError::Recipe(RecipeError::Validation(errors)) => {
                serde_json::to_value(errors).unwrap_or(Value::Null)
            }
            _ => Value::Null,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            tracing::error!(kind = self.kind(), "Request failed: {:?}", self);
        } else {
            tracing::debug!(kind = self.kind(), "Request rejected ({}): {}", status, self.message());
        }

        let body = Envelope {
            status_code: status.as_u16(),
            message: self.message(),
            data: self.data(),
        };
        (status, Json(body)).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<ApiResponse<T>, ApiError>;
