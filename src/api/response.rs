//! Response envelope shared by all API endpoints

use axum::{http::StatusCode, Json};
use serde::{Deserialize, Serialize};

/// JSON envelope for every API response
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Stable machine-readable error code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            code: None,
        }
    }

    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
            code: Some(code.into()),
        }
    }
}

/// Handler return type: status plus envelope
pub type ApiReply<T> = (StatusCode, Json<ApiResponse<T>>);

/// 200 with data
pub fn ok<T>(data: T) -> ApiReply<T> {
    (StatusCode::OK, Json(ApiResponse::success(data)))
}

/// 201 with data
pub fn created<T>(data: T) -> ApiReply<T> {
    (StatusCode::CREATED, Json(ApiResponse::success(data)))
}

/// Map a canvas error to its HTTP status and envelope
pub fn canvas_error<T>(err: atelier_canvas::Error) -> ApiReply<T> {
    let status = match err.code() {
        "invalid_state" => StatusCode::CONFLICT,
        "invalid_argument" | "invalid_message" => StatusCode::BAD_REQUEST,
        "session_not_found" | "painting_not_found" => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(ApiResponse::error(err.code(), err.to_string())))
}

/// Map a social graph error to its HTTP status and envelope
pub fn social_error<T>(err: atelier_social::Error) -> ApiReply<T> {
    let status = match err.code() {
        "not_found" => StatusCode::NOT_FOUND,
        "invalid_request" => StatusCode::BAD_REQUEST,
        "conflict" => StatusCode::CONFLICT,
        "datastore_unavailable" => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(ApiResponse::error(err.code(), err.to_string())))
}
