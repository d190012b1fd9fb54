//! API 错误类型与响应映射。

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use scoped_fs::ScopeError;
use serde::Serialize;

/// API 错误响应体。
#[derive(Debug, Serialize)]
struct ApiErrorResponse {
    error: String,
    code: String,
}

/// API 错误类型。
#[derive(Debug)]
pub struct ApiError {
    pub message: String,
    pub code: String,
    pub status: StatusCode,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError {
            message: message.into(),
            code: "BAD_REQUEST".to_string(),
            status: StatusCode::BAD_REQUEST,
        }
    }
}

impl From<ScopeError> for ApiError {
    fn from(err: ScopeError) -> Self {
        match err {
            ScopeError::AccessDenied(path) => ApiError {
                message: format!("Access denied: {}", path),
                code: "ACCESS_DENIED".to_string(),
                status: StatusCode::FORBIDDEN,
            },
            ScopeError::Io(e) => ApiError {
                message: format!("IO error: {}", e),
                code: "IO_ERROR".to_string(),
                status: StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ApiErrorResponse {
            error: self.message,
            code: self.code,
        });
        (self.status, body).into_response()
    }
}
