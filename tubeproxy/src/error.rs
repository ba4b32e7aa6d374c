use axum::{
    Json,
    http::{HeaderValue, StatusCode, header::RETRY_AFTER},
    response::{IntoResponse, Response}
};
use serde::Serialize;

/// Message returned for every server-side failure. The cause is only logged.
pub const GENERIC_FAILURE: &str = "Failed to process request";

#[derive(Debug)]
pub struct AppError {
    pub message: String,
    pub status: StatusCode,
    pub code: Option<&'static str>,
    pub retry_after: Option<u64>,
    detail: Option<String>
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    retry_after_seconds: Option<u64>
}

impl AppError {
    pub fn internal(detail: impl Into<String>) -> Self {
        Self {
            message: GENERIC_FAILURE.to_string(),
            status: StatusCode::INTERNAL_SERVER_ERROR,
            code: None,
            retry_after: None,
            detail: Some(detail.into())
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: StatusCode::BAD_REQUEST,
            code: None,
            retry_after: None,
            detail: None
        }
    }

    pub fn rate_limited(max_requests: u32, retry_after_seconds: u64) -> Self {
        Self {
            message: format!(
                "Too many requests, at most {max_requests} are allowed per window. Try again later."
            ),
            status: StatusCode::TOO_MANY_REQUESTS,
            code: Some("RATE_LIMITED"),
            retry_after: Some(retry_after_seconds),
            detail: None
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(
                detail = self.detail.as_deref().unwrap_or_default(),
                "handler error: {}",
                self.message
            );
        } else {
            tracing::debug!(status = %self.status, "client error: {}", self.message);
        }

        let body = Json(ErrorBody {
            error: self.message,
            code: self.code,
            retry_after_seconds: self.retry_after
        });

        let mut response = (self.status, body).into_response();
        if let Some(seconds) = self.retry_after
            && let Ok(value) = HeaderValue::from_str(&seconds.to_string())
        {
            response.headers_mut().insert(RETRY_AFTER, value);
        }

        response
    }
}

impl<E: std::error::Error> From<E> for AppError {
    fn from(err: E) -> Self {
        AppError::internal(err.to_string())
    }
}
