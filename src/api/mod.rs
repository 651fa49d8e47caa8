use axum::{
    Json,
    body::Body,
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::upstream::UpstreamError;

pub mod albums;

/// Result alias for JSON payloads that map API errors automatically.
pub type ApiResult<T> = Result<Json<T>, ApiError>;

/// Machine-readable error codes surfaced in the JSON envelope.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    ValidationFailed,
    MethodNotAllowed,
    ResourceNotFound,
    BadGateway,
    UpstreamUnavailable,
    InternalServerError,
}

impl ErrorCode {
    fn default_status(&self) -> StatusCode {
        match self {
            ErrorCode::ValidationFailed => StatusCode::BAD_REQUEST,
            ErrorCode::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ErrorCode::ResourceNotFound => StatusCode::NOT_FOUND,
            ErrorCode::BadGateway => StatusCode::BAD_GATEWAY,
            ErrorCode::UpstreamUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            ErrorCode::InternalServerError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Error envelope returned to HTTP clients.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub code: ErrorCode,
    pub message: String,
}

/// Canonical API error that converts into the shared JSON envelope.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct ApiError {
    #[source]
    source: Option<anyhow::Error>,
    status: StatusCode,
    code: ErrorCode,
    message: String,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            source: None,
            status: code.default_status(),
            code,
            message: message.into(),
        }
    }

    fn with_source(code: ErrorCode, message: impl Into<String>, source: anyhow::Error) -> Self {
        Self {
            source: Some(source),
            status: code.default_status(),
            code,
            message: message.into(),
        }
    }

    /// Build a validation/parameter error (HTTP 400).
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationFailed, message)
    }

    /// Build a method-not-allowed error (HTTP 405).
    pub fn method_not_allowed(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::MethodNotAllowed, message)
    }

    /// Build a resource-not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ResourceNotFound, message)
    }

    /// Build a bad-gateway error (HTTP 502) that logs the provided source.
    pub fn bad_gateway(message: impl Into<String>, source: impl Into<anyhow::Error>) -> Self {
        Self::with_source(ErrorCode::BadGateway, message, source.into())
    }

    /// Build an upstream-unavailable error (HTTP 503) that logs the source.
    pub fn upstream_unavailable(
        message: impl Into<String>,
        source: impl Into<anyhow::Error>,
    ) -> Self {
        Self::with_source(ErrorCode::UpstreamUnavailable, message, source.into())
    }

    /// Build an internal server error that logs the provided source.
    pub fn internal_with_source(err: impl Into<anyhow::Error>) -> Self {
        Self::with_source(
            ErrorCode::InternalServerError,
            "internal server error",
            err.into(),
        )
    }

    /// Expose the HTTP status code for logging/tests.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Expose the machine-readable code for logging/tests.
    pub fn code(&self) -> ErrorCode {
        self.code
    }
}

impl From<UpstreamError> for ApiError {
    fn from(err: UpstreamError) -> Self {
        match err {
            UpstreamError::Transport(_) => {
                Self::upstream_unavailable("upstream photo catalog is unreachable", err)
            }
            UpstreamError::AlbumNotFound(album_id) => {
                Self::not_found(format!("album {album_id} not found"))
            }
            UpstreamError::Status { .. } | UpstreamError::Decode(_) | UpstreamError::Url(_) => {
                Self::bad_gateway("upstream photo catalog returned an invalid response", err)
            }
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        Self::internal_with_source(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let ApiError {
            source,
            status,
            code,
            message,
        } = self;

        if status.is_server_error() {
            if let Some(err) = &source {
                tracing::error!(
                    error = %err,
                    code = ?code,
                    status = %status,
                    message = message.as_str(),
                    "api error (critical)"
                );
            } else {
                tracing::error!(
                    code = ?code,
                    status = %status,
                    message = message.as_str(),
                    "api error (critical)"
                );
            }
        } else {
            tracing::warn!(
                code = ?code,
                status = %status,
                message = message.as_str(),
                "api error"
            );
        }

        let payload = ErrorResponse {
            error: ErrorBody { code, message },
        };
        let mut response = (status, Json(payload)).into_response();
        response
            .extensions_mut()
            .insert(ErrorEnvelopeApplied::default());
        response
    }
}

#[derive(Clone, Copy, Debug, Default)]
struct ErrorEnvelopeApplied;

/// Middleware that rewrites Axum default errors into the shared envelope.
pub async fn ensure_error_envelope(req: Request<Body>, next: Next) -> Response {
    let response = next.run(req).await;
    let status = response.status();

    if (status == StatusCode::METHOD_NOT_ALLOWED || status == StatusCode::NOT_FOUND)
        && response
            .extensions()
            .get::<ErrorEnvelopeApplied>()
            .is_none()
    {
        return match status {
            StatusCode::METHOD_NOT_ALLOWED => {
                ApiError::method_not_allowed("method not allowed").into_response()
            }
            StatusCode::NOT_FOUND => ApiError::not_found("route not found").into_response(),
            _ => unreachable!(),
        };
    }

    response
}

/// Fallback handler ensuring unknown routes return the API envelope.
pub async fn fallback_handler() -> ApiError {
    ApiError::not_found("route not found")
}
