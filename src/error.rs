use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

/// Why a request body failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationKind {
    /// A required field was absent or blank before sanitization.
    MissingField,
    /// A required field had content, but nothing survived sanitization.
    EmptyField,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ValidationError {
    pub kind: ValidationKind,
    pub message: String,
}

impl ValidationError {
    pub fn missing(field: &str) -> Self {
        Self {
            kind: ValidationKind::MissingField,
            message: format!("Missing required field: {}", field),
        }
    }

    pub fn empty(field: &str) -> Self {
        Self {
            kind: ValidationKind::EmptyField,
            message: format!("Field '{}' must not be empty after sanitization", field),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Authentication failed. Valid credentials with the {0} capability are required.")]
    AuthForbidden(String),

    #[error("Missing X-API-Key header.")]
    MissingApiKey,

    #[error("Invalid API Key.")]
    InvalidApiKey,

    #[error("API Key authentication is enabled but no key has been configured.")]
    ApiKeyNotConfigured,

    #[error("Rate limit exceeded. Maximum {limit} emails per minute.")]
    RateLimited { limit: u32 },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("No valid recipient email address provided.")]
    InvalidRecipient,

    #[error("{0}")]
    DispatchVetoed(String),

    #[error("Failed to send email. Check your mail configuration (transport credentials, sender domain, etc.).")]
    TransportFailure,

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::AuthForbidden(_) | AppError::InvalidApiKey => StatusCode::FORBIDDEN,
            AppError::MissingApiKey => StatusCode::UNAUTHORIZED,
            AppError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            AppError::Validation(_)
            | AppError::InvalidRecipient
            | AppError::DispatchVetoed(_)
            | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::ApiKeyNotConfigured
            | AppError::TransportFailure
            | AppError::Store(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable machine-readable code returned alongside the message.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::AuthForbidden(_) => "auth_forbidden",
            AppError::MissingApiKey => "missing_api_key",
            AppError::InvalidApiKey => "invalid_api_key",
            AppError::ApiKeyNotConfigured => "api_key_not_configured",
            AppError::RateLimited { .. } => "rate_limit_exceeded",
            AppError::Validation(err) => match err.kind {
                ValidationKind::MissingField => "missing_field",
                ValidationKind::EmptyField => "empty_field",
            },
            AppError::InvalidRecipient => "invalid_recipient",
            AppError::DispatchVetoed(_) => "dispatch_vetoed",
            AppError::TransportFailure => "send_failed",
            AppError::BadRequest(_) => "invalid_json",
            AppError::Store(_) => "store_error",
            AppError::Internal(_) => "internal_error",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.code();

        // Infrastructure details stay in the logs.
        let message = match &self {
            AppError::Store(detail) | AppError::Internal(detail) => {
                tracing::error!(code, error = %detail, "Request failed");
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        let body = Json(json!({
            "status": "error",
            "code": code,
            "message": message,
        }));

        (status, body).into_response()
    }
}

impl From<redis::RedisError> for AppError {
    fn from(err: redis::RedisError) -> Self {
        AppError::Store(err.to_string())
    }
}

impl From<deadpool_redis::PoolError> for AppError {
    fn from(err: deadpool_redis::PoolError) -> Self {
        AppError::Store(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Store(format!("Corrupt stored value: {}", err))
    }
}

impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        AppError::Internal(format!("JWT error: {}", err))
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
