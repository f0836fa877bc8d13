use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use paper_qa::QaError;
use serde::Serialize;
use thiserror::Error;

/// Public application error type.
#[derive(Debug, Error)]
pub enum AppError {
    // --- Boot / config ---
    #[error("configuration error: {0}")]
    Config(String),

    // --- IO / network / server ---
    #[error("failed to bind listener")]
    Bind(#[source] std::io::Error),

    #[error("server error")]
    Server(#[source] std::io::Error),

    // --- Request / routing ---
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Rich HTTP error mapped from lower layers with specific status & code.
    #[error("{message}")]
    Http {
        status: StatusCode,
        code: &'static str,
        message: String,
    },
}

impl AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Http { status, .. } => *status,
            // startup-only
            AppError::Config(_) | AppError::Bind(_) | AppError::Server(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            AppError::Config(_) => "CONFIG_ERROR",
            AppError::Bind(_) => "BIND_ERROR",
            AppError::Server(_) => "SERVER_ERROR",
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::Http { code, .. } => code,
        }
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorBody {
            error: self.error_code(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Handy result alias used across handlers.
pub type AppResult<T> = Result<T, AppError>;

impl From<axum::extract::rejection::JsonRejection> for AppError {
    fn from(err: axum::extract::rejection::JsonRejection) -> Self {
        AppError::BadRequest(err.body_text())
    }
}

/// Maps pipeline failures to HTTP statuses.
///
/// Upstream model problems are 502, store outages 503, failed writes 500.
impl From<QaError> for AppError {
    fn from(err: QaError) -> Self {
        let (status, code) = match &err {
            QaError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "INVALID_REQUEST"),
            QaError::Invocation(_) => (StatusCode::BAD_GATEWAY, "MODEL_INVOCATION_FAILED"),
            QaError::Parse(_) => (StatusCode::BAD_GATEWAY, "MODEL_OUTPUT_INVALID"),
            QaError::Retrieval(_) => (StatusCode::SERVICE_UNAVAILABLE, "RETRIEVAL_FAILED"),
            QaError::PaperLookup(_) => (StatusCode::SERVICE_UNAVAILABLE, "PAPER_LOOKUP_FAILED"),
            QaError::Persistence(_) => (StatusCode::INTERNAL_SERVER_ERROR, "PERSISTENCE_FAILED"),
            QaError::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, "CONFIG_ERROR"),
        };
        AppError::Http {
            status,
            code,
            message: err.to_string(),
        }
    }
}
