use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// The application's error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// A database error.
    #[error("Database error: {0}")]
    Database(#[from] tokio_postgres::Error),

    /// A connection could not be checked out of the pool.
    #[error("Pool error: {0}")]
    Pool(#[from] deadpool_postgres::PoolError),

    /// The pool could not be built from the configuration.
    #[error("Pool creation error: {0}")]
    CreatePool(#[from] deadpool_postgres::CreatePoolError),

    /// A column was missing or had an unexpected type.
    #[error("Missing data: {0}")]
    MissingData(String),

    /// The requested todo does not exist.
    #[error("Todo not found")]
    NotFound,

    /// Login rejected.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// No usable `Authorization: Bearer` header.
    #[error("Missing or invalid Authorization header")]
    MissingAuth,

    /// Bad signature, unparsable payload or missing subject.
    #[error("Invalid token")]
    MalformedToken,

    /// The token's `exp` has passed.
    #[error("Token expired")]
    ExpiredToken,

    /// A validation error.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The request body could not be read as the expected JSON shape.
    #[error(transparent)]
    JsonRejection(#[from] JsonRejection),

    /// A path parameter could not be parsed (e.g. a non-numeric todo id).
    #[error(transparent)]
    PathRejection(#[from] PathRejection),

    /// An internal server error.
    #[error("Internal server error: {0}")]
    Internal(String),
}

/// A `Result` type that uses `AppError` as the error type.
pub type Result<T> = std::result::Result<T, AppError>;

impl AppError {
    /// The HTTP status this error is reported with.
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::InvalidCredentials
            | AppError::MissingAuth
            | AppError::MalformedToken
            | AppError::ExpiredToken => StatusCode::UNAUTHORIZED,
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::JsonRejection(JsonRejection::MissingJsonContentType(_)) => {
                StatusCode::UNSUPPORTED_MEDIA_TYPE
            }
            AppError::JsonRejection(_) | AppError::PathRejection(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            AppError::Database(_)
            | AppError::Pool(_)
            | AppError::CreatePool(_)
            | AppError::MissingData(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = match self {
            AppError::Database(ref e) => {
                tracing::error!("Database error: {}", e);
                "Internal server error".to_string()
            }

            AppError::Pool(ref e) => {
                tracing::error!("Pool error: {}", e);
                "Internal server error".to_string()
            }

            AppError::CreatePool(ref e) => {
                tracing::error!("Pool creation error: {}", e);
                "Internal server error".to_string()
            }

            AppError::MissingData(ref column) => {
                tracing::error!("Row is missing column: {}", column);
                "Internal server error".to_string()
            }

            AppError::Internal(ref msg) => {
                tracing::error!("Internal error: {}", msg);
                "Internal server error".to_string()
            }

            AppError::NotFound => {
                tracing::debug!("Todo not found");
                self.to_string()
            }

            AppError::InvalidCredentials
            | AppError::MissingAuth
            | AppError::MalformedToken
            | AppError::ExpiredToken => {
                tracing::warn!("Authentication failed: {}", self);
                self.to_string()
            }

            AppError::Validation(ref msg) => {
                tracing::debug!("Validation error: {}", msg);
                msg.clone()
            }

            AppError::JsonRejection(ref rejection) => {
                tracing::debug!("Rejected request body: {}", rejection);
                rejection.body_text()
            }

            AppError::PathRejection(ref rejection) => {
                tracing::debug!("Rejected path parameter: {}", rejection);
                rejection.body_text()
            }
        };

        let body = sonic_rs::to_string(&sonic_rs::json!({
            "detail": detail
        }))
        .unwrap_or_else(|_| r#"{"detail":"Internal server error"}"#.to_string());

        (
            status,
            [(http::header::CONTENT_TYPE, "application/json")],
            body,
        )
            .into_response()
    }
}
