use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use thiserror::Error;

/// Failure of a single `UserStore` call
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Cast to ObjectId failed for value \"{0}\": expected a 24-character hex string")]
    InvalidId(String),
    #[error("E11000 duplicate key error: email \"{0}\" already exists")]
    DuplicateEmail(String),
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("database error: {0}")]
    Database(#[from] mongodb::error::Error),
    #[error("store returned a non-ObjectId identifier for the new user")]
    UnexpectedInsertId,
}

/// The only error clients ever see: a 500 carrying the underlying message
/// as plain text.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    StoreOperationFailed(String),
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        AppError::StoreOperationFailed(e.to_string())
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .content_type("text/plain; charset=utf-8")
            .body(self.to_string())
    }
}
