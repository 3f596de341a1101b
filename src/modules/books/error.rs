use folio_http::error::AppError;
use serde_json::json;
use thiserror::Error;

/// Domain errors raised by the book repository.
#[derive(Debug, Error)]
pub enum BookError {
    #[error("Book with ID={0} doesn't exist")]
    NotFound(i64),

    #[error("Book with ID={0} already exists")]
    AlreadyExists(i64),

    #[error("Database error occurred")]
    Storage(#[source] sqlx::Error),
}

impl From<sqlx::Error> for BookError {
    fn from(err: sqlx::Error) -> Self {
        tracing::debug!(error = %err, "book storage operation failed");
        BookError::Storage(err)
    }
}

impl From<BookError> for AppError {
    fn from(err: BookError) -> Self {
        match err {
            BookError::NotFound(_) => AppError::not_found(err.to_string()),
            BookError::AlreadyExists(id) => {
                AppError::conflict(vec![json!({ "field": "id", "value": id })], err.to_string())
            }
            BookError::Storage(_) => AppError::Internal(anyhow::Error::new(err)),
        }
    }
}
