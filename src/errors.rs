use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;
use validator::ValidationErrors;

use crate::models::posts::FieldErrors;

pub type Result<T> = core::result::Result<T, Error>;

/// Any failure of a post store call. Callers in the view never look at the
/// variant; it only matters for the diagnostic log.
#[derive(Debug, thiserror::Error)]
pub enum StoreAccessError {
    #[error("post store unavailable: {0}")]
    Unavailable(String),
    #[error("post store rejected the request: {0}")]
    Rejected(String),
    #[error("post record could not be decoded: {0}")]
    Decode(String),
}

impl From<sqlx::Error> for StoreAccessError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db) => Self::Rejected(db.to_string()),
            sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => {
                Self::Decode(err.to_string())
            }
            other => Self::Unavailable(other.to_string()),
        }
    }
}

#[derive(Debug)]
pub enum Error {
    Validation(FieldErrors),
    StoreAccess(StoreAccessError),
    DatabaseError(sqlx::Error),
    Migration(sqlx::migrate::MigrateError),
    Render(askama::Error),
    Config(String),
    Io(std::io::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(errors) => {
                write!(f, "validation failed: {}", errors.messages().join(", "))
            }
            Self::StoreAccess(err) => write!(f, "{err}"),
            Self::DatabaseError(err) => write!(f, "database error: {err}"),
            Self::Migration(err) => write!(f, "migration failed: {err}"),
            Self::Render(err) => write!(f, "template rendering failed: {err}"),
            Self::Config(msg) => write!(f, "invalid configuration: {msg}"),
            Self::Io(err) => write!(f, "io error: {err}"),
        }
    }
}

impl std::error::Error for Error {}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::Validation(errors) => (StatusCode::BAD_REQUEST, errors.messages().join(", ")),
            Self::StoreAccess(_) => (StatusCode::BAD_GATEWAY, "Post store unavailable".to_string()),
            Self::DatabaseError(_) | Self::Migration(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Database error".to_string())
            }
            Self::Render(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Template rendering failed".to_string(),
            ),
            Self::Config(_) | Self::Io(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        let body = Json(json!({ "error": message }));
        (status, body).into_response()
    }
}

impl From<StoreAccessError> for Error {
    fn from(err: StoreAccessError) -> Self {
        error!("Post store error: {}", err);
        Self::StoreAccess(err)
    }
}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        error!("Database error: {:?}", err);
        Self::DatabaseError(err)
    }
}

impl From<sqlx::migrate::MigrateError> for Error {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        error!("Migration error: {:?}", err);
        Self::Migration(err)
    }
}

impl From<ValidationErrors> for Error {
    fn from(errors: ValidationErrors) -> Self {
        Self::Validation(FieldErrors::from(&errors))
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<askama::Error> for Error {
    fn from(err: askama::Error) -> Self {
        error!("Template error: {}", err);
        Self::Render(err)
    }
}
