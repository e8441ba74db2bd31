use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::{debug, error, warn};

// 2067 = SQLite unique constraint, 23505 = PostgreSQL unique violation
const UNIQUE_VIOLATION_CODES: &[&str] = &["2067", "23505"];

// SQLite busy/locked (incl. extended BUSY_SNAPSHOT), PostgreSQL serialization
// failure, deadlock and lock_not_available
const CONTENTION_CODES: &[&str] = &["5", "6", "517", "40001", "40P01", "55P03"];

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Resource not found: {0}")]
    NotFound(String),
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("Invalid input: {0}")]
    Validation(String),
    #[error("Capacity exceeded: {0}")]
    CapacityExceeded(String),
    #[error("Invalid state: {0}")]
    InvalidState(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Store contention")]
    Contention,
    #[error("Internal server error")]
    Internal,
    #[error("Internal server error: {0}")]
    InternalWithMsg(String),
}

impl AppError {
    /// Maps a store error on a write path, separating lock contention (which
    /// callers may retry) from genuine failures.
    pub fn from_write(e: sqlx::Error) -> Self {
        match &e {
            sqlx::Error::PoolTimedOut => AppError::Contention,
            sqlx::Error::Database(db_err) => {
                let code = db_err.code().unwrap_or_default();
                if CONTENTION_CODES.contains(&code.as_ref()) {
                    AppError::Contention
                } else {
                    AppError::Database(e)
                }
            }
            _ => AppError::Database(e),
        }
    }

    pub fn is_unique_violation(&self) -> bool {
        match self {
            AppError::Database(e) => e
                .as_database_error()
                .and_then(|db_err| db_err.code())
                .is_some_and(|code| UNIQUE_VIOLATION_CODES.contains(&code.as_ref())),
            _ => false,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Database(_) | AppError::Internal | AppError::InternalWithMsg(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Validation(_)
            | AppError::CapacityExceeded(_)
            | AppError::InvalidState(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) | AppError::Contention => StatusCode::CONFLICT,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            AppError::Database(e) => {
                error!("Database error: {:?}", e);
                "Internal server error".to_string()
            }
            AppError::Internal => "Internal server error".to_string(),
            AppError::InternalWithMsg(msg) => {
                error!("Internal error: {}", msg);
                "Internal server error".to_string()
            }
            AppError::Contention => {
                warn!("Store contention escaped the retry loop");
                "Request conflicted with a concurrent update, please retry".to_string()
            }
            AppError::NotFound(msg)
            | AppError::Unauthorized(msg)
            | AppError::Forbidden(msg)
            | AppError::Validation(msg)
            | AppError::CapacityExceeded(msg)
            | AppError::InvalidState(msg)
            | AppError::Conflict(msg) => msg.clone(),
        };

        (status, Json(json!({ "message": message }))).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        debug!(status = %rejection.status(), "Rejected request body: {}", rejection.body_text());
        let message = match rejection {
            JsonRejection::MissingJsonContentType(_) => "Expected a JSON request body",
            _ => "Invalid request body",
        };
        AppError::Validation(message.into())
    }
}

/// Failures while bringing the service up: configuration, pool, migrations
/// and signing keys.
#[derive(Error, Debug)]
pub enum StartupError {
    #[error("configuration error: {0}")]
    Config(String),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
    #[error("invalid JWT key: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
    #[error("password hashing setup failed: {0}")]
    Hashing(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
