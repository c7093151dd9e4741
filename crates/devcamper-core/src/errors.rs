//! Application error type and its HTTP representation.
//!
//! Every handler returns `Result<_, AppError>`. An [`AppError`] carries the
//! HTTP status, the underlying error and whether the failure is
//! *operational* (an expected, client-facing condition such as a missing
//! resource) or an unexpected fault.
//!
//! # Response shape
//!
//! ```json
//! { "success": false, "message": "Bootcamp not found with id of 7f9c..." }
//! ```
//!
//! Non-operational errors never leak their message: the client receives a
//! generic 500 while the full error is logged. The response also carries an
//! [`ErrorReport`] extension that the development-mode error middleware uses
//! to attach the full error chain and stack.

use std::fmt;

use anyhow::anyhow;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use utoipa::ToSchema;
use validator::ValidationErrors;

/// Message shown to clients for unexpected failures outside development.
pub const GENERIC_ERROR_MESSAGE: &str = "Something went very wrong!";

/// Error body returned by every failing endpoint.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ErrorBody {
    pub success: bool,
    pub message: String,
}

/// Full error detail stashed in response extensions.
#[derive(Debug, Clone)]
pub struct ErrorReport {
    pub status: StatusCode,
    pub message: String,
    pub chain: String,
    pub stack: String,
    pub operational: bool,
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub error: anyhow::Error,
    pub operational: bool,
}

impl AppError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            error: anyhow!(message.into()),
            operational: true,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }

    pub fn too_many_requests(message: impl Into<String>) -> Self {
        Self::new(StatusCode::TOO_MANY_REQUESTS, message)
    }

    /// An expected server-side failure whose message is safe to show.
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    /// An unclassified fault. Its message is hidden outside development.
    pub fn unexpected<E>(err: E) -> Self
    where
        E: Into<anyhow::Error>,
    {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            error: err.into(),
            operational: false,
        }
    }

    pub fn message(&self) -> String {
        self.error.to_string()
    }

    pub fn report(&self) -> ErrorReport {
        ErrorReport {
            status: self.status,
            message: self.error.to_string(),
            chain: format!("{:#}", self.error),
            stack: format!("{:?}", self.error),
            operational: self.operational,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.status, self.error)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let report = self.report();

        let (status, message) = if self.operational {
            (self.status, report.message.clone())
        } else {
            tracing::error!(error = ?self.error, "Unexpected error while handling request");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                GENERIC_ERROR_MESSAGE.to_string(),
            )
        };

        let mut response = (
            status,
            Json(ErrorBody {
                success: false,
                message,
            }),
        )
            .into_response();
        response.extensions_mut().insert(report);
        response
    }
}

/// Returns the violated constraint name if `err` is a unique violation.
pub fn unique_violation(err: &sqlx::Error) -> Option<String> {
    match err {
        sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("23505") => {
            Some(db_err.constraint().unwrap_or("unique").to_string())
        }
        _ => None,
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        if let Some(constraint) = unique_violation(&err) {
            return AppError::conflict(format!(
                "Duplicate field value: {}. Please use another value!",
                constraint
            ));
        }

        match &err {
            sqlx::Error::RowNotFound => AppError::not_found("Resource not found"),
            sqlx::Error::Database(db_err) => match db_err.code().as_deref() {
                Some("23503") => AppError::bad_request(format!(
                    "Referenced resource does not exist ({})",
                    db_err.constraint().unwrap_or("foreign key")
                )),
                Some("23514") | Some("22P02") | Some("22003") => {
                    AppError::bad_request(format!("Invalid value: {}", db_err.message()))
                }
                _ => AppError::unexpected(err),
            },
            _ => AppError::unexpected(err),
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        AppError::bad_request(format_validation_errors(&errors))
    }
}

impl From<crate::query::QueryError> for AppError {
    fn from(err: crate::query::QueryError) -> Self {
        AppError::bad_request(err.to_string())
    }
}

impl From<crate::file_storage::StorageError> for AppError {
    fn from(err: crate::file_storage::StorageError) -> Self {
        AppError::unexpected(err)
    }
}

/// Joins every field message of a validation failure.
pub fn format_validation_errors(errors: &ValidationErrors) -> String {
    let mut messages: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| {
                error
                    .message
                    .as_ref()
                    .map(|msg| msg.to_string())
                    .unwrap_or_else(|| format!("{} is invalid", field))
            })
        })
        .collect();
    messages.sort();
    messages.join(", ")
}
