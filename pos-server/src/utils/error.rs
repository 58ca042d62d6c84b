//! HTTP-edge error handling
//!
//! Error types come from `shared::error`; this module adds the response
//! helpers and the conversions from server-side error types.
//!
//! ```ignore
//! // Failure
//! Err(AppError::not_found("Menu item 7"))
//!
//! // Success
//! Ok(ok(item))
//! ```

use axum::Json;
use serde::Serialize;
use validator::{Validate, ValidationErrors};

use crate::db::repository::RepoError;

pub use shared::error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};

/// Successful response carrying `data`
pub fn ok<T: Serialize>(data: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse::success(data))
}

/// Successful response with a custom message
pub fn ok_with_message<T: Serialize>(data: T, message: impl Into<String>) -> Json<ApiResponse<T>> {
    Json(ApiResponse::success_with_message(message, data))
}

/// Run `validator` rules on a request payload
pub fn validate<T: Validate>(payload: &T) -> AppResult<()> {
    payload.validate().map_err(validation_error)
}

fn validation_error(errors: ValidationErrors) -> AppError {
    let mut fields: Vec<(String, String)> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |err| {
                let msg = match &err.message {
                    Some(msg) => msg.to_string(),
                    None => err.code.to_string(),
                };
                (field.to_string(), msg)
            })
        })
        .collect();
    fields.sort();

    let summary = fields
        .iter()
        .map(|(field, msg)| format!("{field}: {msg}"))
        .collect::<Vec<_>>()
        .join("; ");
    fields
        .into_iter()
        .fold(AppError::validation(summary), |err, (field, msg)| {
            err.with_detail(field, msg)
        })
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => AppError::with_message(ErrorCode::NotFound, msg),
            RepoError::Duplicate(msg) => AppError::already_exists(msg),
            RepoError::Validation(msg) => AppError::validation(msg),
            RepoError::Database(msg) => AppError::database(msg),
        }
    }
}
