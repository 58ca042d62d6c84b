//! Utilities
//!
//! - [`AppError`] / [`ApiResponse`] - HTTP error and envelope types (from shared::error)
//! - [`logger`] - tracing subscriber setup
//! - [`time`] - business-timezone date helpers

pub mod error;
pub mod logger;
pub mod time;

pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
pub use error::{ok, ok_with_message, validate};
