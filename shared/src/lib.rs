//! Shared types for the POS server
//!
//! Domain models, the error code system and the API response envelope,
//! used by the server and by anything that talks to its HTTP API.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use axum::Json;
pub use http;
pub use serde::{Deserialize, Serialize};
