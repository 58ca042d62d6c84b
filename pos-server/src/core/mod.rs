//! Server core: configuration, shared state, start-up errors and background tasks
//!
//! - [`Config`] - environment configuration
//! - [`ServerState`] - services shared by every handler
//! - [`Server`] - HTTP listener
//! - [`ServerError`] - start-up errors
//! - [`BackgroundTasks`] - housekeeping task registry

pub mod config;
pub mod error;
pub mod server;
pub mod state;
pub mod tasks;

pub use config::Config;
pub use error::{Result, ServerError};
pub use server::Server;
pub use state::ServerState;
pub use tasks::{BackgroundTasks, TaskKind};
