//! Data models
//!
//! Shared between pos-server and its HTTP clients.
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (SQLite INTEGER PRIMARY KEY), timestamps are epoch millis.

pub mod dining_table;
pub mod menu_item;
pub mod order;
pub mod report;
pub mod reservation;

// Re-exports
pub use dining_table::*;
pub use menu_item::*;
pub use order::*;
pub use report::*;
pub use reservation::*;
