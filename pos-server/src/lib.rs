//! Restaurant POS server
//!
//! # Architecture
//!
//! - **Orders** (`orders`): session cart, lifecycle state machine, read side
//! - **Tables** (`tables`): occupancy tracking, floor management, reservations
//! - **Catalog** (`catalog`): menu lookups behind a trait
//! - **Sessions** (`session`): idle-expiring cart store
//! - **Reports** (`reports`): daily sales figures
//! - **HTTP API** (`api`): axum routers, one module per resource
//!
//! # Layout
//!
//! ```text
//! pos-server/src/
//! ├── core/          # config, state, server, background tasks
//! ├── db/            # SQLite pool and repositories
//! ├── orders/        # cart, lifecycle, queries, money
//! ├── tables/        # occupancy, reservations
//! ├── catalog/       # menu lookups
//! ├── session/       # session store
//! ├── reports/       # reporting
//! ├── api/           # HTTP routes and handlers
//! ├── middleware/    # request logging
//! └── utils/         # errors, logger, time helpers
//! ```

pub mod api;
pub mod catalog;
pub mod core;
pub mod db;
pub mod middleware;
pub mod orders;
pub mod reports;
pub mod session;
pub mod tables;
pub mod utils;

pub use core::{Config, Server, ServerState};
pub use utils::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
pub use utils::logger::{init_logger, init_logger_with_file};

/// Load `.env`, prepare the work dir and start logging
pub fn setup_environment() -> anyhow::Result<()> {
    // A missing .env file is fine
    let _ = dotenv::dotenv();

    let config = Config::from_env();
    std::fs::create_dir_all(&config.work_dir)?;
    init_logger_with_file(
        &config.log_level,
        config.is_production(),
        config.log_dir.as_deref(),
    )?;
    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
    ____  ____  _____
   / __ \/ __ \/ ___/
  / /_/ / / / /\__ \
 / ____/ /_/ /___/ /
/_/    \____//____/
    "#
    );
}
