use std::sync::Arc;
use std::time::Duration;

use sqlx::SqlitePool;

use crate::catalog::{Catalog, SqliteCatalog};
use crate::core::tasks::{BackgroundTasks, TaskKind};
use crate::core::{Config, Result, ServerError};
use crate::db::DbService;
use crate::orders::{CartService, OrderLifecycle, OrderQueries};
use crate::reports::ReportService;
use crate::session::{MemorySessionStore, SessionStore};
use crate::tables::{ReservationService, TableService};

/// Upper bound between two session purges
const SESSION_PURGE_INTERVAL: Duration = Duration::from_secs(60);

/// Shared server state, cheap to clone into every handler
///
/// | Field | Role |
/// |-------|------|
/// | config | immutable configuration |
/// | pool | SQLite pool |
/// | catalog | menu lookups for the cart |
/// | sessions | in-memory cart blobs |
/// | carts | session cart operations |
/// | lifecycle | order submission and transitions |
/// | orders | order read side |
/// | tables / reservations | floor management |
/// | reports | sales figures |
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub pool: SqlitePool,
    pub catalog: Arc<dyn Catalog>,
    pub sessions: Arc<MemorySessionStore>,
    pub carts: CartService,
    pub lifecycle: OrderLifecycle,
    pub orders: OrderQueries,
    pub tables: TableService,
    pub reservations: ReservationService,
    pub reports: ReportService,
}

impl ServerState {
    /// Open the database under the configured work dir and wire the services
    pub async fn initialize(config: &Config) -> Result<Self> {
        let db_path = config.database_path();
        if let Some(parent) = std::path::Path::new(&db_path).parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                ServerError::Config(format!(
                    "Failed to create database directory {}: {e}",
                    parent.display()
                ))
            })?;
        }

        let db = DbService::new(&db_path).await?;
        tracing::info!(path = %db_path, "Database ready");
        Ok(Self::with_db(config.clone(), db))
    }

    /// Wire the services on top of an open database
    pub fn with_db(config: Config, db: DbService) -> Self {
        let pool = db.pool;
        let catalog: Arc<dyn Catalog> = Arc::new(SqliteCatalog::new(pool.clone()));
        let sessions = Arc::new(MemorySessionStore::new(Duration::from_secs(
            config.session_idle_timeout_secs,
        )));
        let store: Arc<dyn SessionStore> = sessions.clone();
        let tz = config.business_tz;

        Self {
            carts: CartService::new(store, catalog.clone()),
            lifecycle: OrderLifecycle::new(pool.clone(), config.auto_assign_table, tz),
            orders: OrderQueries::new(pool.clone()),
            tables: TableService::new(pool.clone()),
            reservations: ReservationService::new(pool.clone()),
            reports: ReportService::new(pool.clone(), tz),
            catalog,
            sessions,
            pool,
            config,
        }
    }

    /// Spawn housekeeping tasks; the caller owns their shutdown
    pub fn start_background_tasks(&self) -> BackgroundTasks {
        let mut tasks = BackgroundTasks::new();

        let idle = Duration::from_secs(self.config.session_idle_timeout_secs.max(1));
        let interval = idle.min(SESSION_PURGE_INTERVAL);
        let token = tasks.shutdown_token();
        tasks.spawn(
            "session_purge",
            TaskKind::Periodic,
            self.sessions.clone().run_purge(interval, token),
        );

        tracing::info!(count = tasks.len(), "Background tasks started");
        tasks
    }
}
