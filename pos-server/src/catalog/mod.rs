//! Menu catalog
//!
//! The cart only needs two lookups from the menu, so they sit behind
//! [`Catalog`]. [`SqliteCatalog`] serves them from the `menu_item` table.

use async_trait::async_trait;
use shared::models::MenuItem;
use sqlx::SqlitePool;

use crate::db::repository::{RepoResult, menu_item};

#[async_trait]
pub trait Catalog: Send + Sync {
    /// Items that can be ordered right now
    async fn get_available_items(&self) -> RepoResult<Vec<MenuItem>>;

    /// Any item by id, available or not
    async fn get_item(&self, id: i64) -> RepoResult<Option<MenuItem>>;
}

#[derive(Clone)]
pub struct SqliteCatalog {
    pool: SqlitePool,
}

impl SqliteCatalog {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Catalog for SqliteCatalog {
    async fn get_available_items(&self) -> RepoResult<Vec<MenuItem>> {
        menu_item::find_available(&self.pool).await
    }

    async fn get_item(&self, id: i64) -> RepoResult<Option<MenuItem>> {
        menu_item::find_by_id(&self.pool, id).await
    }
}
