//! Dining Table Repository

use super::{RepoError, RepoResult, Tx};
use shared::models::{DiningTable, DiningTableCreate, DiningTableUpdate, TableStatus};
use sqlx::SqlitePool;

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<DiningTable>> {
    let tables = sqlx::query_as::<_, DiningTable>(
        "SELECT id, capacity, location, table_type, notes, status, current_order_id, created_at, updated_at FROM dining_table ORDER BY id",
    )
    .fetch_all(pool)
    .await?;
    Ok(tables)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<DiningTable>> {
    let table = sqlx::query_as::<_, DiningTable>(
        "SELECT id, capacity, location, table_type, notes, status, current_order_id, created_at, updated_at FROM dining_table WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(table)
}

pub async fn find_by_id_tx(tx: &mut Tx<'_>, id: i64) -> RepoResult<Option<DiningTable>> {
    let table = sqlx::query_as::<_, DiningTable>(
        "SELECT id, capacity, location, table_type, notes, status, current_order_id, created_at, updated_at FROM dining_table WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(&mut **tx)
    .await?;
    Ok(table)
}

/// Insert a table; a NULL id lets SQLite pick max(id) + 1
pub async fn create(pool: &SqlitePool, data: DiningTableCreate) -> RepoResult<DiningTable> {
    let now = shared::util::now_millis();
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO dining_table (id, capacity, location, table_type, notes, status, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, 'available', ?6, ?6) RETURNING id",
    )
    .bind(data.number)
    .bind(data.capacity)
    .bind(&data.location)
    .bind(&data.table_type)
    .bind(&data.notes)
    .bind(now)
    .fetch_one(pool)
    .await
    .map_err(|e| match RepoError::from(e) {
        RepoError::Duplicate(_) => {
            RepoError::Duplicate(format!("Table {} already exists", data.number.unwrap_or_default()))
        }
        other => other,
    })?;
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create table".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: DiningTableUpdate) -> RepoResult<DiningTable> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE dining_table SET capacity = COALESCE(?1, capacity), location = COALESCE(?2, location), table_type = COALESCE(?3, table_type), notes = COALESCE(?4, notes), updated_at = ?5 WHERE id = ?6",
    )
    .bind(data.capacity)
    .bind(data.location)
    .bind(data.table_type)
    .bind(data.notes)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Table {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Table {id} not found")))
}

pub async fn delete(tx: &mut Tx<'_>, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM dining_table WHERE id = ?")
        .bind(id)
        .execute(&mut **tx)
        .await?;
    Ok(rows.rows_affected() > 0)
}

/// Occupy the table for `order_id` unless another order holds it
pub async fn try_assign(tx: &mut Tx<'_>, id: i64, order_id: i64, now: i64) -> RepoResult<bool> {
    let rows = sqlx::query(
        "UPDATE dining_table SET status = 'occupied', current_order_id = ?1, updated_at = ?2 WHERE id = ?3 AND (current_order_id IS NULL OR current_order_id = ?1)",
    )
    .bind(order_id)
    .bind(now)
    .bind(id)
    .execute(&mut **tx)
    .await?;
    Ok(rows.rows_affected() > 0)
}

/// Free the table only while it is still held by `order_id`
///
/// A table with confirmed reservations goes back to `reserved`.
pub async fn release_if_held_by(
    tx: &mut Tx<'_>,
    id: i64,
    order_id: i64,
    now: i64,
) -> RepoResult<bool> {
    let rows = sqlx::query(
        "UPDATE dining_table SET status = CASE WHEN EXISTS (SELECT 1 FROM reservation WHERE table_id = ?2 AND status = 'confirmed') THEN 'reserved' ELSE 'available' END, current_order_id = NULL, updated_at = ?1 WHERE id = ?2 AND current_order_id = ?3",
    )
    .bind(now)
    .bind(id)
    .bind(order_id)
    .execute(&mut **tx)
    .await?;
    Ok(rows.rows_affected() > 0)
}

/// Set status and clear any order reference
pub async fn set_status(tx: &mut Tx<'_>, id: i64, status: TableStatus, now: i64) -> RepoResult<bool> {
    let rows = sqlx::query(
        "UPDATE dining_table SET status = ?1, current_order_id = NULL, updated_at = ?2 WHERE id = ?3",
    )
    .bind(status)
    .bind(now)
    .bind(id)
    .execute(&mut **tx)
    .await?;
    Ok(rows.rows_affected() > 0)
}

/// Lowest-numbered table that is free right now
pub async fn first_available(tx: &mut Tx<'_>) -> RepoResult<Option<i64>> {
    let id: Option<i64> = sqlx::query_scalar(
        "SELECT id FROM dining_table WHERE status = 'available' AND current_order_id IS NULL ORDER BY id LIMIT 1",
    )
    .fetch_optional(&mut **tx)
    .await?;
    Ok(id)
}

pub async fn count_by_status(pool: &SqlitePool) -> RepoResult<Vec<(TableStatus, i64)>> {
    let rows = sqlx::query_as::<_, (TableStatus, i64)>(
        "SELECT status, COUNT(*) FROM dining_table GROUP BY status",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}
