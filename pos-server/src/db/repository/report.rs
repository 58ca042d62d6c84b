//! Report Repository
//!
//! Read-only queries over a `[start, end)` window of Unix millis. Money is
//! returned raw and summed by the caller.

use super::RepoResult;
use shared::models::{OrderStatus, OrderType};
use sqlx::SqlitePool;

/// `(completed_at, total)` of every order completed inside the window
pub async fn completed_sales(pool: &SqlitePool, start: i64, end: i64) -> RepoResult<Vec<(i64, f64)>> {
    let rows = sqlx::query_as::<_, (i64, f64)>(
        "SELECT completed_at, total FROM orders WHERE status = 'completed' AND completed_at >= ? AND completed_at < ? ORDER BY completed_at",
    )
    .bind(start)
    .bind(end)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Orders created inside the window, grouped by status
pub async fn status_counts(pool: &SqlitePool, start: i64, end: i64) -> RepoResult<Vec<(OrderStatus, i64)>> {
    let rows = sqlx::query_as::<_, (OrderStatus, i64)>(
        "SELECT status, COUNT(*) FROM orders WHERE created_at >= ? AND created_at < ? GROUP BY status",
    )
    .bind(start)
    .bind(end)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Orders created inside the window, grouped by order type
pub async fn type_counts(pool: &SqlitePool, start: i64, end: i64) -> RepoResult<Vec<(OrderType, i64)>> {
    let rows = sqlx::query_as::<_, (OrderType, i64)>(
        "SELECT order_type, COUNT(*) FROM orders WHERE created_at >= ? AND created_at < ? GROUP BY order_type",
    )
    .bind(start)
    .bind(end)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Sold lines of completed orders: `(menu_item_id, name, quantity, line_total)`
pub async fn completed_lines(
    pool: &SqlitePool,
    start: i64,
    end: i64,
) -> RepoResult<Vec<(i64, String, i32, f64)>> {
    let rows = sqlx::query_as::<_, (i64, String, i32, f64)>(
        "SELECT oi.menu_item_id, oi.name, oi.quantity, oi.line_total FROM order_item oi JOIN orders o ON o.id = oi.order_id WHERE o.status = 'completed' AND o.completed_at >= ? AND o.completed_at < ? ORDER BY oi.id",
    )
    .bind(start)
    .bind(end)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}
