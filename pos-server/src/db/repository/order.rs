//! Order Repository

use super::{RepoResult, Tx};
use shared::models::{
    CustomerInfo, Order, OrderItem, OrderStatus, OrderSummary, OrderType, PaymentMethod,
};
use sqlx::SqlitePool;

const ORDER_COLUMNS: &str = "id, order_number, order_type, status, table_id, customer_name, customer_phone, delivery_address, notes, total, payment_method, created_at, updated_at, completed_at";

/// Listing order: status priority first, newest first inside a status
const PRIORITY_ORDER: &str = "CASE status WHEN 'pending' THEN 1 WHEN 'preparing' THEN 2 WHEN 'ready' THEN 3 WHEN 'completed' THEN 4 ELSE 5 END";

/// Header values for a new order
pub struct NewOrder<'a> {
    pub order_number: &'a str,
    pub order_type: OrderType,
    pub table_id: Option<i64>,
    pub customer: &'a CustomerInfo,
    pub notes: Option<&'a str>,
    pub total: f64,
    pub created_at: i64,
}

/// One line of a new order
pub struct NewOrderLine<'a> {
    pub menu_item_id: i64,
    pub name: &'a str,
    pub price: f64,
    pub quantity: i32,
    pub line_total: f64,
}

/// Filters for [`list`]
#[derive(Debug, Clone, Copy, Default)]
pub struct OrderFilter {
    pub order_type: Option<OrderType>,
    pub status: Option<OrderStatus>,
}

pub async fn insert(tx: &mut Tx<'_>, order: &NewOrder<'_>) -> RepoResult<i64> {
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO orders (order_number, order_type, status, table_id, customer_name, customer_phone, delivery_address, notes, total, created_at, updated_at) VALUES (?1, ?2, 'pending', ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?9) RETURNING id",
    )
    .bind(order.order_number)
    .bind(order.order_type)
    .bind(order.table_id)
    .bind(&order.customer.name)
    .bind(&order.customer.phone)
    .bind(&order.customer.address)
    .bind(order.notes)
    .bind(order.total)
    .bind(order.created_at)
    .fetch_one(&mut **tx)
    .await?;
    Ok(id)
}

pub async fn insert_line(tx: &mut Tx<'_>, order_id: i64, line: &NewOrderLine<'_>) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO order_item (order_id, menu_item_id, name, price, quantity, line_total) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
    )
    .bind(order_id)
    .bind(line.menu_item_id)
    .bind(line.name)
    .bind(line.price)
    .bind(line.quantity)
    .bind(line.line_total)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

/// Point the order at the table it ended up on
pub async fn set_table(tx: &mut Tx<'_>, order_id: i64, table_id: i64) -> RepoResult<()> {
    sqlx::query("UPDATE orders SET table_id = ? WHERE id = ?")
        .bind(table_id)
        .bind(order_id)
        .execute(&mut **tx)
        .await?;
    Ok(())
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Order>> {
    let order = sqlx::query_as::<_, Order>(&format!(
        "SELECT {ORDER_COLUMNS} FROM orders WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(order)
}

pub async fn find_by_id_tx(tx: &mut Tx<'_>, id: i64) -> RepoResult<Option<Order>> {
    let order = sqlx::query_as::<_, Order>(&format!(
        "SELECT {ORDER_COLUMNS} FROM orders WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(&mut **tx)
    .await?;
    Ok(order)
}

pub async fn find_items(pool: &SqlitePool, order_id: i64) -> RepoResult<Vec<OrderItem>> {
    let items = sqlx::query_as::<_, OrderItem>(
        "SELECT id, order_id, menu_item_id, name, price, quantity, line_total FROM order_item WHERE order_id = ? ORDER BY id",
    )
    .bind(order_id)
    .fetch_all(pool)
    .await?;
    Ok(items)
}

/// Lines of several orders at once, ordered by order then line id
pub async fn find_items_for(pool: &SqlitePool, order_ids: &[i64]) -> RepoResult<Vec<OrderItem>> {
    if order_ids.is_empty() {
        return Ok(Vec::new());
    }
    let placeholders = vec!["?"; order_ids.len()].join(", ");
    let sql = format!(
        "SELECT id, order_id, menu_item_id, name, price, quantity, line_total FROM order_item WHERE order_id IN ({placeholders}) ORDER BY order_id, id"
    );
    let mut query = sqlx::query_as::<_, OrderItem>(&sql);
    for id in order_ids {
        query = query.bind(id);
    }
    let items = query.fetch_all(pool).await?;
    Ok(items)
}

pub async fn list(pool: &SqlitePool, filter: OrderFilter) -> RepoResult<Vec<Order>> {
    let sql = format!(
        "SELECT {ORDER_COLUMNS} FROM orders WHERE (?1 IS NULL OR order_type = ?1) AND (?2 IS NULL OR status = ?2) ORDER BY {PRIORITY_ORDER}, created_at DESC, id DESC"
    );
    let orders = sqlx::query_as::<_, Order>(&sql)
        .bind(filter.order_type)
        .bind(filter.status)
        .fetch_all(pool)
        .await?;
    Ok(orders)
}

/// Orders the kitchen still has to work on, oldest first inside a status
pub async fn find_active(pool: &SqlitePool) -> RepoResult<Vec<Order>> {
    let sql = format!(
        "SELECT {ORDER_COLUMNS} FROM orders WHERE status IN ('pending', 'preparing', 'ready') ORDER BY {PRIORITY_ORDER}, created_at ASC, id ASC"
    );
    let orders = sqlx::query_as::<_, Order>(&sql).fetch_all(pool).await?;
    Ok(orders)
}

pub async fn find_summary(pool: &SqlitePool, id: i64) -> RepoResult<Option<OrderSummary>> {
    let summary = sqlx::query_as::<_, OrderSummary>(
        "SELECT id, order_number, order_type, status, customer_name, total, created_at FROM orders WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(summary)
}

/// Compare-and-swap status update.
///
/// Applies only while the row is still in `from`; returns whether it did.
/// `completed_at` and `payment_method` are written only when given.
pub async fn update_status(
    tx: &mut Tx<'_>,
    id: i64,
    from: OrderStatus,
    to: OrderStatus,
    payment_method: Option<PaymentMethod>,
    now: i64,
) -> RepoResult<bool> {
    let completed_at = (to == OrderStatus::Completed).then_some(now);
    let rows = sqlx::query(
        "UPDATE orders SET status = ?1, updated_at = ?2, completed_at = COALESCE(?3, completed_at), payment_method = COALESCE(?4, payment_method) WHERE id = ?5 AND status = ?6",
    )
    .bind(to)
    .bind(now)
    .bind(completed_at)
    .bind(payment_method)
    .bind(id)
    .bind(from)
    .execute(&mut **tx)
    .await?;
    Ok(rows.rows_affected() > 0)
}

/// Number of orders (any status) that reference the table
pub async fn count_for_table(tx: &mut Tx<'_>, table_id: i64) -> RepoResult<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders WHERE table_id = ?")
        .bind(table_id)
        .fetch_one(&mut **tx)
        .await?;
    Ok(count)
}
