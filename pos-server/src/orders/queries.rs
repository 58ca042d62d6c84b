//! Read side of orders: detail view, filtered listing, kitchen queue

use std::collections::HashMap;

use shared::models::{Order, OrderDetail, OrderItem};
use sqlx::SqlitePool;

use super::error::{OrderError, Resource};
use crate::db::repository::order::{self as order_repo, OrderFilter};

#[derive(Clone)]
pub struct OrderQueries {
    pool: SqlitePool,
}

impl OrderQueries {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn get(&self, order_id: i64) -> Result<OrderDetail, OrderError> {
        let order = order_repo::find_by_id(&self.pool, order_id)
            .await?
            .ok_or_else(|| OrderError::not_found(Resource::Order, order_id))?;
        let items = order_repo::find_items(&self.pool, order_id).await?;
        Ok(OrderDetail { order, items })
    }

    /// Orders by status priority, newest first inside a status
    pub async fn list(&self, filter: OrderFilter) -> Result<Vec<Order>, OrderError> {
        Ok(order_repo::list(&self.pool, filter).await?)
    }

    /// Pending, preparing and ready orders with their lines
    pub async fn kitchen_queue(&self) -> Result<Vec<OrderDetail>, OrderError> {
        let orders = order_repo::find_active(&self.pool).await?;
        let ids: Vec<i64> = orders.iter().map(|o| o.id).collect();
        let items = order_repo::find_items_for(&self.pool, &ids).await?;
        Ok(attach_items(orders, items))
    }
}

fn attach_items(orders: Vec<Order>, items: Vec<OrderItem>) -> Vec<OrderDetail> {
    let mut by_order: HashMap<i64, Vec<OrderItem>> = HashMap::new();
    for item in items {
        by_order.entry(item.order_id).or_default().push(item);
    }
    orders
        .into_iter()
        .map(|order| {
            let items = by_order.remove(&order.id).unwrap_or_default();
            OrderDetail { order, items }
        })
        .collect()
}
