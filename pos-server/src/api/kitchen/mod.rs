//! Kitchen display feed
//!
//! Pending, preparing and ready orders with their lines, in queue order.

use axum::{Json, Router, extract::State, routing::get};
use shared::models::OrderDetail;

use crate::core::ServerState;
use crate::utils::{ApiResponse, AppResult, ok};

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/kitchen/orders", get(queue))
}

/// GET /api/kitchen/orders
pub async fn queue(State(state): State<ServerState>) -> AppResult<Json<ApiResponse<Vec<OrderDetail>>>> {
    let orders = state.orders.kitchen_queue().await?;
    Ok(ok(orders))
}
