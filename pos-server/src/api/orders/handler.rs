//! Orders API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use shared::error::ErrorCode;
use shared::models::{Order, OrderDetail, OrderStatus, OrderType, PaymentMethod};

use crate::api::parse_field;
use crate::core::ServerState;
use crate::db::repository::order::OrderFilter;
use crate::utils::{ApiResponse, AppError, AppResult, ok, ok_with_message};

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub order_type: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct PaymentRequest {
    /// cash | card | online
    pub payment_method: String,
}

/// GET /api/orders?order_type=&status=
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<ApiResponse<Vec<Order>>>> {
    let filter = OrderFilter {
        order_type: query
            .order_type
            .as_deref()
            .map(|v| parse_field::<OrderType>("order_type", v))
            .transpose()?,
        status: query
            .status
            .as_deref()
            .map(|v| parse_field::<OrderStatus>("status", v))
            .transpose()?,
    };
    let orders = state.orders.list(filter).await?;
    Ok(ok(orders))
}

/// GET /api/orders/{id} - order with its lines
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<OrderDetail>>> {
    let order = state.orders.get(id).await?;
    Ok(ok(order))
}

/// POST /api/orders/{id}/status
pub async fn set_status(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<StatusRequest>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let status = parse_field::<OrderStatus>("status", &payload.status)?;
    let order = state.lifecycle.set_status(id, status).await?;
    Ok(ok_with_message(order, format!("Order moved to {status}")))
}

/// POST /api/orders/{id}/payment - record payment and complete
pub async fn complete_payment(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<PaymentRequest>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let method: PaymentMethod = payload.payment_method.parse().map_err(|e: String| {
        AppError::with_message(ErrorCode::PaymentInvalidMethod, e)
            .with_detail("payment_method", payload.payment_method.clone())
    })?;
    let order = state.lifecycle.complete_payment(id, method).await?;
    Ok(ok_with_message(order, "Payment recorded"))
}

/// POST /api/orders/{id}/cancel
pub async fn cancel(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let order = state.lifecycle.cancel(id).await?;
    Ok(ok_with_message(order, "Order cancelled"))
}
