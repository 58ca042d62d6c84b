//! Session cart API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};
use shared::models::{CustomerInfo, OrderType, SubmittedOrder};
use validator::Validate;

use crate::api::parse_field;
use crate::core::ServerState;
use crate::orders::money::MAX_QUANTITY;
use crate::orders::{Cart, CartLine, SubmitRequest};
use crate::utils::{ApiResponse, AppError, AppResult, ok, ok_with_message, validate};

/// Cart as returned to clients
#[derive(Debug, Serialize, Deserialize)]
pub struct CartView {
    pub session_id: String,
    pub items: Vec<CartLine>,
    pub item_count: i32,
    pub total: f64,
}

impl CartView {
    fn new(session_id: String, cart: Cart) -> Self {
        Self {
            item_count: cart.item_count(),
            total: cart.total(),
            items: cart.lines().to_vec(),
            session_id,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct AddItemRequest {
    pub menu_item_id: i64,
    #[validate(range(min = 1, max = MAX_QUANTITY))]
    pub quantity: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct AdjustQuantityRequest {
    /// Signed change, e.g. `1` or `-1`
    pub delta: i32,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct SubmitOrderRequest {
    /// dine-in | takeaway | delivery (defaults to dine-in)
    pub order_type: Option<String>,
    #[validate(length(max = 100))]
    pub customer_name: Option<String>,
    #[validate(length(max = 30))]
    pub customer_phone: Option<String>,
    #[validate(length(max = 300))]
    pub delivery_address: Option<String>,
    pub table_id: Option<i64>,
    #[validate(length(max = 500))]
    pub notes: Option<String>,
}

impl SubmitOrderRequest {
    fn into_submit(self) -> AppResult<SubmitRequest> {
        let order_type = match self.order_type.as_deref() {
            Some(value) => parse_field::<OrderType>("order_type", value)?,
            None => OrderType::DineIn,
        };
        Ok(SubmitRequest {
            order_type,
            customer: CustomerInfo {
                name: self.customer_name,
                phone: self.customer_phone,
                address: self.delivery_address,
            },
            table_id: self.table_id,
            notes: self.notes,
        })
    }
}

fn check_session(session_id: &str) -> AppResult<()> {
    if session_id.trim().is_empty() || session_id.len() > 128 {
        return Err(AppError::validation("Invalid session id"));
    }
    Ok(())
}

/// GET /api/cart/{session_id}
pub async fn view(
    State(state): State<ServerState>,
    Path(session_id): Path<String>,
) -> AppResult<Json<ApiResponse<CartView>>> {
    check_session(&session_id)?;
    let cart = state.carts.load(&session_id).await;
    Ok(ok(CartView::new(session_id, cart)))
}

/// DELETE /api/cart/{session_id}
pub async fn clear(
    State(state): State<ServerState>,
    Path(session_id): Path<String>,
) -> AppResult<Json<ApiResponse<CartView>>> {
    check_session(&session_id)?;
    state.carts.clear(&session_id).await;
    Ok(ok_with_message(CartView::new(session_id, Cart::new()), "Cart cleared"))
}

/// POST /api/cart/{session_id}/items
pub async fn add_item(
    State(state): State<ServerState>,
    Path(session_id): Path<String>,
    Json(payload): Json<AddItemRequest>,
) -> AppResult<Json<ApiResponse<CartView>>> {
    check_session(&session_id)?;
    validate(&payload)?;
    let cart = state
        .carts
        .add_item(&session_id, payload.menu_item_id, payload.quantity.unwrap_or(1))
        .await?;
    Ok(ok(CartView::new(session_id, cart)))
}

/// POST /api/cart/{session_id}/items/{menu_item_id}/adjust
pub async fn adjust_quantity(
    State(state): State<ServerState>,
    Path((session_id, menu_item_id)): Path<(String, i64)>,
    Json(payload): Json<AdjustQuantityRequest>,
) -> AppResult<Json<ApiResponse<CartView>>> {
    check_session(&session_id)?;
    let cart = state
        .carts
        .adjust_quantity(&session_id, menu_item_id, payload.delta)
        .await?;
    Ok(ok(CartView::new(session_id, cart)))
}

/// DELETE /api/cart/{session_id}/items/{menu_item_id}
pub async fn remove_item(
    State(state): State<ServerState>,
    Path((session_id, menu_item_id)): Path<(String, i64)>,
) -> AppResult<Json<ApiResponse<CartView>>> {
    check_session(&session_id)?;
    let cart = state.carts.remove_item(&session_id, menu_item_id).await?;
    Ok(ok(CartView::new(session_id, cart)))
}

/// POST /api/cart/{session_id}/submit - persist the cart as a pending order
pub async fn submit(
    State(state): State<ServerState>,
    Path(session_id): Path<String>,
    Json(payload): Json<SubmitOrderRequest>,
) -> AppResult<Json<ApiResponse<SubmittedOrder>>> {
    check_session(&session_id)?;
    validate(&payload)?;
    let request = payload.into_submit()?;
    let submitted = state
        .carts
        .submit(&session_id, &state.lifecycle, request)
        .await?;
    Ok(ok_with_message(submitted, "Order submitted"))
}
