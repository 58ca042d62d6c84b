//! Menu API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;
use shared::models::{MenuItem, MenuItemCreate, MenuItemUpdate};
use validator::Validate;

use crate::core::ServerState;
use crate::db::repository::menu_item;
use crate::orders::money::MAX_PRICE;
use crate::utils::{ApiResponse, AppError, AppResult, ok, ok_with_message, validate};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateMenuItemRequest {
    #[validate(length(min = 1, max = 100, message = "must be 1-100 characters"))]
    pub name: String,
    #[validate(length(max = 500))]
    pub description: Option<String>,
    #[validate(range(min = 0.0, max = MAX_PRICE))]
    pub price: f64,
    #[validate(length(min = 1, max = 50, message = "must be 1-50 characters"))]
    pub category: String,
    pub is_available: Option<bool>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateMenuItemRequest {
    #[validate(length(min = 1, max = 100, message = "must be 1-100 characters"))]
    pub name: Option<String>,
    #[validate(length(max = 500))]
    pub description: Option<String>,
    #[validate(range(min = 0.0, max = MAX_PRICE))]
    pub price: Option<f64>,
    #[validate(length(min = 1, max = 50, message = "must be 1-50 characters"))]
    pub category: Option<String>,
    pub is_available: Option<bool>,
}

fn not_found(id: i64) -> AppError {
    AppError::with_message(shared::error::ErrorCode::MenuItemNotFound, format!("Menu item {id} not found"))
        .with_detail("id", id)
}

/// GET /api/menu - items that can be ordered
pub async fn list_available(State(state): State<ServerState>) -> AppResult<Json<ApiResponse<Vec<MenuItem>>>> {
    let items = state.catalog.get_available_items().await?;
    Ok(ok(items))
}

/// GET /api/menu/all - every item, including unavailable ones
pub async fn list_all(State(state): State<ServerState>) -> AppResult<Json<ApiResponse<Vec<MenuItem>>>> {
    let items = menu_item::find_all(&state.pool).await?;
    Ok(ok(items))
}

/// GET /api/menu/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<MenuItem>>> {
    let item = state.catalog.get_item(id).await?.ok_or_else(|| not_found(id))?;
    Ok(ok(item))
}

/// POST /api/menu
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<CreateMenuItemRequest>,
) -> AppResult<Json<ApiResponse<MenuItem>>> {
    validate(&payload)?;
    let item = menu_item::create(
        &state.pool,
        MenuItemCreate {
            name: payload.name.trim().to_string(),
            description: payload.description,
            price: payload.price,
            category: payload.category.trim().to_string(),
            is_available: payload.is_available,
        },
    )
    .await?;
    tracing::info!(menu_item_id = item.id, name = %item.name, "Menu item created");
    Ok(ok_with_message(item, "Menu item created"))
}

/// PUT /api/menu/{id} - partial update, including availability
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateMenuItemRequest>,
) -> AppResult<Json<ApiResponse<MenuItem>>> {
    validate(&payload)?;
    let data = MenuItemUpdate {
        name: payload.name.map(|n| n.trim().to_string()),
        description: payload.description,
        price: payload.price,
        category: payload.category.map(|c| c.trim().to_string()),
        is_available: payload.is_available,
    };
    let item = menu_item::update(&state.pool, id, data)
        .await
        .map_err(|e| match e {
            crate::db::repository::RepoError::NotFound(_) => not_found(id),
            other => other.into(),
        })?;
    Ok(ok(item))
}

/// DELETE /api/menu/{id} - marks the item unavailable, history keeps it
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<bool>>> {
    if !menu_item::mark_unavailable(&state.pool, id).await? {
        return Err(not_found(id));
    }
    tracing::info!(menu_item_id = id, "Menu item marked unavailable");
    Ok(ok_with_message(true, "Menu item marked unavailable"))
}
