//! Dining Table API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;
use shared::models::{
    CustomerInfo, DiningTable, DiningTableCreate, DiningTableUpdate, OrderType, SubmittedOrder,
    TableDetail, TableStatus,
};
use validator::Validate;

use crate::api::parse_field;
use crate::core::ServerState;
use crate::orders::SubmitRequest;
use crate::utils::{ApiResponse, AppResult, ok, ok_with_message, validate};

/// Customer name used when a table is seated without one
const WALK_IN_CUSTOMER: &str = "Walk-in Customer";

#[derive(Debug, Deserialize, Validate)]
pub struct CreateTableRequest {
    /// Table number, next free number when omitted
    #[validate(range(min = 1))]
    pub number: Option<i64>,
    #[validate(range(min = 1, max = 50))]
    pub capacity: i32,
    #[validate(length(max = 50))]
    pub location: Option<String>,
    #[validate(length(max = 50))]
    pub table_type: Option<String>,
    #[validate(length(max = 200))]
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateTableRequest {
    #[validate(range(min = 1, max = 50))]
    pub capacity: Option<i32>,
    #[validate(length(max = 50))]
    pub location: Option<String>,
    #[validate(length(max = 50))]
    pub table_type: Option<String>,
    #[validate(length(max = 200))]
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    /// available | reserved
    pub status: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct AssignOrderRequest {
    #[validate(length(min = 1, max = 128))]
    pub session_id: String,
    #[validate(length(max = 100))]
    pub customer_name: Option<String>,
    #[validate(length(max = 500))]
    pub notes: Option<String>,
}

/// GET /api/tables
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<ApiResponse<Vec<DiningTable>>>> {
    let tables = state.tables.list().await?;
    Ok(ok(tables))
}

/// GET /api/tables/{id} - table with the order seated at it
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<TableDetail>>> {
    let detail = state.tables.details(id).await?;
    Ok(ok(detail))
}

/// POST /api/tables
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<CreateTableRequest>,
) -> AppResult<Json<ApiResponse<DiningTable>>> {
    validate(&payload)?;
    let table = state
        .tables
        .create(DiningTableCreate {
            number: payload.number,
            capacity: payload.capacity,
            location: payload.location,
            table_type: payload.table_type,
            notes: payload.notes,
        })
        .await?;
    Ok(ok_with_message(table, "Table created"))
}

/// PUT /api/tables/{id}
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateTableRequest>,
) -> AppResult<Json<ApiResponse<DiningTable>>> {
    validate(&payload)?;
    let table = state
        .tables
        .update(
            id,
            DiningTableUpdate {
                capacity: payload.capacity,
                location: payload.location,
                table_type: payload.table_type,
                notes: payload.notes,
            },
        )
        .await?;
    Ok(ok(table))
}

/// DELETE /api/tables/{id} - only tables without order history
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<bool>>> {
    state.tables.delete(id).await?;
    Ok(ok_with_message(true, "Table deleted"))
}

/// POST /api/tables/{id}/status
pub async fn set_status(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<StatusRequest>,
) -> AppResult<Json<ApiResponse<DiningTable>>> {
    let status = parse_field::<TableStatus>("status", &payload.status)?;
    let table = state.tables.set_status(id, status).await?;
    Ok(ok(table))
}

/// POST /api/tables/{id}/free
pub async fn free(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<DiningTable>>> {
    let table = state.tables.free(id).await?;
    Ok(ok_with_message(table, "Table freed"))
}

/// POST /api/tables/{id}/assign - seat the session cart at this table
pub async fn assign_order(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<AssignOrderRequest>,
) -> AppResult<Json<ApiResponse<SubmittedOrder>>> {
    validate(&payload)?;
    let customer_name = payload
        .customer_name
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| WALK_IN_CUSTOMER.to_string());
    let request = SubmitRequest {
        order_type: OrderType::DineIn,
        customer: CustomerInfo {
            name: Some(customer_name),
            ..Default::default()
        },
        table_id: Some(id),
        notes: payload.notes,
    };
    let submitted = state
        .carts
        .submit(&payload.session_id, &state.lifecycle, request)
        .await?;
    Ok(ok_with_message(submitted, format!("Order seated at table {id}")))
}
