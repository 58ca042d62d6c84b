//! Reservations API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;
use shared::models::{Reservation, ReservationCreate};
use validator::Validate;

use crate::core::ServerState;
use crate::utils::{ApiResponse, AppResult, ok, ok_with_message, validate};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateReservationRequest {
    pub table_id: i64,
    #[validate(length(min = 1, max = 100))]
    pub customer_name: String,
    #[validate(length(min = 1, max = 30))]
    pub phone: String,
    #[validate(range(min = 1, max = 50))]
    pub party_size: i32,
    /// Reserved time (epoch millis)
    pub reserved_for: i64,
    #[validate(length(max = 500))]
    pub special_requests: Option<String>,
}

/// GET /api/reservations - confirmed, soonest first
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<ApiResponse<Vec<Reservation>>>> {
    let reservations = state.reservations.list().await?;
    Ok(ok(reservations))
}

/// POST /api/reservations
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<CreateReservationRequest>,
) -> AppResult<Json<ApiResponse<Reservation>>> {
    validate(&payload)?;
    let reservation = state
        .reservations
        .create(ReservationCreate {
            table_id: payload.table_id,
            customer_name: payload.customer_name,
            phone: payload.phone,
            party_size: payload.party_size,
            reserved_for: payload.reserved_for,
            special_requests: payload.special_requests,
        })
        .await?;
    Ok(ok_with_message(reservation, "Reservation created"))
}

/// POST /api/reservations/{id}/cancel
pub async fn cancel(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<Reservation>>> {
    let reservation = state.reservations.cancel(id).await?;
    Ok(ok_with_message(reservation, "Reservation cancelled"))
}
