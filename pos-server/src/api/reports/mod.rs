//! Reports API
//!
//! Every endpoint takes an optional `date=YYYY-MM-DD` (business timezone),
//! defaulting to today.

use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};
use chrono::NaiveDate;
use serde::Deserialize;
use shared::models::{DashboardStats, HourlySales, StatusCount, TypeCount};

use crate::core::ServerState;
use crate::utils::time::{parse_date, today};
use crate::utils::{ApiResponse, AppResult, ok};

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/reports", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/dashboard", get(dashboard))
        .route("/hourly-sales", get(hourly_sales))
        .route("/status-counts", get(status_counts))
        .route("/type-counts", get(type_counts))
}

#[derive(Debug, Default, Deserialize)]
pub struct DateQuery {
    pub date: Option<String>,
}

impl DateQuery {
    fn resolve(&self, state: &ServerState) -> AppResult<NaiveDate> {
        match self.date.as_deref() {
            Some(date) => parse_date(date),
            None => Ok(today(state.reports.timezone())),
        }
    }
}

/// GET /api/reports/dashboard
pub async fn dashboard(
    State(state): State<ServerState>,
    Query(query): Query<DateQuery>,
) -> AppResult<Json<ApiResponse<DashboardStats>>> {
    let date = query.resolve(&state)?;
    Ok(ok(state.reports.dashboard(date).await?))
}

/// GET /api/reports/hourly-sales
pub async fn hourly_sales(
    State(state): State<ServerState>,
    Query(query): Query<DateQuery>,
) -> AppResult<Json<ApiResponse<Vec<HourlySales>>>> {
    let date = query.resolve(&state)?;
    Ok(ok(state.reports.hourly_sales(date).await?))
}

/// GET /api/reports/status-counts
pub async fn status_counts(
    State(state): State<ServerState>,
    Query(query): Query<DateQuery>,
) -> AppResult<Json<ApiResponse<Vec<StatusCount>>>> {
    let date = query.resolve(&state)?;
    Ok(ok(state.reports.status_counts(date).await?))
}

/// GET /api/reports/type-counts
pub async fn type_counts(
    State(state): State<ServerState>,
    Query(query): Query<DateQuery>,
) -> AppResult<Json<ApiResponse<Vec<TypeCount>>>> {
    let date = query.resolve(&state)?;
    Ok(ok(state.reports.type_counts(date).await?))
}
