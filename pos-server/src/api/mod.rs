//! HTTP API
//!
//! One module per resource, each exposing `router()`:
//!
//! - [`health`] - liveness and database ping
//! - [`menu`] - menu items
//! - [`cart`] - session carts and order submission
//! - [`orders`] - order details, listing and status changes
//! - [`kitchen`] - kitchen display feed
//! - [`tables`] - dining tables
//! - [`reservations`] - table reservations
//! - [`reports`] - sales figures

pub mod cart;
pub mod health;
pub mod kitchen;
pub mod menu;
pub mod orders;
pub mod reports;
pub mod reservations;
pub mod tables;

use std::str::FromStr;
use std::time::Duration;

use axum::{Router, middleware};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::core::ServerState;
use crate::middleware::logging_middleware;
use crate::utils::{AppError, AppResult};

/// Full application router with middleware, ready to serve
pub fn build_app(state: ServerState) -> Router {
    let timeout = Duration::from_millis(state.config.request_timeout_ms);

    Router::<ServerState>::new()
        .merge(health::router())
        .merge(menu::router())
        .merge(cart::router())
        .merge(orders::router())
        .merge(kitchen::router())
        .merge(tables::router())
        .merge(reservations::router())
        .merge(reports::router())
        .fallback(fallback)
        .with_state(state)
        .layer(middleware::from_fn(logging_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(timeout))
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}

async fn fallback() -> AppError {
    AppError::not_found("Route")
}

/// Parse an enum sent as a string, reporting the offending field
pub(crate) fn parse_field<T>(field: &str, value: &str) -> AppResult<T>
where
    T: FromStr<Err = String>,
{
    value
        .parse()
        .map_err(|e: String| AppError::validation(e).with_detail("field", field.to_string()))
}
