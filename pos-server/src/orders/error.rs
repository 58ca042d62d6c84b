//! Domain errors for carts, orders, tables and reservations

use std::fmt;

use shared::error::{AppError, ErrorCode};
use shared::models::OrderStatus;
use thiserror::Error;

use crate::db::repository::RepoError;

/// What a [`OrderError::NotFound`] was looking for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Order,
    Table,
    MenuItem,
    CartLine,
    Reservation,
}

impl Resource {
    fn code(&self) -> ErrorCode {
        match self {
            Self::Order => ErrorCode::OrderNotFound,
            Self::Table => ErrorCode::TableNotFound,
            Self::MenuItem => ErrorCode::MenuItemNotFound,
            Self::CartLine => ErrorCode::CartItemNotFound,
            Self::Reservation => ErrorCode::ReservationNotFound,
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Order => "Order",
            Self::Table => "Table",
            Self::MenuItem => "Menu item",
            Self::CartLine => "Cart item",
            Self::Reservation => "Reservation",
        })
    }
}

/// Why a mutation lost against the current state of a table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictKind {
    /// Held by another order
    TableOccupied,
    /// Orders (live or historical) reference the table
    TableHasOrders,
    /// Not in a status that allows the request
    TableNotAvailable,
    /// Table number taken
    TableExists,
}

impl ConflictKind {
    fn code(&self) -> ErrorCode {
        match self {
            Self::TableOccupied => ErrorCode::TableOccupied,
            Self::TableHasOrders => ErrorCode::TableHasOrders,
            Self::TableNotAvailable => ErrorCode::TableNotAvailable,
            Self::TableExists => ErrorCode::TableAlreadyExists,
        }
    }
}

#[derive(Debug, Error)]
pub enum OrderError {
    #[error("{0}")]
    Validation(String),

    #[error("Order has no items")]
    EmptyOrder,

    #[error("{resource} {id} not found")]
    NotFound { resource: Resource, id: i64 },

    #[error("Cannot change order status from {from} to {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },

    #[error("{message}")]
    Conflict { kind: ConflictKind, message: String },

    #[error("Order {0} already completed")]
    AlreadyCompleted(i64),

    #[error("Party of {party_size} exceeds capacity {capacity} of table {table_id}")]
    CapacityExceeded {
        table_id: i64,
        capacity: i32,
        party_size: i32,
    },

    #[error("Storage error: {0}")]
    Storage(String),
}

impl OrderError {
    pub fn not_found(resource: Resource, id: i64) -> Self {
        Self::NotFound { resource, id }
    }

    pub fn conflict(kind: ConflictKind, message: impl Into<String>) -> Self {
        Self::Conflict {
            kind,
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}

impl From<RepoError> for OrderError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::Validation(msg) => OrderError::Validation(msg),
            other => OrderError::Storage(other.to_string()),
        }
    }
}

impl From<sqlx::Error> for OrderError {
    fn from(err: sqlx::Error) -> Self {
        RepoError::from(err).into()
    }
}

impl From<OrderError> for AppError {
    fn from(err: OrderError) -> Self {
        let message = err.to_string();
        match err {
            OrderError::Validation(_) => AppError::validation(message),
            OrderError::EmptyOrder => AppError::new(ErrorCode::OrderEmpty),
            OrderError::NotFound { resource, id } => {
                AppError::with_message(resource.code(), message).with_detail("id", id)
            }
            OrderError::InvalidTransition { from, to } => {
                AppError::with_message(ErrorCode::InvalidStatusTransition, message)
                    .with_detail("from", from.as_str())
                    .with_detail("to", to.as_str())
            }
            OrderError::Conflict { kind, .. } => AppError::with_message(kind.code(), message),
            OrderError::AlreadyCompleted(id) => {
                AppError::with_message(ErrorCode::OrderAlreadyCompleted, message)
                    .with_detail("id", id)
            }
            OrderError::CapacityExceeded { .. } => {
                AppError::with_message(ErrorCode::TableCapacityExceeded, message)
            }
            OrderError::Storage(msg) => AppError::database(msg),
        }
    }
}
