//! Unified error codes for the POS server
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 4xxx: Order errors
//! - 5xxx: Payment errors
//! - 6xxx: Menu errors
//! - 7xxx: Table errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values so clients can switch on
/// them without parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,

    // ==================== 4xxx: Order ====================
    /// Order not found
    OrderNotFound = 4001,
    /// Order has no items
    OrderEmpty = 4002,
    /// Order already completed
    OrderAlreadyCompleted = 4003,
    /// Status transition not allowed
    InvalidStatusTransition = 4004,
    /// Cart line not found
    CartItemNotFound = 4006,

    // ==================== 5xxx: Payment ====================
    /// Unsupported payment method
    PaymentInvalidMethod = 5001,

    // ==================== 6xxx: Menu ====================
    /// Menu item not found
    MenuItemNotFound = 6001,

    // ==================== 7xxx: Table ====================
    /// Table not found
    TableNotFound = 7001,
    /// Table is held by another order
    TableOccupied = 7002,
    /// Table is referenced by orders
    TableHasOrders = 7003,
    /// Table not available
    TableNotAvailable = 7004,
    /// Table number already exists
    TableAlreadyExists = 7005,
    /// Reservation not found
    ReservationNotFound = 7006,
    /// Party does not fit the table
    TableCapacityExceeded = 7007,

    // ==================== 9xxx: System ====================
    /// Database error
    DatabaseError = 9002,
    /// Configuration error
    ConfigError = 9003,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    /// Get the default English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            Self::Success => "Success",
            Self::ValidationFailed => "Validation failed",
            Self::NotFound => "Resource not found",
            Self::AlreadyExists => "Resource already exists",

            // Order
            Self::OrderNotFound => "Order not found",
            Self::OrderEmpty => "Order has no items",
            Self::OrderAlreadyCompleted => "Order already completed",
            Self::InvalidStatusTransition => "Order status transition not allowed",
            Self::CartItemNotFound => "Item not in cart",

            // Payment
            Self::PaymentInvalidMethod => "Invalid payment method",

            // Menu
            Self::MenuItemNotFound => "Menu item not found",

            // Table
            Self::TableNotFound => "Table not found",
            Self::TableOccupied => "Table is occupied by another order",
            Self::TableHasOrders => "Table has orders",
            Self::TableNotAvailable => "Table is not available",
            Self::TableAlreadyExists => "Table number already exists",
            Self::ReservationNotFound => "Reservation not found",
            Self::TableCapacityExceeded => "Party size exceeds table capacity",

            // System
            Self::DatabaseError => "Database error",
            Self::ConfigError => "Configuration error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code as u16
    }
}

/// Error returned when a u16 does not name a known [`ErrorCode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(Self::Success),
            2 => Ok(Self::ValidationFailed),
            3 => Ok(Self::NotFound),
            4 => Ok(Self::AlreadyExists),

            // Order
            4001 => Ok(Self::OrderNotFound),
            4002 => Ok(Self::OrderEmpty),
            4003 => Ok(Self::OrderAlreadyCompleted),
            4004 => Ok(Self::InvalidStatusTransition),
            4006 => Ok(Self::CartItemNotFound),

            // Payment
            5001 => Ok(Self::PaymentInvalidMethod),

            // Menu
            6001 => Ok(Self::MenuItemNotFound),

            // Table
            7001 => Ok(Self::TableNotFound),
            7002 => Ok(Self::TableOccupied),
            7003 => Ok(Self::TableHasOrders),
            7004 => Ok(Self::TableNotAvailable),
            7005 => Ok(Self::TableAlreadyExists),
            7006 => Ok(Self::ReservationNotFound),
            7007 => Ok(Self::TableCapacityExceeded),

            // System
            9002 => Ok(Self::DatabaseError),
            9003 => Ok(Self::ConfigError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
