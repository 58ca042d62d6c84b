//! Reservation Model

use serde::{Deserialize, Serialize};

/// Reservation status
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum ReservationStatus {
    #[default]
    Confirmed,
    Cancelled,
}

/// Table reservation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Reservation {
    pub id: i64,
    pub table_id: i64,
    pub customer_name: String,
    pub phone: String,
    pub party_size: i32,
    /// Reserved time (epoch millis)
    pub reserved_for: i64,
    pub special_requests: Option<String>,
    pub status: ReservationStatus,
    pub created_at: i64,
}

/// Create reservation payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationCreate {
    pub table_id: i64,
    pub customer_name: String,
    pub phone: String,
    pub party_size: i32,
    pub reserved_for: i64,
    pub special_requests: Option<String>,
}
