//! Dining Table Model

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::order::OrderSummary;

/// Table occupancy status
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum TableStatus {
    #[default]
    Available,
    Occupied,
    Reserved,
}

impl TableStatus {
    pub const ALL: [TableStatus; 3] = [Self::Available, Self::Occupied, Self::Reserved];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Occupied => "occupied",
            Self::Reserved => "reserved",
        }
    }
}

impl fmt::Display for TableStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TableStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "available" => Ok(Self::Available),
            "occupied" => Ok(Self::Occupied),
            "reserved" => Ok(Self::Reserved),
            other => Err(format!("unknown table status: {other}")),
        }
    }
}

/// Dining table entity
///
/// `id` doubles as the table number printed on the floor plan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct DiningTable {
    pub id: i64,
    pub capacity: i32,
    pub location: Option<String>,
    pub table_type: Option<String>,
    pub notes: Option<String>,
    pub status: TableStatus,
    /// Order currently seated here (set iff status is occupied)
    pub current_order_id: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create dining table payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiningTableCreate {
    /// Explicit table number, next free number when absent
    pub number: Option<i64>,
    pub capacity: i32,
    pub location: Option<String>,
    pub table_type: Option<String>,
    pub notes: Option<String>,
}

/// Update dining table payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DiningTableUpdate {
    pub capacity: Option<i32>,
    pub location: Option<String>,
    pub table_type: Option<String>,
    pub notes: Option<String>,
}

/// Table with the order seated at it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableDetail {
    #[serde(flatten)]
    pub table: DiningTable,
    pub current_order: Option<OrderSummary>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_status_serde() {
        assert_eq!(
            serde_json::to_string(&TableStatus::Occupied).unwrap(),
            "\"occupied\""
        );
        let status: TableStatus = serde_json::from_str("\"reserved\"").unwrap();
        assert_eq!(status, TableStatus::Reserved);
    }

    #[test]
    fn test_table_status_from_str() {
        assert_eq!("Available".parse::<TableStatus>(), Ok(TableStatus::Available));
        assert!("broken".parse::<TableStatus>().is_err());
    }
}
