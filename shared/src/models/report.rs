//! Reporting Models

use serde::{Deserialize, Serialize};

use super::dining_table::TableStatus;
use super::order::{OrderStatus, OrderType};

/// Completed sales for one hour of the business day
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HourlySales {
    /// Hour of day (0-23) in the business timezone
    pub hour: u32,
    pub order_count: i64,
    pub total_sales: f64,
}

/// Number of orders in one status
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatusCount {
    pub status: OrderStatus,
    pub count: i64,
}

/// Number of orders of one type
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TypeCount {
    pub order_type: OrderType,
    pub count: i64,
}

/// Number of tables in one status
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TableStatusCount {
    pub status: TableStatus,
    pub count: i64,
}

/// Best-selling menu item of a day
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct TopItem {
    pub menu_item_id: i64,
    pub name: String,
    pub quantity: i64,
    pub revenue: f64,
}

/// Dashboard figures for one business day
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DashboardStats {
    /// Business date (YYYY-MM-DD)
    pub date: String,
    pub total_sales: f64,
    /// Percentage change against the previous day, None when yesterday had no sales
    pub sales_change_pct: Option<f64>,
    pub completed_orders: i64,
    pub average_order_value: f64,
    pub top_item: Option<TopItem>,
    /// Hour with the highest completed sales
    pub peak_hour: Option<u32>,
    pub status_counts: Vec<StatusCount>,
    pub type_counts: Vec<TypeCount>,
    pub table_counts: Vec<TableStatusCount>,
}
