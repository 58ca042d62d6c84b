//! Order Model

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Order lifecycle status
///
/// `pending -> preparing -> ready -> completed`, with `cancelled`
/// reachable from `pending` and `preparing`. `completed` and `cancelled`
/// are terminal.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum OrderStatus {
    #[default]
    Pending,
    Preparing,
    Ready,
    Completed,
    Cancelled,
}

impl OrderStatus {
    /// Statuses shown on the kitchen display, in queue order
    pub const ACTIVE: [OrderStatus; 3] = [Self::Pending, Self::Preparing, Self::Ready];

    pub const ALL: [OrderStatus; 5] = [
        Self::Pending,
        Self::Preparing,
        Self::Ready,
        Self::Completed,
        Self::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Preparing => "preparing",
            Self::Ready => "ready",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// Whether `self -> next` is an edge of the lifecycle graph.
    ///
    /// Self-transitions are not edges.
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Preparing)
                | (Self::Preparing, Self::Ready)
                | (Self::Ready, Self::Completed)
                | (Self::Pending, Self::Cancelled)
                | (Self::Preparing, Self::Cancelled)
        )
    }

    /// Sort rank used by order listings (lower first)
    pub fn priority(&self) -> u8 {
        match self {
            Self::Pending => 1,
            Self::Preparing => 2,
            Self::Ready => 3,
            Self::Completed => 4,
            Self::Cancelled => 5,
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "preparing" => Ok(Self::Preparing),
            "ready" => Ok(Self::Ready),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(format!("unknown order status: {other}")),
        }
    }
}

/// How the order leaves the kitchen
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "kebab-case"))]
pub enum OrderType {
    #[default]
    DineIn,
    Takeaway,
    Delivery,
}

impl OrderType {
    pub const ALL: [OrderType; 3] = [Self::DineIn, Self::Takeaway, Self::Delivery];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DineIn => "dine-in",
            Self::Takeaway => "takeaway",
            Self::Delivery => "delivery",
        }
    }
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dine-in" | "dinein" | "dine_in" => Ok(Self::DineIn),
            "takeaway" => Ok(Self::Takeaway),
            "delivery" => Ok(Self::Delivery),
            other => Err(format!("unknown order type: {other}")),
        }
    }
}

/// Payment method recorded when an order is paid
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum PaymentMethod {
    Cash,
    Card,
    Online,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cash => "cash",
            Self::Card => "card",
            Self::Online => "online",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cash" => Ok(Self::Cash),
            "card" | "credit card" | "credit-card" => Ok(Self::Card),
            "online" => Ok(Self::Online),
            other => Err(format!("unknown payment method: {other}")),
        }
    }
}

/// Customer identity attached to an order
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CustomerInfo {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

/// Persisted order header
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Order {
    pub id: i64,
    pub order_number: String,
    pub order_type: OrderType,
    pub status: OrderStatus,
    /// Only dine-in orders carry a table
    pub table_id: Option<i64>,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub delivery_address: Option<String>,
    pub notes: Option<String>,
    /// Sum of line totals in currency unit
    pub total: f64,
    pub payment_method: Option<PaymentMethod>,
    pub created_at: i64,
    pub updated_at: i64,
    pub completed_at: Option<i64>,
}

/// Persisted order line (name and price are snapshots taken at add time)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct OrderItem {
    pub id: i64,
    pub order_id: i64,
    pub menu_item_id: i64,
    pub name: String,
    pub price: f64,
    pub quantity: i32,
    pub line_total: f64,
}

/// Order header with its lines
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderDetail {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItem>,
}

/// Compact order view used by table details
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct OrderSummary {
    pub id: i64,
    pub order_number: String,
    pub order_type: OrderType,
    pub status: OrderStatus,
    pub customer_name: Option<String>,
    pub total: f64,
    pub created_at: i64,
}

/// Result of a successful submission
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SubmittedOrder {
    pub order_id: i64,
    pub order_number: String,
    pub table_id: Option<i64>,
    pub total: f64,
}
