//! Menu Item Model

use serde::{Deserialize, Serialize};

/// Menu item entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct MenuItem {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    /// Price in currency unit
    pub price: f64,
    pub category: String,
    pub is_available: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create menu item payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItemCreate {
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub category: String,
    pub is_available: Option<bool>,
}

/// Update menu item payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MenuItemUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub category: Option<String>,
    pub is_available: Option<bool>,
}
