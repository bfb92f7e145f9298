//! Data types for products, depots and store statistics.

use inventroops_core::DepotStatus;
use serde::{Deserialize, Serialize};

/// A product row from the database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i64,
    pub sku: String,
    pub name: String,
    pub category: String,
    pub stock: i64,
    pub reorder_point: i64,
    pub supplier: String,
    pub price: f64,
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub daily_sales: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weekly_sales: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lead_time: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// A product that has not been stored yet. Also the body element of a bulk upload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub sku: String,
    pub name: String,
    pub category: String,
    pub stock: i64,
    pub reorder_point: i64,
    pub supplier: String,
    pub price: f64,
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub daily_sales: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weekly_sales: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lead_time: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl Default for NewProduct {
    fn default() -> Self {
        Self {
            sku: String::new(),
            name: String::new(),
            category: "Uncategorized".to_string(),
            stock: 0,
            reorder_point: 10,
            supplier: "Unknown".to_string(),
            price: 0.0,
            location: "Unknown".to_string(),
            daily_sales: None,
            weekly_sales: None,
            brand: None,
            lead_time: None,
            created_at: None,
        }
    }
}

/// A depot row from the database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Depot {
    pub id: i64,
    pub name: String,
    pub location: String,
    pub capacity: i64,
    pub current_utilization: i64,
    pub items_stored: i64,
    pub status: DepotStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manager: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// A depot document ready to be inserted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDepot {
    pub name: String,
    pub location: String,
    pub capacity: i64,
    pub current_utilization: i64,
    pub items_stored: i64,
    pub status: DepotStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manager: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Store-level statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreStats {
    pub tables: Vec<String>,
    pub total_products: i64,
    pub total_depots: i64,
    pub total_stock: i64,
    pub db_path: String,
    pub db_size_mb: f64,
}
