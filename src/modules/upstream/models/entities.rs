// Raw entities as served by the collaborator services. These are wire
// shapes, not report shapes: the aggregation engine owns all derived values.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Lifecycle of a sale as reported by the sales service.
/// Only `Completed` sales contribute to financial aggregates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaleStatus {
    Pending,
    Completed,
    Cancelled,
}

impl std::fmt::Display for SaleStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SaleStatus::Pending => write!(f, "pending"),
            SaleStatus::Completed => write!(f, "completed"),
            SaleStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl std::str::FromStr for SaleStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "pending" => Ok(SaleStatus::Pending),
            "completed" => Ok(SaleStatus::Completed),
            "cancelled" => Ok(SaleStatus::Cancelled),
            _ => Err(format!("Invalid sale status: {}", s)),
        }
    }
}

/// One line of a sale
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleItem {
    pub product_id: i64,
    #[serde(default)]
    pub product_name: Option<String>,
    pub quantity: i32,
    pub unit_price: Decimal,
    #[serde(default)]
    pub discount: Decimal,
}

impl SaleItem {
    /// Net amount for this line: (unit price - discount) x quantity
    pub fn net_amount(&self) -> Decimal {
        (self.unit_price - self.discount) * Decimal::from(self.quantity)
    }
}

/// A sale record fetched from the sales service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sale {
    pub id: i64,
    #[serde(default)]
    pub customer_id: Option<i64>,
    #[serde(default)]
    pub customer_name: Option<String>,
    pub sale_date: DateTime<Utc>,
    pub total_amount: Decimal,
    pub status: SaleStatus,
    #[serde(default = "default_payment_method")]
    pub payment_method: String,
    #[serde(default)]
    pub items: Vec<SaleItem>,
}

fn default_payment_method() -> String {
    "Unknown".to_string()
}

/// A catalog product
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub sku: Option<String>,
    pub price: Decimal,
    pub stock_quantity: i32,
    #[serde(default)]
    pub minimum_stock: i32,
    #[serde(default)]
    pub category_id: Option<i64>,
    #[serde(default)]
    pub category_name: Option<String>,
}

/// A customer record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// A product category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

/// Paginated envelope returned by every collaborator list endpoint.
/// Only `items` matters for aggregation; pagination metadata is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct Paged<T> {
    pub items: Vec<T>,
    #[serde(default)]
    pub total: i64,
    #[serde(default)]
    pub page: i64,
    #[serde(default)]
    pub page_size: i64,
}
