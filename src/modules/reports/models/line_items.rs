// Line-item record families shared by every report shape and every exporter.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One calendar day in a gap-free daily sales series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySales {
    pub date: NaiveDate,
    pub total_amount: Decimal,
    pub order_count: i64,
}

/// One ranked product in a top-N list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSales {
    pub product_id: i64,
    pub product_name: String,
    pub sku: Option<String>,
    pub quantity_sold: i64,
    pub revenue: Decimal,
}

/// One ranked customer in a top-N list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerSales {
    pub customer_id: i64,
    pub customer_name: String,
    pub order_count: i64,
    pub total_amount: Decimal,
}

/// Stock health, a pure function of (current stock, minimum stock)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StockStatus {
    Normal,
    Low,
    OutOfStock,
}

impl StockStatus {
    /// `OutOfStock` iff stock is zero; `Low` iff 0 < stock <= minimum
    /// (boundary inclusive); otherwise `Normal`.
    pub fn of(current_stock: i32, minimum_stock: i32) -> Self {
        if current_stock == 0 {
            StockStatus::OutOfStock
        } else if current_stock <= minimum_stock {
            StockStatus::Low
        } else {
            StockStatus::Normal
        }
    }
}

impl std::fmt::Display for StockStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StockStatus::Normal => write!(f, "Normal"),
            StockStatus::Low => write!(f, "Low"),
            StockStatus::OutOfStock => write!(f, "Out of Stock"),
        }
    }
}

/// Per-category stock rollup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryInventory {
    pub category_id: i64,
    pub category_name: String,
    pub product_count: i64,
    pub stock_count: i64,
    pub stock_value: Decimal,
}

/// Per-product inventory line with derived stock value and status
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductInventory {
    pub product_id: i64,
    pub product_name: String,
    pub sku: Option<String>,
    pub stock_quantity: i32,
    pub minimum_stock: i32,
    pub unit_price: Decimal,
    pub stock_value: Decimal,
    pub status: StockStatus,
}

/// One month of revenue with period-over-period growth
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyRevenue {
    pub year: i32,
    pub month: u32,
    pub revenue: Decimal,
    pub transaction_count: i64,
    /// Growth vs the immediately preceding month in the same sequence.
    /// Zero for the first month or when the preceding revenue is zero.
    pub growth_percent: Decimal,
}

impl MonthlyRevenue {
    pub fn month_name(&self) -> &'static str {
        match self.month {
            1 => "January",
            2 => "February",
            3 => "March",
            4 => "April",
            5 => "May",
            6 => "June",
            7 => "July",
            8 => "August",
            9 => "September",
            10 => "October",
            11 => "November",
            _ => "December",
        }
    }
}

/// Completed-sale revenue grouped by resolved category name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRevenue {
    pub category_name: String,
    pub revenue: Decimal,
    pub transaction_count: i64,
}

/// Completed-sale revenue grouped by payment method
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentMethodRevenue {
    pub payment_method: String,
    pub revenue: Decimal,
    pub transaction_count: i64,
}
