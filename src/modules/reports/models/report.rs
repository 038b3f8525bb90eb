// Canonical report shapes. Built once per request by the assembler,
// immutable afterwards, and consumed unchanged by the JSON view and by
// every export formatter so all renderings stay numerically identical.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::line_items::{
    CategoryInventory, CategoryRevenue, CustomerSales, DailySales, MonthlyRevenue,
    PaymentMethodRevenue, ProductInventory, ProductSales,
};

/// The four report families served by this service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportType {
    Sales,
    Inventory,
    Financial,
    Custom,
}

impl ReportType {
    /// Capitalized name used in titles and export filenames
    pub fn display_name(&self) -> &'static str {
        match self {
            ReportType::Sales => "Sales",
            ReportType::Inventory => "Inventory",
            ReportType::Financial => "Financial",
            ReportType::Custom => "Custom",
        }
    }
}

impl std::fmt::Display for ReportType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportType::Sales => write!(f, "sales"),
            ReportType::Inventory => write!(f, "inventory"),
            ReportType::Financial => write!(f, "financial"),
            ReportType::Custom => write!(f, "custom"),
        }
    }
}

impl std::str::FromStr for ReportType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "sales" => Ok(ReportType::Sales),
            "inventory" => Ok(ReportType::Inventory),
            "financial" => Ok(ReportType::Financial),
            "custom" => Ok(ReportType::Custom),
            _ => Err(format!("Invalid report type: {}", s)),
        }
    }
}

/// Requested download format; absent means the JSON view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    Pdf,
    Excel,
    Csv,
}

impl ReportFormat {
    pub fn mime_type(&self) -> &'static str {
        match self {
            ReportFormat::Pdf => "application/pdf",
            ReportFormat::Excel => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
            ReportFormat::Csv => "text/csv",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Pdf => "pdf",
            ReportFormat::Excel => "xlsx",
            ReportFormat::Csv => "csv",
        }
    }
}

impl std::fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportFormat::Pdf => write!(f, "pdf"),
            ReportFormat::Excel => write!(f, "excel"),
            ReportFormat::Csv => write!(f, "csv"),
        }
    }
}

impl std::str::FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "pdf" => Ok(ReportFormat::Pdf),
            "excel" | "xlsx" => Ok(ReportFormat::Excel),
            "csv" => Ok(ReportFormat::Csv),
            _ => Err(format!("Invalid report format: {}", s)),
        }
    }
}

/// Scalar summary of a sales-shaped report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesSummary {
    pub total_sales: Decimal,
    pub total_orders: i64,
    pub average_order_value: Decimal,
}

/// Scalar summary of an inventory snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventorySummary {
    pub product_count: i64,
    pub total_stock_value: Decimal,
    pub low_stock_count: i64,
    pub out_of_stock_count: i64,
}

/// Scalar summary of a financial year report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialSummary {
    pub total_revenue: Decimal,
    pub total_transactions: i64,
    pub average_monthly_revenue: Decimal,
}

/// Sales over a date range: daily series plus top-N rankings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalesReport {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub summary: SalesSummary,
    pub daily_sales: Vec<DailySales>,
    pub top_products: Vec<ProductSales>,
    pub top_customers: Vec<CustomerSales>,
}

/// Inventory snapshot: category rollup and per-product stock lines
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryReport {
    pub as_of: DateTime<Utc>,
    pub summary: InventorySummary,
    pub categories: Vec<CategoryInventory>,
    pub products: Vec<ProductInventory>,
    pub low_stock: Vec<ProductInventory>,
}

/// Financial year: monthly revenue with growth plus revenue rollups
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinancialReport {
    pub year: i32,
    pub summary: FinancialSummary,
    pub monthly_revenue: Vec<MonthlyRevenue>,
    pub revenue_by_category: Vec<CategoryRevenue>,
    pub revenue_by_payment_method: Vec<PaymentMethodRevenue>,
}

/// Entity filters applied by a custom report
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportFilters {
    pub categories: Vec<i64>,
    pub products: Vec<i64>,
    pub customers: Vec<i64>,
}

impl ReportFilters {
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty() && self.products.is_empty() && self.customers.is_empty()
    }
}

/// Sales-shaped report over a filtered entity subset
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomReport {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub filters: ReportFilters,
    pub include_details: bool,
    pub summary: SalesSummary,
    pub daily_sales: Vec<DailySales>,
    pub top_products: Vec<ProductSales>,
    pub top_customers: Vec<CustomerSales>,
}

/// The canonical, format-agnostic report consumed by every exporter
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "report_type", content = "data", rename_all = "lowercase")]
pub enum Report {
    Sales(SalesReport),
    Inventory(InventoryReport),
    Financial(FinancialReport),
    Custom(CustomReport),
}

impl Report {
    pub fn report_type(&self) -> ReportType {
        match self {
            Report::Sales(_) => ReportType::Sales,
            Report::Inventory(_) => ReportType::Inventory,
            Report::Financial(_) => ReportType::Financial,
            Report::Custom(_) => ReportType::Custom,
        }
    }

    pub fn title(&self) -> String {
        format!("{} Report", self.report_type().display_name())
    }

    /// Headline monetary aggregate, recorded in the metadata audit trail
    pub fn total_amount(&self) -> Decimal {
        match self {
            Report::Sales(r) => r.summary.total_sales,
            Report::Inventory(r) => r.summary.total_stock_value,
            Report::Financial(r) => r.summary.total_revenue,
            Report::Custom(r) => r.summary.total_sales,
        }
    }

    /// Number of detail line items across all sequences
    pub fn row_count(&self) -> i64 {
        match self {
            Report::Sales(r) => {
                (r.daily_sales.len() + r.top_products.len() + r.top_customers.len()) as i64
            }
            Report::Inventory(r) => (r.categories.len() + r.products.len()) as i64,
            Report::Financial(r) => {
                (r.monthly_revenue.len()
                    + r.revenue_by_category.len()
                    + r.revenue_by_payment_method.len()) as i64
            }
            Report::Custom(r) => {
                (r.daily_sales.len() + r.top_products.len() + r.top_customers.len()) as i64
            }
        }
    }

    /// Date range covered, when the shape has one (inventory is a snapshot)
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        match self {
            Report::Sales(r) => Some((r.start_date, r.end_date)),
            Report::Custom(r) => Some((r.start_date, r.end_date)),
            Report::Financial(r) => {
                let start = NaiveDate::from_ymd_opt(r.year, 1, 1)?;
                let end = NaiveDate::from_ymd_opt(r.year, 12, 31)?;
                Some((start, end))
            }
            Report::Inventory(_) => None,
        }
    }
}
