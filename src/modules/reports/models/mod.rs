mod line_items;
mod metadata;
mod report;
mod request;

pub use line_items::{
    CategoryInventory, CategoryRevenue, CustomerSales, DailySales, MonthlyRevenue,
    PaymentMethodRevenue, ProductInventory, ProductSales, StockStatus,
};
pub use metadata::{ReportMetadata, ReportStatus};
pub use report::{
    CustomReport, FinancialReport, FinancialSummary, InventoryReport, InventorySummary, Report,
    ReportFilters, ReportFormat, ReportType, SalesReport, SalesSummary,
};
pub use request::ReportRequest;
