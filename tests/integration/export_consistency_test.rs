// Cross-format consistency: one canonical report rendered as PDF, XLSX,
// and CSV must carry the same numbers, and each rendering must be a
// well-formed file of its kind.

use chrono::{Duration, NaiveDate};
use rust_decimal_macros::dec;

use stocksight::modules::export::{CsvExporter, ExcelExporter, PdfExporter};
use stocksight::modules::reports::models::{
    CustomerSales, DailySales, FinancialReport, FinancialSummary, InventoryReport,
    InventorySummary, MonthlyRevenue, ProductSales, Report, SalesReport, SalesSummary,
};

fn sales_report() -> Report {
    let start = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
    let daily_sales: Vec<DailySales> = (0..30)
        .map(|i| DailySales {
            date: start + Duration::days(i),
            total_amount: dec!(50.00),
            order_count: 1,
        })
        .collect();

    Report::Sales(SalesReport {
        start_date: start,
        end_date: start + Duration::days(29),
        summary: SalesSummary {
            total_sales: dec!(1500.00),
            total_orders: 30,
            average_order_value: dec!(50.00),
        },
        daily_sales,
        top_products: vec![ProductSales {
            product_id: 1,
            product_name: "Americano".to_string(),
            sku: Some("AM-1".to_string()),
            quantity_sold: 30,
            revenue: dec!(1500.00),
        }],
        top_customers: vec![CustomerSales {
            customer_id: 1,
            customer_name: "Walk-in".to_string(),
            order_count: 30,
            total_amount: dec!(1500.00),
        }],
    })
}

fn empty_inventory_report() -> Report {
    Report::Inventory(InventoryReport {
        as_of: chrono::Utc::now(),
        summary: InventorySummary {
            product_count: 0,
            total_stock_value: dec!(0),
            low_stock_count: 0,
            out_of_stock_count: 0,
        },
        categories: vec![],
        products: vec![],
        low_stock: vec![],
    })
}

fn financial_report() -> Report {
    let monthly_revenue: Vec<MonthlyRevenue> = (1..=12u32)
        .map(|month| MonthlyRevenue {
            year: 2025,
            month,
            revenue: dec!(1000.00),
            transaction_count: 10,
            growth_percent: dec!(0.00),
        })
        .collect();

    Report::Financial(FinancialReport {
        year: 2025,
        summary: FinancialSummary {
            total_revenue: dec!(12000.00),
            total_transactions: 120,
            average_monthly_revenue: dec!(1000.00),
        },
        monthly_revenue,
        revenue_by_category: vec![],
        revenue_by_payment_method: vec![],
    })
}

#[test]
fn test_all_formats_render_the_same_sales_report() {
    let report = sales_report();

    let pdf = PdfExporter::new().render(&report).unwrap();
    let xlsx = ExcelExporter::new().render(&report).unwrap();
    let csv = CsvExporter::new().render(&report).unwrap();

    // PDF magic
    assert_eq!(&pdf[..5], b"%PDF-");
    // XLSX is a zip archive
    assert_eq!(&xlsx[..2], b"PK");

    // The CSV summary carries the exact same totals the report holds
    let text = String::from_utf8(csv).unwrap();
    assert!(text.contains("\"$1,500.00\""));
    assert!(text.contains("Total Orders,30"));
    assert!(text.contains("Average Order Value,$50.00"));
}

#[test]
fn test_csv_is_summary_only() {
    let csv = CsvExporter::new().render(&sales_report()).unwrap();
    let text = String::from_utf8(csv).unwrap();

    // Header plus exactly five summary rows, no detail lines
    assert_eq!(text.lines().count(), 6);
    assert!(!text.contains("Americano"));
    assert!(!text.contains("Walk-in"));
}

#[test]
fn test_empty_report_still_renders_every_format() {
    let report = empty_inventory_report();

    let pdf = PdfExporter::new().render(&report).unwrap();
    let xlsx = ExcelExporter::new().render(&report).unwrap();
    let csv = CsvExporter::new().render(&report).unwrap();

    assert_eq!(&pdf[..5], b"%PDF-");
    assert_eq!(&xlsx[..2], b"PK");

    let text = String::from_utf8(csv).unwrap();
    assert!(text.starts_with("Metric,Value"));
    assert!(text.contains("Products,0"));
    assert!(text.contains("Total Stock Value,$0.00"));
}

#[test]
fn test_financial_report_renders_all_formats() {
    let report = financial_report();

    assert!(!PdfExporter::new().render(&report).unwrap().is_empty());
    assert!(!ExcelExporter::new().render(&report).unwrap().is_empty());

    let csv = CsvExporter::new().render(&report).unwrap();
    let text = String::from_utf8(csv).unwrap();
    assert!(text.contains("\"$12,000.00\""));
    assert!(text.contains("Total Transactions,120"));
    assert!(text.contains("Year,2025"));
}
