//! CSV rendering. Deliberately summary-only: a `Metric,Value` table of
//! the report's headline figures, with no detail rows and no charts.

use crate::core::{AppError, Result};
use crate::modules::export::services::format;
use crate::modules::reports::models::Report;

fn csv_err<E: std::fmt::Display>(e: E) -> AppError {
    AppError::render(format!("CSV generation failed: {}", e))
}

/// CSV formatter over the canonical report
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvExporter;

impl CsvExporter {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, report: &Report) -> Result<Vec<u8>> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(["Metric", "Value"]).map_err(csv_err)?;

        for (metric, value) in self.rows(report) {
            writer.write_record([metric.as_str(), value.as_str()]).map_err(csv_err)?;
        }

        writer.into_inner().map_err(csv_err)
    }

    fn rows(&self, report: &Report) -> Vec<(String, String)> {
        match report {
            Report::Sales(r) => vec![
                ("Total Sales".into(), format::currency(r.summary.total_sales)),
                ("Total Orders".into(), r.summary.total_orders.to_string()),
                (
                    "Average Order Value".into(),
                    format::currency(r.summary.average_order_value),
                ),
                ("Start Date".into(), r.start_date.format("%Y-%m-%d").to_string()),
                ("End Date".into(), r.end_date.format("%Y-%m-%d").to_string()),
            ],
            Report::Custom(r) => vec![
                ("Total Sales".into(), format::currency(r.summary.total_sales)),
                ("Total Orders".into(), r.summary.total_orders.to_string()),
                (
                    "Average Order Value".into(),
                    format::currency(r.summary.average_order_value),
                ),
                ("Start Date".into(), r.start_date.format("%Y-%m-%d").to_string()),
                ("End Date".into(), r.end_date.format("%Y-%m-%d").to_string()),
            ],
            Report::Inventory(r) => vec![
                ("Products".into(), r.summary.product_count.to_string()),
                (
                    "Total Stock Value".into(),
                    format::currency(r.summary.total_stock_value),
                ),
                ("Low Stock".into(), r.summary.low_stock_count.to_string()),
                ("Out of Stock".into(), r.summary.out_of_stock_count.to_string()),
                ("As Of".into(), r.as_of.format("%Y-%m-%d %H:%M UTC").to_string()),
            ],
            Report::Financial(r) => vec![
                ("Year".into(), r.year.to_string()),
                (
                    "Total Revenue".into(),
                    format::currency(r.summary.total_revenue),
                ),
                (
                    "Total Transactions".into(),
                    r.summary.total_transactions.to_string(),
                ),
                (
                    "Average Monthly Revenue".into(),
                    format::currency(r.summary.average_monthly_revenue),
                ),
            ],
        }
    }
}
