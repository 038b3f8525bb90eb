use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use tracing::{info, warn};

use crate::core::Result;
use crate::modules::reports::models::{
    CustomReport, FinancialReport, FinancialSummary, InventoryReport, InventorySummary, Report,
    ReportFilters, ReportRequest, ReportType, SalesReport, StockStatus,
};
use crate::modules::reports::services::aggregation;
use crate::modules::upstream::models::{Product, Sale};
use crate::modules::upstream::services::{DateRange, UpstreamDataSource};

use rust_decimal::Decimal;

/// Orchestrates one report generation pass: resolve the date range, fetch
/// the raw entities this report type needs (concurrently; an empty result
/// in one fetch never cancels the others), aggregate, and return the
/// canonical report. A missing upstream source degrades to zeroed
/// aggregates, never to a failed report.
pub struct ReportService {
    upstream: Arc<dyn UpstreamDataSource>,
    top_n: usize,
}

impl ReportService {
    pub fn new(upstream: Arc<dyn UpstreamDataSource>, top_n: usize) -> Self {
        Self { upstream, top_n }
    }

    /// Generate the requested report shape from a wire request
    pub async fn generate(&self, report_type: ReportType, request: &ReportRequest) -> Result<Report> {
        let today = Utc::now().date_naive();

        match report_type {
            ReportType::Sales => {
                let (start, end) = request.resolve_range(today)?;
                self.generate_sales(start, end).await
            }
            ReportType::Inventory => self.generate_inventory().await,
            ReportType::Financial => {
                let year = request.resolve_year(today)?;
                self.generate_financial(year).await
            }
            ReportType::Custom => {
                let (start, end) = request.resolve_range(today)?;
                self.generate_custom(start, end, request.filters(), request.include_details())
                    .await
            }
        }
    }

    pub async fn generate_sales(&self, start: NaiveDate, end: NaiveDate) -> Result<Report> {
        info!(start = %start, end = %end, "Generating sales report");

        let range = DateRange { start, end };
        let (sales, products, customers) = tokio::join!(
            self.upstream.fetch_sales(Some(range)),
            self.upstream.fetch_products(),
            self.upstream.fetch_customers(),
        );

        if sales.is_empty() {
            warn!(start = %start, end = %end, "No sales data available for report period");
        }

        let daily_sales = aggregation::daily_series(start, end, &sales);
        let summary = aggregation::sales_summary(&daily_sales);
        let top_products = aggregation::top_products(&sales, &products, self.top_n);
        let top_customers = aggregation::top_customers(&sales, &customers, self.top_n);

        Ok(Report::Sales(SalesReport {
            start_date: start,
            end_date: end,
            summary,
            daily_sales,
            top_products,
            top_customers,
        }))
    }

    pub async fn generate_inventory(&self) -> Result<Report> {
        info!("Generating inventory report");

        let (products, categories) = tokio::join!(
            self.upstream.fetch_products(),
            self.upstream.fetch_categories(),
        );

        let lines = aggregation::product_inventory(&products);
        let categories = aggregation::category_rollup(&categories, &products);

        let total_stock_value: Decimal = lines.iter().map(|l| l.stock_value).sum();
        let low_stock_count = lines
            .iter()
            .filter(|l| l.status == StockStatus::Low)
            .count() as i64;
        let out_of_stock_count = lines
            .iter()
            .filter(|l| l.status == StockStatus::OutOfStock)
            .count() as i64;
        let low_stock: Vec<_> = lines
            .iter()
            .filter(|l| l.status != StockStatus::Normal)
            .cloned()
            .collect();

        Ok(Report::Inventory(InventoryReport {
            as_of: Utc::now(),
            summary: InventorySummary {
                product_count: lines.len() as i64,
                total_stock_value,
                low_stock_count,
                out_of_stock_count,
            },
            categories,
            products: lines,
            low_stock,
        }))
    }

    pub async fn generate_financial(&self, year: i32) -> Result<Report> {
        info!(year, "Generating financial report");

        let range = DateRange {
            start: NaiveDate::from_ymd_opt(year, 1, 1).unwrap_or_default(),
            end: NaiveDate::from_ymd_opt(year, 12, 31).unwrap_or_default(),
        };
        let (sales, products, categories) = tokio::join!(
            self.upstream.fetch_sales(Some(range)),
            self.upstream.fetch_products(),
            self.upstream.fetch_categories(),
        );

        let monthly_revenue = aggregation::monthly_revenue(year, &sales);
        let total_revenue: Decimal = monthly_revenue.iter().map(|m| m.revenue).sum();
        let total_transactions: i64 = monthly_revenue.iter().map(|m| m.transaction_count).sum();
        let average_monthly_revenue = (total_revenue / Decimal::from(12)).round_dp(2);

        Ok(Report::Financial(FinancialReport {
            year,
            summary: FinancialSummary {
                total_revenue,
                total_transactions,
                average_monthly_revenue,
            },
            monthly_revenue,
            revenue_by_category: aggregation::revenue_by_category(&sales, &products, &categories),
            revenue_by_payment_method: aggregation::revenue_by_payment_method(&sales),
        }))
    }

    pub async fn generate_custom(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        filters: ReportFilters,
        include_details: bool,
    ) -> Result<Report> {
        info!(start = %start, end = %end, ?filters, "Generating custom report");

        let range = DateRange { start, end };
        let (sales, products, customers) = tokio::join!(
            self.upstream.fetch_sales(Some(range)),
            self.upstream.fetch_products(),
            self.upstream.fetch_customers(),
        );

        let sales = apply_filters(sales, &products, &filters);

        let daily_sales = aggregation::daily_series(start, end, &sales);
        let summary = aggregation::sales_summary(&daily_sales);
        let top_products = aggregation::top_products(&sales, &products, self.top_n);
        let top_customers = aggregation::top_customers(&sales, &customers, self.top_n);

        let (daily_sales, top_products, top_customers) = if include_details {
            (daily_sales, top_products, top_customers)
        } else {
            (Vec::new(), Vec::new(), Vec::new())
        };

        Ok(Report::Custom(CustomReport {
            start_date: start,
            end_date: end,
            filters,
            include_details,
            summary,
            daily_sales,
            top_products,
            top_customers,
        }))
    }
}

/// Narrow the fetched sales to the requested entity subset.
///
/// Customer filters drop whole sales. Product/category filters drop
/// non-matching lines and restate the sale total from the surviving
/// lines, so every downstream aggregate reconciles with what is kept.
fn apply_filters(sales: Vec<Sale>, products: &[Product], filters: &ReportFilters) -> Vec<Sale> {
    if filters.is_empty() {
        return sales;
    }

    let category_of: std::collections::HashMap<i64, Option<i64>> =
        products.iter().map(|p| (p.id, p.category_id)).collect();

    sales
        .into_iter()
        .filter(|sale| {
            filters.customers.is_empty()
                || sale
                    .customer_id
                    .map(|id| filters.customers.contains(&id))
                    .unwrap_or(false)
        })
        .filter_map(|mut sale| {
            if filters.products.is_empty() && filters.categories.is_empty() {
                return Some(sale);
            }

            sale.items.retain(|item| {
                let product_match =
                    filters.products.is_empty() || filters.products.contains(&item.product_id);
                let category_match = filters.categories.is_empty()
                    || category_of
                        .get(&item.product_id)
                        .copied()
                        .flatten()
                        .map(|id| filters.categories.contains(&id))
                        .unwrap_or(false);
                product_match && category_match
            });

            if sale.items.is_empty() {
                return None;
            }

            sale.total_amount = sale.items.iter().map(|i| i.net_amount()).sum();
            Some(sale)
        })
        .collect()
}
