//! XLSX rendering: one worksheet per report section, number formats on
//! monetary columns, conditional fills for stock status, a native chart
//! over the primary data sheet, and the rendered PNG chart embedded on
//! the summary sheet.

use rust_xlsxwriter::{
    Chart, ChartType, Color, Format, FormatAlign, Image, Workbook, Worksheet,
};
use tracing::warn;

use crate::core::{AppError, Result};
use crate::modules::export::services::chart::ChartRenderer;
use crate::modules::export::services::format;
use crate::modules::reports::models::{
    CustomReport, CustomerSales, DailySales, FinancialReport, InventoryReport, ProductSales,
    Report, SalesReport, StockStatus,
};

fn xlsx_err<E: std::fmt::Display>(e: E) -> AppError {
    AppError::render(format!("Excel generation failed: {}", e))
}

/// Cell formats shared across all sheets
struct Styles {
    title: Format,
    header: Format,
    currency: Format,
    integer: Format,
    percent: Format,
    low_stock: Format,
    out_of_stock: Format,
}

impl Styles {
    fn new() -> Self {
        Self {
            title: Format::new().set_bold().set_font_size(14),
            header: Format::new()
                .set_bold()
                .set_background_color(Color::RGB(0xD9E1F2))
                .set_align(FormatAlign::Center),
            currency: Format::new().set_num_format("$#,##0.00"),
            integer: Format::new().set_num_format("#,##0"),
            percent: Format::new().set_num_format("0.00\"%\""),
            low_stock: Format::new()
                .set_background_color(Color::RGB(0xFFEB9C))
                .set_font_color(Color::RGB(0x9C6500)),
            out_of_stock: Format::new()
                .set_background_color(Color::RGB(0xFFC7CE))
                .set_font_color(Color::RGB(0x9C0006)),
        }
    }

    fn status(&self, status: StockStatus) -> Option<&Format> {
        match status {
            StockStatus::OutOfStock => Some(&self.out_of_stock),
            StockStatus::Low => Some(&self.low_stock),
            StockStatus::Normal => None,
        }
    }
}

fn write_headers(sheet: &mut Worksheet, styles: &Styles, headers: &[&str]) -> Result<()> {
    for (col, header) in headers.iter().enumerate() {
        sheet
            .write_string_with_format(0, col as u16, *header, &styles.header)
            .map_err(xlsx_err)?;
    }
    Ok(())
}

/// XLSX formatter over the canonical report
#[derive(Debug, Clone, Copy, Default)]
pub struct ExcelExporter {
    charts: ChartRenderer,
}

impl ExcelExporter {
    pub fn new() -> Self {
        Self {
            charts: ChartRenderer::new(),
        }
    }

    pub fn render(&self, report: &Report) -> Result<Vec<u8>> {
        let mut workbook = Workbook::new();
        let styles = Styles::new();

        match report {
            Report::Sales(r) => self.sales(&mut workbook, &styles, r)?,
            Report::Inventory(r) => self.inventory(&mut workbook, &styles, r)?,
            Report::Financial(r) => self.financial(&mut workbook, &styles, r)?,
            Report::Custom(r) => self.custom(&mut workbook, &styles, r)?,
        }

        workbook.save_to_buffer().map_err(xlsx_err)
    }

    /// Summary sheet shared by all shapes: title, key/value rows, then
    /// the rendered chart image if one could be produced
    fn summary_sheet(
        &self,
        workbook: &mut Workbook,
        styles: &Styles,
        title: &str,
        rows: &[(&str, SummaryValue)],
        chart: Option<std::result::Result<crate::modules::export::services::chart::ChartImage, AppError>>,
    ) -> Result<()> {
        let sheet = workbook.add_worksheet().set_name("Summary").map_err(xlsx_err)?;
        sheet
            .write_string_with_format(0, 0, title, &styles.title)
            .map_err(xlsx_err)?;

        let mut row = 2u32;
        for (key, value) in rows {
            sheet
                .write_string_with_format(row, 0, *key, &styles.header)
                .map_err(xlsx_err)?;
            match value {
                SummaryValue::Money(d) => {
                    sheet
                        .write_number_with_format(row, 1, format::to_f64(*d), &styles.currency)
                        .map_err(xlsx_err)?;
                }
                SummaryValue::Count(n) => {
                    sheet
                        .write_number_with_format(row, 1, *n as f64, &styles.integer)
                        .map_err(xlsx_err)?;
                }
                SummaryValue::Text(s) => {
                    sheet.write_string(row, 1, s.as_str()).map_err(xlsx_err)?;
                }
            }
            row += 1;
        }

        if let Some(rendered) = chart {
            match rendered {
                Ok(chart) => {
                    let image = Image::new_from_buffer(&chart.png).map_err(xlsx_err)?;
                    sheet.insert_image(row + 1, 0, &image).map_err(xlsx_err)?;
                }
                Err(e) => {
                    warn!(error = %e, "Chart rendering failed, omitting summary image");
                    sheet
                        .write_string(row + 1, 0, format!("Chart unavailable: {}", e))
                        .map_err(xlsx_err)?;
                }
            }
        }

        sheet.autofit();
        Ok(())
    }

    fn daily_sales_sheet(
        &self,
        workbook: &mut Workbook,
        styles: &Styles,
        daily: &[DailySales],
    ) -> Result<()> {
        let sheet = workbook
            .add_worksheet()
            .set_name("Daily Sales")
            .map_err(xlsx_err)?;
        write_headers(sheet, styles, &["Date", "Orders", "Amount"])?;

        for (i, day) in daily.iter().enumerate() {
            let row = (i + 1) as u32;
            sheet
                .write_string(row, 0, day.date.format("%Y-%m-%d").to_string())
                .map_err(xlsx_err)?;
            sheet
                .write_number_with_format(row, 1, day.order_count as f64, &styles.integer)
                .map_err(xlsx_err)?;
            sheet
                .write_number_with_format(row, 2, format::to_f64(day.total_amount), &styles.currency)
                .map_err(xlsx_err)?;
        }

        if !daily.is_empty() {
            let last = daily.len() as u32;
            let mut chart = Chart::new(ChartType::Line);
            chart
                .add_series()
                .set_categories(("Daily Sales", 1, 0, last, 0))
                .set_values(("Daily Sales", 1, 2, last, 2))
                .set_name("Amount");
            chart.title().set_name("Daily Sales");
            sheet
                .insert_chart(1, 4, &chart)
                .map_err(xlsx_err)?;
        }

        sheet.autofit();
        Ok(())
    }

    fn top_products_sheet(
        &self,
        workbook: &mut Workbook,
        styles: &Styles,
        products: &[ProductSales],
    ) -> Result<()> {
        let sheet = workbook
            .add_worksheet()
            .set_name("Top Products")
            .map_err(xlsx_err)?;
        write_headers(sheet, styles, &["Product", "SKU", "Quantity Sold", "Revenue"])?;

        for (i, product) in products.iter().enumerate() {
            let row = (i + 1) as u32;
            sheet
                .write_string(row, 0, &product.product_name)
                .map_err(xlsx_err)?;
            sheet
                .write_string(row, 1, product.sku.as_deref().unwrap_or("-"))
                .map_err(xlsx_err)?;
            sheet
                .write_number_with_format(row, 2, product.quantity_sold as f64, &styles.integer)
                .map_err(xlsx_err)?;
            sheet
                .write_number_with_format(row, 3, format::to_f64(product.revenue), &styles.currency)
                .map_err(xlsx_err)?;
        }

        sheet.autofit();
        Ok(())
    }

    fn top_customers_sheet(
        &self,
        workbook: &mut Workbook,
        styles: &Styles,
        customers: &[CustomerSales],
    ) -> Result<()> {
        let sheet = workbook
            .add_worksheet()
            .set_name("Top Customers")
            .map_err(xlsx_err)?;
        write_headers(sheet, styles, &["Customer", "Orders", "Amount"])?;

        for (i, customer) in customers.iter().enumerate() {
            let row = (i + 1) as u32;
            sheet
                .write_string(row, 0, &customer.customer_name)
                .map_err(xlsx_err)?;
            sheet
                .write_number_with_format(row, 1, customer.order_count as f64, &styles.integer)
                .map_err(xlsx_err)?;
            sheet
                .write_number_with_format(
                    row,
                    2,
                    format::to_f64(customer.total_amount),
                    &styles.currency,
                )
                .map_err(xlsx_err)?;
        }

        sheet.autofit();
        Ok(())
    }

    fn sales(&self, workbook: &mut Workbook, styles: &Styles, report: &SalesReport) -> Result<()> {
        let chart = self.charts.line_chart("Daily Sales", &report.daily_sales);
        self.summary_sheet(
            workbook,
            styles,
            "Sales Report",
            &[
                ("Total Sales", SummaryValue::Money(report.summary.total_sales)),
                ("Total Orders", SummaryValue::Count(report.summary.total_orders)),
                (
                    "Average Order Value",
                    SummaryValue::Money(report.summary.average_order_value),
                ),
                (
                    "Start Date",
                    SummaryValue::Text(report.start_date.format("%Y-%m-%d").to_string()),
                ),
                (
                    "End Date",
                    SummaryValue::Text(report.end_date.format("%Y-%m-%d").to_string()),
                ),
            ],
            Some(chart),
        )?;

        self.daily_sales_sheet(workbook, styles, &report.daily_sales)?;
        self.top_products_sheet(workbook, styles, &report.top_products)?;
        self.top_customers_sheet(workbook, styles, &report.top_customers)
    }

    fn custom(&self, workbook: &mut Workbook, styles: &Styles, report: &CustomReport) -> Result<()> {
        let chart = if report.include_details {
            Some(self.charts.line_chart("Daily Sales", &report.daily_sales))
        } else {
            None
        };
        self.summary_sheet(
            workbook,
            styles,
            "Custom Report",
            &[
                ("Total Sales", SummaryValue::Money(report.summary.total_sales)),
                ("Total Orders", SummaryValue::Count(report.summary.total_orders)),
                (
                    "Average Order Value",
                    SummaryValue::Money(report.summary.average_order_value),
                ),
                (
                    "Start Date",
                    SummaryValue::Text(report.start_date.format("%Y-%m-%d").to_string()),
                ),
                (
                    "End Date",
                    SummaryValue::Text(report.end_date.format("%Y-%m-%d").to_string()),
                ),
            ],
            chart,
        )?;

        if report.include_details {
            self.daily_sales_sheet(workbook, styles, &report.daily_sales)?;
            self.top_products_sheet(workbook, styles, &report.top_products)?;
            self.top_customers_sheet(workbook, styles, &report.top_customers)?;
        }
        Ok(())
    }

    fn inventory(
        &self,
        workbook: &mut Workbook,
        styles: &Styles,
        report: &InventoryReport,
    ) -> Result<()> {
        let bars: Vec<(String, f64)> = report
            .categories
            .iter()
            .map(|c| (c.category_name.clone(), format::to_f64(c.stock_value)))
            .collect();
        let chart = self.charts.bar_chart("Stock Value by Category", &bars);
        self.summary_sheet(
            workbook,
            styles,
            "Inventory Report",
            &[
                ("Products", SummaryValue::Count(report.summary.product_count)),
                (
                    "Total Stock Value",
                    SummaryValue::Money(report.summary.total_stock_value),
                ),
                ("Low Stock", SummaryValue::Count(report.summary.low_stock_count)),
                (
                    "Out of Stock",
                    SummaryValue::Count(report.summary.out_of_stock_count),
                ),
                (
                    "As Of",
                    SummaryValue::Text(report.as_of.format("%Y-%m-%d %H:%M UTC").to_string()),
                ),
            ],
            Some(chart),
        )?;

        let sheet = workbook
            .add_worksheet()
            .set_name("Categories")
            .map_err(xlsx_err)?;
        write_headers(sheet, styles, &["Category", "Products", "Stock", "Value"])?;
        for (i, category) in report.categories.iter().enumerate() {
            let row = (i + 1) as u32;
            sheet
                .write_string(row, 0, &category.category_name)
                .map_err(xlsx_err)?;
            sheet
                .write_number_with_format(row, 1, category.product_count as f64, &styles.integer)
                .map_err(xlsx_err)?;
            sheet
                .write_number_with_format(row, 2, category.stock_count as f64, &styles.integer)
                .map_err(xlsx_err)?;
            sheet
                .write_number_with_format(
                    row,
                    3,
                    format::to_f64(category.stock_value),
                    &styles.currency,
                )
                .map_err(xlsx_err)?;
        }
        if !report.categories.is_empty() {
            let last = report.categories.len() as u32;
            let mut chart = Chart::new(ChartType::Column);
            chart
                .add_series()
                .set_categories(("Categories", 1, 0, last, 0))
                .set_values(("Categories", 1, 3, last, 3))
                .set_name("Stock Value");
            chart.title().set_name("Stock Value by Category");
            sheet.insert_chart(1, 5, &chart).map_err(xlsx_err)?;
        }
        sheet.autofit();

        let sheet = workbook
            .add_worksheet()
            .set_name("Products")
            .map_err(xlsx_err)?;
        write_headers(
            sheet,
            styles,
            &[
                "Product",
                "SKU",
                "Stock",
                "Minimum",
                "Unit Price",
                "Stock Value",
                "Status",
            ],
        )?;
        for (i, product) in report.products.iter().enumerate() {
            let row = (i + 1) as u32;
            sheet
                .write_string(row, 0, &product.product_name)
                .map_err(xlsx_err)?;
            sheet
                .write_string(row, 1, product.sku.as_deref().unwrap_or("-"))
                .map_err(xlsx_err)?;
            sheet
                .write_number_with_format(row, 2, product.stock_quantity as f64, &styles.integer)
                .map_err(xlsx_err)?;
            sheet
                .write_number_with_format(row, 3, product.minimum_stock as f64, &styles.integer)
                .map_err(xlsx_err)?;
            sheet
                .write_number_with_format(
                    row,
                    4,
                    format::to_f64(product.unit_price),
                    &styles.currency,
                )
                .map_err(xlsx_err)?;
            sheet
                .write_number_with_format(
                    row,
                    5,
                    format::to_f64(product.stock_value),
                    &styles.currency,
                )
                .map_err(xlsx_err)?;
            match styles.status(product.status) {
                Some(fill) => sheet
                    .write_string_with_format(row, 6, product.status.to_string(), fill)
                    .map_err(xlsx_err)?,
                None => sheet
                    .write_string(row, 6, product.status.to_string())
                    .map_err(xlsx_err)?,
            };
        }
        sheet.autofit();
        Ok(())
    }

    fn financial(
        &self,
        workbook: &mut Workbook,
        styles: &Styles,
        report: &FinancialReport,
    ) -> Result<()> {
        let slices: Vec<(String, f64)> = report
            .revenue_by_category
            .iter()
            .map(|c| (c.category_name.clone(), format::to_f64(c.revenue)))
            .collect();
        let chart = self.charts.pie_chart("Revenue by Category", &slices);
        self.summary_sheet(
            workbook,
            styles,
            "Financial Report",
            &[
                (
                    "Total Revenue",
                    SummaryValue::Money(report.summary.total_revenue),
                ),
                (
                    "Total Transactions",
                    SummaryValue::Count(report.summary.total_transactions),
                ),
                (
                    "Average Monthly Revenue",
                    SummaryValue::Money(report.summary.average_monthly_revenue),
                ),
                ("Year", SummaryValue::Text(report.year.to_string())),
            ],
            Some(chart),
        )?;

        let sheet = workbook
            .add_worksheet()
            .set_name("Monthly Revenue")
            .map_err(xlsx_err)?;
        write_headers(sheet, styles, &["Month", "Revenue", "Transactions", "Growth"])?;
        for (i, month) in report.monthly_revenue.iter().enumerate() {
            let row = (i + 1) as u32;
            sheet
                .write_string(row, 0, month.month_name())
                .map_err(xlsx_err)?;
            sheet
                .write_number_with_format(row, 1, format::to_f64(month.revenue), &styles.currency)
                .map_err(xlsx_err)?;
            sheet
                .write_number_with_format(
                    row,
                    2,
                    month.transaction_count as f64,
                    &styles.integer,
                )
                .map_err(xlsx_err)?;
            sheet
                .write_number_with_format(
                    row,
                    3,
                    format::to_f64(month.growth_percent),
                    &styles.percent,
                )
                .map_err(xlsx_err)?;
        }
        if !report.monthly_revenue.is_empty() {
            let last = report.monthly_revenue.len() as u32;
            let mut chart = Chart::new(ChartType::Column);
            chart
                .add_series()
                .set_categories(("Monthly Revenue", 1, 0, last, 0))
                .set_values(("Monthly Revenue", 1, 1, last, 1))
                .set_name("Revenue");
            chart.title().set_name("Monthly Revenue");
            sheet.insert_chart(1, 5, &chart).map_err(xlsx_err)?;
        }
        sheet.autofit();

        let sheet = workbook
            .add_worksheet()
            .set_name("By Category")
            .map_err(xlsx_err)?;
        write_headers(sheet, styles, &["Category", "Revenue", "Lines"])?;
        for (i, category) in report.revenue_by_category.iter().enumerate() {
            let row = (i + 1) as u32;
            sheet
                .write_string(row, 0, &category.category_name)
                .map_err(xlsx_err)?;
            sheet
                .write_number_with_format(
                    row,
                    1,
                    format::to_f64(category.revenue),
                    &styles.currency,
                )
                .map_err(xlsx_err)?;
            sheet
                .write_number_with_format(
                    row,
                    2,
                    category.transaction_count as f64,
                    &styles.integer,
                )
                .map_err(xlsx_err)?;
        }
        sheet.autofit();

        let sheet = workbook
            .add_worksheet()
            .set_name("By Payment Method")
            .map_err(xlsx_err)?;
        write_headers(sheet, styles, &["Method", "Revenue", "Lines"])?;
        for (i, method) in report.revenue_by_payment_method.iter().enumerate() {
            let row = (i + 1) as u32;
            sheet
                .write_string(row, 0, &method.payment_method)
                .map_err(xlsx_err)?;
            sheet
                .write_number_with_format(row, 1, format::to_f64(method.revenue), &styles.currency)
                .map_err(xlsx_err)?;
            sheet
                .write_number_with_format(
                    row,
                    2,
                    method.transaction_count as f64,
                    &styles.integer,
                )
                .map_err(xlsx_err)?;
        }
        sheet.autofit();
        Ok(())
    }
}

/// A typed summary cell so monetary and count rows keep their formats
enum SummaryValue {
    Money(rust_decimal::Decimal),
    Count(i64),
    Text(String),
}
