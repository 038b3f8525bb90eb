//! Paginated PDF rendering of a canonical report: title block, summary
//! table, then one section per line-item family with an embedded chart
//! and a data table. A failed chart is replaced by an inline note; it
//! never aborts the document.

use printpdf::image_crate::{DynamicImage, RgbImage};
use printpdf::{
    BuiltinFont, Color, Image, ImageTransform, IndirectFontRef, Line, Mm, PdfDocument,
    PdfDocumentReference, PdfLayerReference, Point, Rgb,
};
use std::io::BufWriter;

use chrono::Utc;
use tracing::warn;

use crate::core::{AppError, Result};
use crate::modules::export::services::chart::{ChartImage, ChartRenderer};
use crate::modules::export::services::format;
use crate::modules::reports::models::{
    CustomReport, FinancialReport, InventoryReport, Report, SalesReport,
};

const PAGE_WIDTH: f64 = 210.0;
const PAGE_HEIGHT: f64 = 297.0;
const MARGIN: f64 = 18.0;
const ROW_HEIGHT: f64 = 6.0;
// 640x360 px at 96 dpi
const CHART_WIDTH_MM: f64 = 169.3;
const CHART_HEIGHT_MM: f64 = 95.3;

fn pdf_err<E: std::fmt::Display>(e: E) -> AppError {
    AppError::render(format!("PDF generation failed: {}", e))
}

/// Cursor-based page writer; y runs downward from the top margin
struct PageWriter {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    y: f64,
}

impl PageWriter {
    fn new(title: &str) -> Result<Self> {
        let (doc, page, layer) =
            PdfDocument::new(title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
        let regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(pdf_err)?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(pdf_err)?;
        let layer = doc.get_page(page).get_layer(layer);

        Ok(Self {
            doc,
            layer,
            regular,
            bold,
            y: PAGE_HEIGHT - MARGIN,
        })
    }

    fn ensure_space(&mut self, needed: f64) {
        if self.y - needed < MARGIN {
            let (page, layer) = self.doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
            self.layer = self.doc.get_page(page).get_layer(layer);
            self.y = PAGE_HEIGHT - MARGIN;
        }
    }

    fn advance(&mut self, amount: f64) {
        self.y -= amount;
    }

    fn text_at(&self, text: &str, size: f64, x: f64, bold: bool) {
        let font = if bold { &self.bold } else { &self.regular };
        self.layer.use_text(text, size, Mm(x), Mm(self.y), font);
    }

    fn title(&mut self, text: &str) {
        self.ensure_space(12.0);
        self.text_at(text, 20.0, MARGIN, true);
        self.advance(10.0);
    }

    fn subtitle(&mut self, text: &str) {
        self.ensure_space(ROW_HEIGHT);
        self.text_at(text, 10.0, MARGIN, false);
        self.advance(ROW_HEIGHT);
    }

    fn heading(&mut self, text: &str) {
        self.ensure_space(14.0);
        self.advance(4.0);
        self.text_at(text, 14.0, MARGIN, true);
        self.advance(2.0);
        self.rule();
        self.advance(6.0);
    }

    fn rule(&self) {
        let line = Line {
            points: vec![
                (Point::new(Mm(MARGIN), Mm(self.y)), false),
                (Point::new(Mm(PAGE_WIDTH - MARGIN), Mm(self.y)), false),
            ],
            is_closed: false,
            has_fill: false,
            has_stroke: true,
            is_clipping_path: false,
        };
        self.layer.set_outline_thickness(0.4);
        self.layer
            .set_outline_color(Color::Rgb(Rgb::new(0.6, 0.6, 0.6, None)));
        self.layer.add_shape(line);
    }

    /// Key/value row in the summary block
    fn key_value(&mut self, key: &str, value: &str) {
        self.ensure_space(ROW_HEIGHT);
        self.text_at(key, 11.0, MARGIN, true);
        self.text_at(value, 11.0, MARGIN + 70.0, false);
        self.advance(ROW_HEIGHT);
    }

    /// Data table with fixed column offsets from the left margin
    fn table(&mut self, columns: &[(&str, f64)], rows: &[Vec<String>]) {
        self.ensure_space(ROW_HEIGHT * 2.0);
        for (header, offset) in columns {
            self.text_at(header, 10.0, MARGIN + offset, true);
        }
        self.advance(ROW_HEIGHT);

        for row in rows {
            self.ensure_space(ROW_HEIGHT);
            for (cell, (_, offset)) in row.iter().zip(columns) {
                self.text_at(cell, 10.0, MARGIN + offset, false);
            }
            self.advance(ROW_HEIGHT);
        }
        self.advance(2.0);
    }

    /// Embed a rendered chart; a render failure becomes a visible note
    fn chart(&mut self, rendered: std::result::Result<ChartImage, AppError>) {
        match rendered {
            Ok(chart) => {
                self.ensure_space(CHART_HEIGHT_MM + 4.0);
                let pixels = RgbImage::from_raw(chart.width, chart.height, chart.rgb);
                match pixels {
                    Some(pixels) => {
                        let image = Image::from_dynamic_image(&DynamicImage::ImageRgb8(pixels));
                        self.advance(CHART_HEIGHT_MM);
                        image.add_to_layer(
                            self.layer.clone(),
                            ImageTransform {
                                translate_x: Some(Mm(MARGIN)),
                                translate_y: Some(Mm(self.y)),
                                dpi: Some(96.0),
                                ..Default::default()
                            },
                        );
                        self.advance(4.0);
                    }
                    None => self.chart_error_note("chart buffer was malformed"),
                }
            }
            Err(e) => {
                warn!(error = %e, "Chart rendering failed, emitting inline note");
                self.chart_error_note(&e.to_string());
            }
        }
    }

    fn chart_error_note(&mut self, detail: &str) {
        self.ensure_space(ROW_HEIGHT);
        self.layer
            .set_fill_color(Color::Rgb(Rgb::new(0.7, 0.1, 0.1, None)));
        self.text_at(&format!("[Chart unavailable: {}]", detail), 10.0, MARGIN, false);
        self.layer
            .set_fill_color(Color::Rgb(Rgb::new(0.0, 0.0, 0.0, None)));
        self.advance(ROW_HEIGHT);
    }

    fn finish(self) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        {
            let mut writer = BufWriter::new(&mut bytes);
            self.doc.save(&mut writer).map_err(pdf_err)?;
        }
        Ok(bytes)
    }
}

/// PDF formatter over the canonical report
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfExporter {
    charts: ChartRenderer,
}

impl PdfExporter {
    pub fn new() -> Self {
        Self {
            charts: ChartRenderer::new(),
        }
    }

    pub fn render(&self, report: &Report) -> Result<Vec<u8>> {
        let mut page = PageWriter::new(&report.title())?;
        page.title(&report.title());
        page.subtitle(&format!(
            "Generated {}",
            Utc::now().format("%Y-%m-%d %H:%M UTC")
        ));

        match report {
            Report::Sales(r) => self.sales(&mut page, r),
            Report::Inventory(r) => self.inventory(&mut page, r),
            Report::Financial(r) => self.financial(&mut page, r),
            Report::Custom(r) => self.custom(&mut page, r),
        }

        page.finish()
    }

    fn sales_sections(
        &self,
        page: &mut PageWriter,
        daily: &[crate::modules::reports::models::DailySales],
        top_products: &[crate::modules::reports::models::ProductSales],
        top_customers: &[crate::modules::reports::models::CustomerSales],
    ) {
        page.heading("Daily Sales");
        page.chart(self.charts.line_chart("Daily Sales", daily));
        page.table(
            &[("Date", 0.0), ("Orders", 60.0), ("Amount", 100.0)],
            &daily
                .iter()
                .map(|d| {
                    vec![
                        d.date.format("%Y-%m-%d").to_string(),
                        d.order_count.to_string(),
                        format::currency(d.total_amount),
                    ]
                })
                .collect::<Vec<_>>(),
        );

        page.heading("Top Products");
        let bars: Vec<(String, f64)> = top_products
            .iter()
            .map(|p| (p.product_name.clone(), format::to_f64(p.revenue)))
            .collect();
        page.chart(self.charts.bar_chart("Top Products by Revenue", &bars));
        page.table(
            &[
                ("Product", 0.0),
                ("SKU", 70.0),
                ("Qty", 110.0),
                ("Revenue", 135.0),
            ],
            &top_products
                .iter()
                .map(|p| {
                    vec![
                        p.product_name.clone(),
                        p.sku.clone().unwrap_or_else(|| "-".to_string()),
                        p.quantity_sold.to_string(),
                        format::currency(p.revenue),
                    ]
                })
                .collect::<Vec<_>>(),
        );

        page.heading("Top Customers");
        page.table(
            &[("Customer", 0.0), ("Orders", 80.0), ("Amount", 120.0)],
            &top_customers
                .iter()
                .map(|c| {
                    vec![
                        c.customer_name.clone(),
                        c.order_count.to_string(),
                        format::currency(c.total_amount),
                    ]
                })
                .collect::<Vec<_>>(),
        );
    }

    fn sales(&self, page: &mut PageWriter, report: &SalesReport) {
        page.subtitle(&format!(
            "Period: {} to {}",
            report.start_date.format("%Y-%m-%d"),
            report.end_date.format("%Y-%m-%d")
        ));

        page.heading("Summary");
        page.key_value("Total Sales", &format::currency(report.summary.total_sales));
        page.key_value("Total Orders", &report.summary.total_orders.to_string());
        page.key_value(
            "Average Order Value",
            &format::currency(report.summary.average_order_value),
        );

        self.sales_sections(
            page,
            &report.daily_sales,
            &report.top_products,
            &report.top_customers,
        );
    }

    fn custom(&self, page: &mut PageWriter, report: &CustomReport) {
        page.subtitle(&format!(
            "Period: {} to {}",
            report.start_date.format("%Y-%m-%d"),
            report.end_date.format("%Y-%m-%d")
        ));
        if !report.filters.is_empty() {
            page.subtitle(&format!(
                "Filters: {} categories, {} products, {} customers",
                report.filters.categories.len(),
                report.filters.products.len(),
                report.filters.customers.len()
            ));
        }

        page.heading("Summary");
        page.key_value("Total Sales", &format::currency(report.summary.total_sales));
        page.key_value("Total Orders", &report.summary.total_orders.to_string());
        page.key_value(
            "Average Order Value",
            &format::currency(report.summary.average_order_value),
        );

        if report.include_details {
            self.sales_sections(
                page,
                &report.daily_sales,
                &report.top_products,
                &report.top_customers,
            );
        }
    }

    fn inventory(&self, page: &mut PageWriter, report: &InventoryReport) {
        page.subtitle(&format!(
            "As of {}",
            report.as_of.format("%Y-%m-%d %H:%M UTC")
        ));

        page.heading("Summary");
        page.key_value("Products", &report.summary.product_count.to_string());
        page.key_value(
            "Total Stock Value",
            &format::currency(report.summary.total_stock_value),
        );
        page.key_value("Low Stock", &report.summary.low_stock_count.to_string());
        page.key_value(
            "Out of Stock",
            &report.summary.out_of_stock_count.to_string(),
        );

        page.heading("Stock Value by Category");
        let bars: Vec<(String, f64)> = report
            .categories
            .iter()
            .map(|c| (c.category_name.clone(), format::to_f64(c.stock_value)))
            .collect();
        page.chart(self.charts.bar_chart("Stock Value by Category", &bars));
        page.table(
            &[
                ("Category", 0.0),
                ("Products", 70.0),
                ("Stock", 105.0),
                ("Value", 135.0),
            ],
            &report
                .categories
                .iter()
                .map(|c| {
                    vec![
                        c.category_name.clone(),
                        c.product_count.to_string(),
                        c.stock_count.to_string(),
                        format::currency(c.stock_value),
                    ]
                })
                .collect::<Vec<_>>(),
        );

        page.heading("Low Stock Items");
        page.table(
            &[
                ("Product", 0.0),
                ("Stock", 70.0),
                ("Minimum", 95.0),
                ("Status", 125.0),
            ],
            &report
                .low_stock
                .iter()
                .map(|p| {
                    vec![
                        p.product_name.clone(),
                        p.stock_quantity.to_string(),
                        p.minimum_stock.to_string(),
                        p.status.to_string(),
                    ]
                })
                .collect::<Vec<_>>(),
        );

        page.heading("All Products");
        page.table(
            &[
                ("Product", 0.0),
                ("Stock", 70.0),
                ("Unit Price", 95.0),
                ("Value", 125.0),
                ("Status", 155.0),
            ],
            &report
                .products
                .iter()
                .map(|p| {
                    vec![
                        p.product_name.clone(),
                        p.stock_quantity.to_string(),
                        format::currency(p.unit_price),
                        format::currency(p.stock_value),
                        p.status.to_string(),
                    ]
                })
                .collect::<Vec<_>>(),
        );
    }

    fn financial(&self, page: &mut PageWriter, report: &FinancialReport) {
        page.subtitle(&format!("Fiscal year {}", report.year));

        page.heading("Summary");
        page.key_value(
            "Total Revenue",
            &format::currency(report.summary.total_revenue),
        );
        page.key_value(
            "Total Transactions",
            &report.summary.total_transactions.to_string(),
        );
        page.key_value(
            "Average Monthly Revenue",
            &format::currency(report.summary.average_monthly_revenue),
        );

        page.heading("Monthly Revenue");
        let bars: Vec<(String, f64)> = report
            .monthly_revenue
            .iter()
            .map(|m| (m.month_name()[..3].to_string(), format::to_f64(m.revenue)))
            .collect();
        page.chart(self.charts.bar_chart("Monthly Revenue", &bars));
        page.table(
            &[
                ("Month", 0.0),
                ("Revenue", 50.0),
                ("Transactions", 95.0),
                ("Growth", 140.0),
            ],
            &report
                .monthly_revenue
                .iter()
                .map(|m| {
                    vec![
                        m.month_name().to_string(),
                        format::currency(m.revenue),
                        m.transaction_count.to_string(),
                        format::percent(m.growth_percent),
                    ]
                })
                .collect::<Vec<_>>(),
        );

        page.heading("Revenue by Category");
        let slices: Vec<(String, f64)> = report
            .revenue_by_category
            .iter()
            .map(|c| (c.category_name.clone(), format::to_f64(c.revenue)))
            .collect();
        page.chart(self.charts.pie_chart("Revenue by Category", &slices));
        page.table(
            &[("Category", 0.0), ("Revenue", 80.0), ("Lines", 125.0)],
            &report
                .revenue_by_category
                .iter()
                .map(|c| {
                    vec![
                        c.category_name.clone(),
                        format::currency(c.revenue),
                        c.transaction_count.to_string(),
                    ]
                })
                .collect::<Vec<_>>(),
        );

        page.heading("Revenue by Payment Method");
        page.table(
            &[("Method", 0.0), ("Revenue", 80.0), ("Lines", 125.0)],
            &report
                .revenue_by_payment_method
                .iter()
                .map(|m| {
                    vec![
                        m.payment_method.clone(),
                        format::currency(m.revenue),
                        m.transaction_count.to_string(),
                    ]
                })
                .collect::<Vec<_>>(),
        );
    }
}
