//! Export formatters: the same canonical report rendered as PDF, XLSX,
//! or CSV, with chart rendering shared by the PDF and XLSX paths.

pub mod services;

pub use services::{
    ChartImage, ChartRenderer, CsvExporter, ExcelExporter, PdfExporter, CHART_HEIGHT, CHART_WIDTH,
};
