pub mod chart;
pub mod csv;
pub mod excel;
pub mod format;
pub mod pdf;

pub use chart::{ChartImage, ChartRenderer, CHART_HEIGHT, CHART_WIDTH};
pub use csv::CsvExporter;
pub use excel::ExcelExporter;
pub use pdf::PdfExporter;
