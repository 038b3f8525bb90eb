//! StockSight Report Service Library
//!
//! Aggregates sales, inventory, and financial data pulled from upstream
//! services into canonical reports, served as JSON or exported as PDF,
//! XLSX, and CSV downloads.

pub mod config;
pub mod core;
pub mod middleware;
pub mod modules;

// Re-export commonly used types
pub use modules::export;
pub use modules::reports;
pub use modules::upstream;
