// Report aggregation: canonical report shapes, the assembler, and the
// metadata audit trail.

pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use models::{Report, ReportFormat, ReportRequest, ReportType};
pub use repositories::{MetadataRepository, SqliteMetadataRepository};
pub use services::{ExpirationSweep, ReportService};
