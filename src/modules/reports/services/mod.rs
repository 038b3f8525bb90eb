pub mod aggregation;
mod assembler;
mod expiration_sweep;

pub use assembler::ReportService;
pub use expiration_sweep::ExpirationSweep;
