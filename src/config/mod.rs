use crate::core::{AppError, Result};
use std::env;

pub mod database;
pub mod server;
pub mod upstream;

pub use database::DatabaseConfig;
pub use server::ServerConfig;
pub use upstream::UpstreamConfig;

/// Main application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub upstream: UpstreamConfig,
    pub reports: ReportConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: String,
    pub log_level: String,
}

impl AppConfig {
    /// Tracing filter used when `RUST_LOG` is not set; `LOG_LEVEL` drives
    /// this crate's level, actix stays at info
    pub fn default_filter(&self) -> String {
        format!("stocksight={},actix_web=info", self.log_level)
    }
}

/// Tunables for report generation and the metadata audit trail
#[derive(Debug, Clone)]
pub struct ReportConfig {
    /// Default N for top-product / top-customer rankings
    pub top_n: usize,
    /// Days before a metadata record is marked expired
    pub retention_days: u32,
    /// Seconds between expiry sweep runs
    pub sweep_interval_secs: u64,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        let config = Config {
            app: AppConfig {
                env: env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
                log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            },
            server: ServerConfig::from_env()?,
            database: DatabaseConfig::from_env()?,
            upstream: UpstreamConfig::from_env()?,
            reports: ReportConfig {
                top_n: env::var("REPORT_TOP_N")
                    .unwrap_or_else(|_| "10".to_string())
                    .parse()
                    .map_err(|_| AppError::Configuration("Invalid REPORT_TOP_N".to_string()))?,
                retention_days: env::var("REPORT_RETENTION_DAYS")
                    .unwrap_or_else(|_| "30".to_string())
                    .parse()
                    .map_err(|_| {
                        AppError::Configuration("Invalid REPORT_RETENTION_DAYS".to_string())
                    })?,
                sweep_interval_secs: env::var("REPORT_SWEEP_INTERVAL_SECS")
                    .unwrap_or_else(|_| "300".to_string())
                    .parse()
                    .map_err(|_| {
                        AppError::Configuration("Invalid REPORT_SWEEP_INTERVAL_SECS".to_string())
                    })?,
            },
        };

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.reports.top_n == 0 {
            return Err(AppError::Configuration(
                "Top-N ranking size must be greater than 0".to_string(),
            ));
        }

        if self.reports.sweep_interval_secs == 0 {
            return Err(AppError::Configuration(
                "Expiry sweep interval must be greater than 0".to_string(),
            ));
        }

        self.upstream.validate()?;

        Ok(())
    }
}
