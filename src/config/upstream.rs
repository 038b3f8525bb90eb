use crate::core::{AppError, Result};
use std::env;
use std::time::Duration;

/// Base URLs and transport settings for the collaborator services
/// the report pipeline pulls raw entities from.
#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    /// Product catalog service (`GET /products`, `GET /products/categories`)
    pub catalog_base_url: String,
    /// Sales records service (`GET /sales`)
    pub sales_base_url: String,
    /// Customer service (`GET /customers`)
    pub customers_base_url: String,
    /// Per-request timeout for upstream fetches
    pub request_timeout: Duration,
}

impl UpstreamConfig {
    pub fn from_env() -> Result<Self> {
        let timeout_secs: u64 = env::var("UPSTREAM_TIMEOUT_SECS")
            .unwrap_or_else(|_| "10".to_string())
            .parse()
            .map_err(|_| AppError::Configuration("Invalid UPSTREAM_TIMEOUT_SECS".to_string()))?;

        Ok(UpstreamConfig {
            catalog_base_url: env::var("CATALOG_SERVICE_URL")
                .unwrap_or_else(|_| "http://localhost:5001".to_string()),
            sales_base_url: env::var("SALES_SERVICE_URL")
                .unwrap_or_else(|_| "http://localhost:5002".to_string()),
            customers_base_url: env::var("CUSTOMERS_SERVICE_URL")
                .unwrap_or_else(|_| "http://localhost:5003".to_string()),
            request_timeout: Duration::from_secs(timeout_secs),
        })
    }

    pub fn validate(&self) -> Result<()> {
        for (name, url) in [
            ("CATALOG_SERVICE_URL", &self.catalog_base_url),
            ("SALES_SERVICE_URL", &self.sales_base_url),
            ("CUSTOMERS_SERVICE_URL", &self.customers_base_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(AppError::Configuration(format!(
                    "{} must be an http(s) URL, got '{}'",
                    name, url
                )));
            }
        }

        Ok(())
    }

    /// Point every upstream at the same address; used by tests to simulate
    /// unreachable collaborators.
    pub fn for_tests(base_url: &str) -> Self {
        UpstreamConfig {
            catalog_base_url: base_url.to_string(),
            sales_base_url: base_url.to_string(),
            customers_base_url: base_url.to_string(),
            request_timeout: Duration::from_secs(2),
        }
    }
}
