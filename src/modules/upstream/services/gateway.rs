use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::config::UpstreamConfig;
use crate::modules::upstream::models::{Category, Customer, Paged, Product, Sale};

/// Date window passed through to the sales service filter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Source of raw entities for report aggregation.
///
/// Implementations degrade gracefully: an unreachable collaborator yields an
/// empty collection, never an error.
#[async_trait]
pub trait UpstreamDataSource: Send + Sync {
    async fn fetch_sales(&self, range: Option<DateRange>) -> Vec<Sale>;
    async fn fetch_products(&self) -> Vec<Product>;
    async fn fetch_customers(&self) -> Vec<Customer>;
    async fn fetch_categories(&self) -> Vec<Category>;
}

/// HTTP client over the product-catalog, sales, and customer services
pub struct HttpUpstreamGateway {
    client: Client,
    config: UpstreamConfig,
}

impl HttpUpstreamGateway {
    pub fn new(config: UpstreamConfig) -> Self {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { client, config }
    }

    /// Fetch a paginated items envelope, unwrapping `items` and discarding
    /// pagination metadata. Transport failures, non-success statuses, and
    /// undecodable bodies all degrade to an empty list with a warning.
    async fn fetch_items<T: DeserializeOwned>(&self, url: &str) -> Vec<T> {
        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!(url = %url, error = %e, "Upstream service unreachable, using empty data");
                return Vec::new();
            }
        };

        if !response.status().is_success() {
            warn!(
                url = %url,
                status = %response.status(),
                "Upstream service returned non-success status, using empty data"
            );
            return Vec::new();
        }

        match response.json::<Paged<T>>().await {
            Ok(page) => page.items,
            Err(e) => {
                warn!(url = %url, error = %e, "Failed to decode upstream response, using empty data");
                Vec::new()
            }
        }
    }
}

#[async_trait]
impl UpstreamDataSource for HttpUpstreamGateway {
    async fn fetch_sales(&self, range: Option<DateRange>) -> Vec<Sale> {
        let url = match range {
            Some(range) => format!(
                "{}/sales?start_date={}&end_date={}",
                self.config.sales_base_url,
                range.start.format("%Y-%m-%d"),
                range.end.format("%Y-%m-%d")
            ),
            None => format!("{}/sales", self.config.sales_base_url),
        };

        self.fetch_items(&url).await
    }

    async fn fetch_products(&self) -> Vec<Product> {
        let url = format!("{}/products", self.config.catalog_base_url);
        self.fetch_items(&url).await
    }

    async fn fetch_customers(&self) -> Vec<Customer> {
        let url = format!("{}/customers", self.config.customers_base_url);
        self.fetch_items(&url).await
    }

    async fn fetch_categories(&self) -> Vec<Category> {
        let url = format!("{}/products/categories", self.config.catalog_base_url);
        self.fetch_items(&url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Port 1 is never listening; every fetch must degrade to empty.
    fn unreachable_gateway() -> HttpUpstreamGateway {
        HttpUpstreamGateway::new(UpstreamConfig::for_tests("http://127.0.0.1:1"))
    }

    #[tokio::test]
    async fn test_unreachable_sales_service_yields_empty() {
        let gateway = unreachable_gateway();
        let sales = gateway.fetch_sales(None).await;
        assert!(sales.is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_catalog_yields_empty() {
        let gateway = unreachable_gateway();
        assert!(gateway.fetch_products().await.is_empty());
        assert!(gateway.fetch_categories().await.is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_customers_yields_empty() {
        let gateway = unreachable_gateway();
        assert!(gateway.fetch_customers().await.is_empty());
    }
}
