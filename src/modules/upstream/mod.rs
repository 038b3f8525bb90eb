// Upstream data gateway: raw entity fetches from collaborator services

pub mod models;
pub mod services;

pub use models::{Category, Customer, Paged, Product, Sale, SaleItem, SaleStatus};
pub use services::{DateRange, HttpUpstreamGateway, UpstreamDataSource};
