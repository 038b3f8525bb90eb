mod entities;

pub use entities::{Category, Customer, Paged, Product, Sale, SaleItem, SaleStatus};
