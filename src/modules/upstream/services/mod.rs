mod gateway;

pub use gateway::{DateRange, HttpUpstreamGateway, UpstreamDataSource};
