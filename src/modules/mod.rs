pub mod export;
pub mod reports;
pub mod upstream;
