mod metadata_repository;

pub use metadata_repository::{MetadataRepository, SqliteMetadataRepository};
