//! Driven Adapters
//!
//! Implementations of gateway traits for external systems:
//! - Database repositories
//! - Dataset codecs
//! - Remote dataset fetching
//! - Configuration

pub mod config;
pub mod database;
pub mod dataset;
pub mod design_repository;
pub mod http_fetcher;

pub use config::AppConfig;
pub use dataset::{ColumnsCodec, CsvCodec};
pub use design_repository::PostgresDesignRepository;
pub use http_fetcher::HttpDatasetFetcher;
