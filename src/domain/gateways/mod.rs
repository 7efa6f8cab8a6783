//! Gateway Traits (Ports)
//!
//! Abstract interfaces defining contracts for external dependencies.
//! These are implemented by driven adapters in the infrastructure layer.

pub mod dataset_codec;
pub mod dataset_fetcher;
pub mod design_repository;

pub use dataset_codec::DatasetCodec;
pub use dataset_fetcher::DatasetFetcher;
pub use design_repository::DesignRepository;
