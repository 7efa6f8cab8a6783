//! Dataset Fetcher Gateway
//!
//! Retrieval of datasets published at a remote location.

use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use crate::domain::models::dataset::FetchedDataset;
use crate::shared::errors::FetchError;

#[cfg_attr(test, automock)]
#[async_trait]
pub trait DatasetFetcher: Send + Sync {
    /// Download the raw bytes behind `url`
    async fn fetch(&self, url: &str) -> Result<FetchedDataset, FetchError>;
}
