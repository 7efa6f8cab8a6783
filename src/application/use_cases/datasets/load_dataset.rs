//! Load Dataset Use Case
//!
//! Resolves an inline or remote dataset into a frame.

use std::sync::Arc;

use super::codecs::DatasetCodecs;
use crate::domain::gateways::DatasetFetcher;
use crate::domain::models::dataset::{DatasetFormat, DatasetSource};
use crate::domain::models::frame::Frame;
use crate::shared::errors::{DatasetError, UseCaseError};

/// Use case for decoding request datasets
pub struct LoadDatasetUseCase {
    codecs: DatasetCodecs,
    fetcher: Arc<dyn DatasetFetcher>,
    max_rows: usize,
}

impl LoadDatasetUseCase {
    /// Create a new LoadDatasetUseCase
    #[must_use]
    pub fn new(codecs: DatasetCodecs, fetcher: Arc<dyn DatasetFetcher>, max_rows: usize) -> Self {
        Self {
            codecs,
            fetcher,
            max_rows,
        }
    }

    /// Execute the use case
    ///
    /// # Errors
    ///
    /// Returns `UseCaseError::Fetch` if a remote dataset cannot be downloaded.
    /// Returns `UseCaseError::Dataset` if the body is malformed or holds too many rows.
    /// Returns `UseCaseError::Validation` if no codec handles the format.
    pub async fn execute(&self, source: DatasetSource) -> Result<Frame, UseCaseError> {
        let frame = match source {
            DatasetSource::Inline { format, body } => {
                tracing::debug!(format = ?format, bytes = body.len(), "Decoding inline dataset");
                self.codecs.get(format)?.decode(&body)?
            }
            DatasetSource::Remote { url, format } => {
                tracing::info!(url = %url, "Fetching remote dataset");
                let fetched = self.fetcher.fetch(&url).await?;
                let format =
                    format.unwrap_or_else(|| DatasetFormat::detect(fetched.content_type.as_deref(), &url));
                tracing::debug!(format = ?format, bytes = fetched.body.len(), "Decoding remote dataset");
                self.codecs.get(format)?.decode(&fetched.body)?
            }
        };

        if frame.n_rows() > self.max_rows {
            tracing::warn!(rows = frame.n_rows(), max = self.max_rows, "Dataset rejected: too many rows");
            return Err(DatasetError::TooManyRows {
                rows: frame.n_rows(),
                max: self.max_rows,
            }
            .into());
        }

        tracing::debug!(rows = frame.n_rows(), columns = frame.n_cols(), "Dataset loaded");
        Ok(frame)
    }
}
