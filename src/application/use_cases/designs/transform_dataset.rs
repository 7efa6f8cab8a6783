//! Transform Dataset Use Case
//!
//! Applies the fitted plan of a stored design to new data.

use std::sync::Arc;

use crate::domain::gateways::DesignRepository;
use crate::domain::models::design::DesignId;
use crate::domain::models::frame::Frame;
use crate::shared::errors::UseCaseError;

/// Use case for treating a dataset with a stored design
pub struct TransformDatasetUseCase {
    design_repository: Arc<dyn DesignRepository>,
}

impl TransformDatasetUseCase {
    /// Create a new TransformDatasetUseCase
    #[must_use]
    pub fn new(design_repository: Arc<dyn DesignRepository>) -> Self {
        Self { design_repository }
    }

    /// Execute the use case
    ///
    /// # Errors
    ///
    /// Returns `UseCaseError::NotFound` if the design doesn't exist.
    /// Returns `UseCaseError::Domain` if the design is inactive or the data lacks a treated column.
    /// Returns `UseCaseError::Repository` if there's a database error.
    pub async fn execute(&self, id: &DesignId, frame: &Frame) -> Result<Frame, UseCaseError> {
        tracing::debug!(design_id = %id, rows = frame.n_rows(), "Transforming dataset");

        let design = self.design_repository.find_by_id(id).await?.ok_or_else(|| {
            tracing::warn!(design_id = %id, "Design not found for transform");
            UseCaseError::NotFound {
                resource: "Design".to_string(),
                id: id.to_string(),
            }
        })?;

        let treated = design.transform(frame).map_err(|err| {
            tracing::warn!(design_id = %id, error = %err, "Dataset could not be transformed");
            err
        })?;

        tracing::info!(
            design_id = %id,
            rows = treated.n_rows(),
            columns = treated.n_cols(),
            "Dataset transformed successfully"
        );
        Ok(treated)
    }
}
