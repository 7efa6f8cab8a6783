//! Refit Design Use Case (PUT)
//!
//! Replaces the name, description and settings of a design and refits it on
//! a new training dataset.

use std::sync::Arc;

use crate::domain::gateways::DesignRepository;
use crate::domain::models::design::{CreateDesignData, DesignId, TreatmentDesign};
use crate::domain::models::frame::Frame;
use crate::shared::errors::UseCaseError;

/// Use case for full design replacement (PUT)
pub struct RefitDesignUseCase {
    design_repository: Arc<dyn DesignRepository>,
}

impl RefitDesignUseCase {
    /// Create a new RefitDesignUseCase
    #[must_use]
    pub fn new(design_repository: Arc<dyn DesignRepository>) -> Self {
        Self { design_repository }
    }

    /// Execute the use case
    ///
    /// # Errors
    ///
    /// Returns `UseCaseError::NotFound` if the design doesn't exist.
    /// Returns `UseCaseError::Conflict` if another active design uses the new name.
    /// Returns `UseCaseError::Domain` if the design cannot be fitted on `frame`.
    /// Returns `UseCaseError::Repository` if there's a database error.
    pub async fn execute(
        &self,
        id: &DesignId,
        data: CreateDesignData,
        frame: &Frame,
    ) -> Result<TreatmentDesign, UseCaseError> {
        tracing::info!(design_id = %id, rows = frame.n_rows(), "Refitting design");

        let existing = self.design_repository.find_by_id(id).await?.ok_or_else(|| {
            tracing::warn!(design_id = %id, "Design not found for refit");
            UseCaseError::NotFound {
                resource: "Design".to_string(),
                id: id.to_string(),
            }
        })?;

        if data.name != existing.name() && self.design_repository.exists_by_name(&data.name, Some(id)).await? {
            tracing::warn!(design_id = %id, name = %data.name, "Cannot refit: name already exists");
            return Err(UseCaseError::Conflict(format!(
                "Design with name '{}' already exists",
                data.name
            )));
        }

        let refitted = existing.refit(data, frame)?;
        let result = self.design_repository.update(&refitted).await?.ok_or_else(|| UseCaseError::NotFound {
            resource: "Design".to_string(),
            id: id.to_string(),
        })?;

        tracing::info!(design_id = %id, treatments = result.plan().treatments.len(), "Design refitted successfully");
        Ok(result)
    }
}
