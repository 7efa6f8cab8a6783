//! Partial Update Design Use Case (PATCH)
//!
//! Updates only the provided metadata fields of a design, including 'active'.

use std::sync::Arc;

use crate::domain::gateways::DesignRepository;
use crate::domain::models::design::{DesignId, TreatmentDesign, UpdateDesignData};
use crate::shared::errors::UseCaseError;

/// Use case for partial design update (PATCH)
pub struct PartialUpdateDesignUseCase {
    design_repository: Arc<dyn DesignRepository>,
}

impl PartialUpdateDesignUseCase {
    /// Create a new PartialUpdateDesignUseCase
    #[must_use]
    pub fn new(design_repository: Arc<dyn DesignRepository>) -> Self {
        Self { design_repository }
    }

    /// Execute the use case
    ///
    /// # Errors
    ///
    /// Returns `UseCaseError::NotFound` if the design doesn't exist.
    /// Returns `UseCaseError::Conflict` if the new name is already used.
    /// Returns `UseCaseError::Repository` if there's a database error.
    pub async fn execute(&self, id: &DesignId, data: UpdateDesignData) -> Result<TreatmentDesign, UseCaseError> {
        tracing::info!(design_id = %id, "Partially updating design");

        let existing = self.design_repository.find_by_id(id).await?.ok_or_else(|| {
            tracing::warn!(design_id = %id, "Design not found for partial update");
            UseCaseError::NotFound {
                resource: "Design".to_string(),
                id: id.to_string(),
            }
        })?;

        let renamed = data.name.as_deref().is_some_and(|name| name != existing.name());
        let reactivated = data.active == Some(true) && !existing.active();
        let updated = existing.with_updates(data);

        // Active names are unique, also when a design comes back to life
        if updated.active()
            && (renamed || reactivated)
            && self.design_repository.exists_by_name(updated.name(), Some(id)).await?
        {
            tracing::warn!(design_id = %id, name = %updated.name(), "Cannot update: name already exists");
            return Err(UseCaseError::Conflict(format!(
                "Design with name '{}' already exists",
                updated.name()
            )));
        }

        let result = self.design_repository.update(&updated).await?.ok_or_else(|| UseCaseError::NotFound {
            resource: "Design".to_string(),
            id: id.to_string(),
        })?;

        tracing::info!(design_id = %id, "Design partially updated successfully");
        Ok(result)
    }
}
