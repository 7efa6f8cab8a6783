//! Delete Design Use Case (Soft Delete)
//!
//! Soft deletes a design by setting active=false.

use std::sync::Arc;

use crate::domain::gateways::DesignRepository;
use crate::domain::models::design::DesignId;
use crate::shared::errors::UseCaseError;

/// Use case for soft deleting a design
pub struct DeleteDesignUseCase {
    design_repository: Arc<dyn DesignRepository>,
}

impl DeleteDesignUseCase {
    /// Create a new DeleteDesignUseCase
    #[must_use]
    pub fn new(design_repository: Arc<dyn DesignRepository>) -> Self {
        Self { design_repository }
    }

    /// Execute the use case
    ///
    /// # Errors
    ///
    /// Returns `UseCaseError::NotFound` if no active design has this ID.
    /// Returns `UseCaseError::Repository` if there's a database error.
    pub async fn execute(&self, id: &DesignId) -> Result<(), UseCaseError> {
        tracing::info!(design_id = %id, "Soft deleting design");

        let deleted = self.design_repository.soft_delete(id).await?;

        if !deleted {
            tracing::warn!(design_id = %id, "Design not found for deletion");
            return Err(UseCaseError::NotFound {
                resource: "Design".to_string(),
                id: id.to_string(),
            });
        }

        tracing::info!(design_id = %id, "Design soft deleted successfully");
        Ok(())
    }
}
