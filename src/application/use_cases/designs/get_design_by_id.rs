//! Get Design By ID Use Case
//!
//! Retrieves a single design by its ID.

use std::sync::Arc;

use crate::domain::gateways::DesignRepository;
use crate::domain::models::design::{DesignId, TreatmentDesign};
use crate::shared::errors::UseCaseError;

/// Use case for getting a design by ID
pub struct GetDesignByIdUseCase {
    design_repository: Arc<dyn DesignRepository>,
}

impl GetDesignByIdUseCase {
    /// Create a new GetDesignByIdUseCase
    #[must_use]
    pub fn new(design_repository: Arc<dyn DesignRepository>) -> Self {
        Self { design_repository }
    }

    /// Execute the use case
    ///
    /// # Errors
    ///
    /// Returns `UseCaseError::NotFound` if the design doesn't exist.
    /// Returns `UseCaseError::Repository` if there's a database error.
    pub async fn execute(&self, id: &DesignId) -> Result<TreatmentDesign, UseCaseError> {
        tracing::debug!(design_id = %id, "Getting design by ID");

        let design = self.design_repository.find_by_id(id).await?.ok_or_else(|| {
            tracing::warn!(design_id = %id, "Design not found");
            UseCaseError::NotFound {
                resource: "Design".to_string(),
                id: id.to_string(),
            }
        })?;

        tracing::debug!(design_id = %id, "Design found");
        Ok(design)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::use_cases::designs::mock_repository::{fitted_design, MockDesignRepository};

    #[tokio::test]
    async fn should_return_design_when_found() {
        let design = fitted_design("churn");
        let id = design.id().clone();
        let repo = Arc::new(MockDesignRepository::new().with_design(design));

        let use_case = GetDesignByIdUseCase::new(repo);
        let result = use_case.execute(&id).await.unwrap();

        assert_eq!(result.id(), &id);
        assert_eq!(result.name(), "churn");
    }

    #[tokio::test]
    async fn should_return_not_found_when_design_does_not_exist() {
        let repo = Arc::new(MockDesignRepository::new());

        let use_case = GetDesignByIdUseCase::new(repo);
        let result = use_case.execute(&DesignId::new()).await;

        assert!(matches!(result.unwrap_err(), UseCaseError::NotFound { .. }));
    }
}
