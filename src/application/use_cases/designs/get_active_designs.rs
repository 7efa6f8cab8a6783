//! Get Active Designs Use Case
//!
//! Retrieves all active designs, sorted by name.

use std::sync::Arc;

use crate::domain::gateways::DesignRepository;
use crate::domain::models::design::TreatmentDesign;
use crate::shared::errors::UseCaseError;

/// Use case for listing active designs
pub struct GetActiveDesignsUseCase {
    design_repository: Arc<dyn DesignRepository>,
}

impl GetActiveDesignsUseCase {
    /// Create a new GetActiveDesignsUseCase
    #[must_use]
    pub fn new(design_repository: Arc<dyn DesignRepository>) -> Self {
        Self { design_repository }
    }

    /// Execute the use case
    ///
    /// # Errors
    ///
    /// Returns `UseCaseError::Repository` if there's a database error.
    pub async fn execute(&self) -> Result<Vec<TreatmentDesign>, UseCaseError> {
        tracing::debug!("Getting all active designs");

        let designs = self.design_repository.find_all_active().await?;

        tracing::debug!(count = designs.len(), "Found active designs");
        Ok(designs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::use_cases::designs::mock_repository::{fitted_design, MockDesignRepository};
    use crate::shared::errors::RepositoryError;

    #[tokio::test]
    async fn should_return_active_designs_sorted_by_name() {
        let repo = Arc::new(
            MockDesignRepository::new()
                .with_design(fitted_design("zeta"))
                .with_design(fitted_design("alpha"))
                .with_design(fitted_design("gone").deactivate()),
        );

        let use_case = GetActiveDesignsUseCase::new(repo);
        let designs = use_case.execute().await.unwrap();

        let names: Vec<&str> = designs.iter().map(TreatmentDesign::name).collect();
        assert_eq!(names, vec!["alpha", "zeta"]);
    }

    #[tokio::test]
    async fn should_return_empty_list_when_no_designs() {
        let use_case = GetActiveDesignsUseCase::new(Arc::new(MockDesignRepository::new()));
        assert!(use_case.execute().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn should_propagate_repository_errors() {
        let repo = Arc::new(MockDesignRepository::new().with_failure(RepositoryError::Mapping("bad row".to_string())));

        let use_case = GetActiveDesignsUseCase::new(repo);

        assert!(matches!(use_case.execute().await.unwrap_err(), UseCaseError::Repository(_)));
    }
}
