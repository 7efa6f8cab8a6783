//! Create Design Use Case
//!
//! Fits a new treatment design on a training dataset and stores it.

use std::sync::Arc;

use crate::domain::gateways::DesignRepository;
use crate::domain::models::design::{CreateDesignData, TreatmentDesign};
use crate::domain::models::frame::Frame;
use crate::shared::errors::UseCaseError;

/// Use case for fitting and persisting a new design
pub struct CreateDesignUseCase {
    design_repository: Arc<dyn DesignRepository>,
}

impl CreateDesignUseCase {
    /// Create a new CreateDesignUseCase
    #[must_use]
    pub fn new(design_repository: Arc<dyn DesignRepository>) -> Self {
        Self { design_repository }
    }

    /// Execute the use case
    ///
    /// # Errors
    ///
    /// Returns `UseCaseError::Conflict` if an active design already uses the name.
    /// A name taken between the check and the insert surfaces as
    /// `RepositoryError::Conflict`, which also maps to 409.
    /// Returns `UseCaseError::Domain` if the design cannot be fitted on `frame`.
    /// Returns `UseCaseError::Repository` if there's a database error.
    pub async fn execute(&self, data: CreateDesignData, frame: &Frame) -> Result<TreatmentDesign, UseCaseError> {
        tracing::info!(name = %data.name, rows = frame.n_rows(), columns = frame.n_cols(), "Creating new design");

        if self.design_repository.exists_by_name(&data.name, None).await? {
            tracing::warn!(name = %data.name, "Design with name already exists");
            return Err(UseCaseError::Conflict(format!(
                "Design with name '{}' already exists",
                data.name
            )));
        }

        let design = TreatmentDesign::fit(data, frame).map_err(|err| {
            tracing::warn!(error = %err, "Design could not be fitted");
            err
        })?;
        let created = self.design_repository.create(&design).await?;

        tracing::info!(
            design_id = %created.id(),
            treatments = created.plan().treatments.len(),
            "Design created successfully"
        );

        Ok(created)
    }
}
