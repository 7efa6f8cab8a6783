//! Preview Design Use Case
//!
//! Fits a treatment plan without storing anything.

use crate::domain::models::frame::Frame;
use crate::domain::models::plan::TreatmentPlan;
use crate::domain::models::settings::DesignSettings;
use crate::domain::preprocessing;
use crate::shared::errors::UseCaseError;

/// Use case for a dry-run fit
#[derive(Debug, Default)]
pub struct PreviewDesignUseCase;

impl PreviewDesignUseCase {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Execute the use case
    ///
    /// # Errors
    ///
    /// Returns `UseCaseError::Domain` if the plan cannot be fitted on `frame`.
    pub fn execute(&self, settings: &DesignSettings, frame: &Frame) -> Result<TreatmentPlan, UseCaseError> {
        tracing::debug!(rows = frame.n_rows(), columns = frame.n_cols(), "Previewing design");

        let plan = preprocessing::fit(frame, settings)?;

        tracing::debug!(treatments = plan.treatments.len(), "Design previewed");
        Ok(plan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::use_cases::designs::mock_repository::{design_data, training_frame};
    use crate::shared::errors::DomainError;

    #[test]
    fn should_return_plan_for_valid_settings() {
        let settings = design_data("preview").settings;

        let plan = PreviewDesignUseCase::new().execute(&settings, &training_frame()).unwrap();

        assert_eq!(
            plan.output_columns(),
            vec!["k", "x", "x_isbad", "color_lev_blue", "color_lev_red", "y"]
        );
    }

    #[test]
    fn should_reject_invalid_settings() {
        let settings = DesignSettings {
            smoothing_factor: -2.0,
            ..Default::default()
        };

        let result = PreviewDesignUseCase::new().execute(&settings, &training_frame());

        assert!(matches!(
            result.unwrap_err(),
            UseCaseError::Domain(DomainError::InvalidSettings(_))
        ));
    }
}
