//! Design Use Cases
//!
//! Business logic for fitting, storing and applying treatment designs.

mod create_design;
mod delete_design;
mod get_active_designs;
mod get_design_by_id;
mod partial_update_design;
mod preview_design;
mod refit_design;
mod transform_dataset;

#[cfg(test)]
pub(crate) mod mock_repository;

pub use create_design::CreateDesignUseCase;
pub use delete_design::DeleteDesignUseCase;
pub use get_active_designs::GetActiveDesignsUseCase;
pub use get_design_by_id::GetDesignByIdUseCase;
pub use partial_update_design::PartialUpdateDesignUseCase;
pub use preview_design::PreviewDesignUseCase;
pub use refit_design::RefitDesignUseCase;
pub use transform_dataset::TransformDatasetUseCase;
