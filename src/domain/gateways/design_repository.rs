//! Design Repository Gateway
//!
//! Abstract trait defining the contract for treatment design persistence.

use async_trait::async_trait;

use crate::domain::models::design::{DesignId, TreatmentDesign};
use crate::shared::errors::RepositoryError;

/// Repository trait for TreatmentDesign persistence operations
#[async_trait]
pub trait DesignRepository: Send + Sync {
    /// Find a design by its ID
    async fn find_by_id(&self, id: &DesignId) -> Result<Option<TreatmentDesign>, RepositoryError>;

    /// Find all active designs, sorted by name ascending
    async fn find_all_active(&self) -> Result<Vec<TreatmentDesign>, RepositoryError>;

    /// Persist a new design
    async fn create(&self, design: &TreatmentDesign) -> Result<TreatmentDesign, RepositoryError>;

    /// Update an existing design
    async fn update(&self, design: &TreatmentDesign) -> Result<Option<TreatmentDesign>, RepositoryError>;

    /// Soft delete a design (sets active=false)
    async fn soft_delete(&self, id: &DesignId) -> Result<bool, RepositoryError>;

    /// Check if an active design uses `name`, optionally excluding one design
    async fn exists_by_name(&self, name: &str, exclude_id: Option<&DesignId>) -> Result<bool, RepositoryError>;
}
