//! Data Transfer Objects
//!
//! Request and response DTOs for the REST API.

pub mod dataset;
pub mod design;

pub use dataset::{DatasetDto, TransformDatasetDto};
pub use design::{
    CreateDesignDto, DesignResponseDto, DesignSettingsDto, PatchDesignDto, PlanPreviewDto, PreviewDesignDto,
    RefitDesignDto,
};
