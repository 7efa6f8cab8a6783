//! Domain Models
//!
//! Pure domain entities and value objects: tables, settings, fitted plans and designs.

pub mod dataset;
pub mod design;
pub mod frame;
pub mod plan;
pub mod settings;

pub use dataset::{DatasetFormat, DatasetSource, FetchedDataset};
pub use design::{CreateDesignData, DesignId, TreatmentDesign, UpdateDesignData};
pub use frame::{Column, ColumnData, DType, Frame};
pub use plan::{Treatment, TreatmentPlan};
pub use settings::{ColumnSuffixes, DesignSettings, MissingNumericalStrategy, TargetType};
