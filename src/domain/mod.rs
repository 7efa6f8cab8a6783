//! Domain Layer
//!
//! Contains the core business logic, domain models, preprocessing routines
//! and gateway traits (ports). This layer has no dependencies on infrastructure.

pub mod gateways;
pub mod models;
pub mod preprocessing;

pub use gateways::{DatasetCodec, DatasetFetcher, DesignRepository};
pub use models::design::{CreateDesignData, DesignId, TreatmentDesign, UpdateDesignData};
