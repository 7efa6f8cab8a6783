//! Treatment Design Domain Model
//!
//! A named, fitted treatment plan together with the settings it was fitted with.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::frame::Frame;
use super::plan::TreatmentPlan;
use super::settings::DesignSettings;
use crate::domain::preprocessing;
use crate::shared::errors::DomainError;

/// Newtype wrapper for Design ID providing type safety
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DesignId(Uuid);

impl DesignId {
    /// Create a new random DesignId
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    #[must_use]
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    #[must_use]
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for DesignId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for DesignId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for DesignId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl TryFrom<&str> for DesignId {
    type Error = uuid::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Ok(Self(Uuid::parse_str(value)?))
    }
}

/// Data required to create a new design
#[derive(Debug, Clone)]
pub struct CreateDesignData {
    pub name: String,
    pub description: Option<String>,
    pub settings: DesignSettings,
}

/// Metadata changes for an existing design (all fields optional)
#[derive(Debug, Clone, Default)]
pub struct UpdateDesignData {
    pub name: Option<String>,
    pub description: Option<String>,
    pub active: Option<bool>,
}

/// Treatment design entity
#[derive(Debug, Clone)]
pub struct TreatmentDesign {
    id: DesignId,
    name: String,
    description: Option<String>,
    settings: DesignSettings,
    plan: TreatmentPlan,
    active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TreatmentDesign {
    /// Fit a new design on a training frame
    ///
    /// # Errors
    ///
    /// Returns the `DomainError` raised by fitting.
    pub fn fit(data: CreateDesignData, frame: &Frame) -> Result<Self, DomainError> {
        let plan = preprocessing::fit(frame, &data.settings)?;
        let now = Utc::now();
        Ok(Self {
            id: DesignId::new(),
            name: data.name,
            description: data.description,
            settings: data.settings,
            plan,
            active: true,
            created_at: now,
            updated_at: now,
        })
    }

    /// Restore a design from persisted data
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn restore(
        id: DesignId,
        name: String,
        description: Option<String>,
        settings: DesignSettings,
        plan: TreatmentPlan,
        active: bool,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            description,
            settings,
            plan,
            active,
            created_at,
            updated_at,
        }
    }

    /// Replace name, description and settings and refit, keeping identity
    ///
    /// # Errors
    ///
    /// Returns the `DomainError` raised by fitting.
    pub fn refit(self, data: CreateDesignData, frame: &Frame) -> Result<Self, DomainError> {
        let plan = preprocessing::fit(frame, &data.settings)?;
        Ok(Self {
            name: data.name,
            description: data.description,
            settings: data.settings,
            plan,
            updated_at: Utc::now(),
            ..self
        })
    }

    /// Apply metadata updates, returning a new instance
    #[must_use]
    pub fn with_updates(self, data: UpdateDesignData) -> Self {
        Self {
            name: data.name.unwrap_or(self.name),
            description: data.description.or(self.description),
            active: data.active.unwrap_or(self.active),
            updated_at: Utc::now(),
            ..self
        }
    }

    /// Mark the design as inactive (soft delete)
    #[must_use]
    pub fn deactivate(self) -> Self {
        Self {
            active: false,
            updated_at: Utc::now(),
            ..self
        }
    }

    /// Apply the fitted plan to a frame
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidState` for an inactive design, or the
    /// `DomainError` raised by the transform.
    pub fn transform(&self, frame: &Frame) -> Result<Frame, DomainError> {
        if !self.active {
            return Err(DomainError::InvalidState(format!("design '{}' is inactive", self.name)));
        }
        preprocessing::transform(&self.plan, frame)
    }

    // Getters

    #[must_use]
    pub fn id(&self) -> &DesignId {
        &self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    #[must_use]
    pub fn settings(&self) -> &DesignSettings {
        &self.settings
    }

    #[must_use]
    pub fn plan(&self) -> &TreatmentPlan {
        &self.plan
    }

    #[must_use]
    pub fn active(&self) -> bool {
        self.active
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    #[must_use]
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}
