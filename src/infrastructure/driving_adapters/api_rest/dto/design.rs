//! Design DTOs
//!
//! Data transfer objects for treatment design API endpoints.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::dataset::{validate_dataset, DatasetDto};
use crate::domain::models::design::{CreateDesignData, TreatmentDesign, UpdateDesignData};
use crate::domain::models::frame::DType;
use crate::domain::models::plan::TreatmentPlan;
use crate::domain::models::settings::{ColumnSuffixes, DesignSettings, MissingNumericalStrategy, TargetType};

lazy_static! {
    /// Design names: letters, digits, spaces, dots, dashes and underscores
    static ref DESIGN_NAME_REGEX: Regex = Regex::new(r"^[A-Za-z0-9][A-Za-z0-9 ._-]*$").expect("valid regex");
    /// Suffixes end up inside column names
    static ref SUFFIX_REGEX: Regex = Regex::new(r"^[A-Za-z0-9_]+$").expect("valid regex");
}

/// Validates that no column name is blank
fn validate_column_list(columns: &[String]) -> Result<(), validator::ValidationError> {
    if columns.iter().any(|c| c.trim().is_empty()) {
        let mut error = validator::ValidationError::new("column_name");
        error.message = Some("Column names must not be blank".into());
        return Err(error);
    }
    Ok(())
}

/// Naming conventions for derived columns
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct SuffixesDto {
    #[validate(regex(path = *SUFFIX_REGEX, message = "levelInfix may only contain letters, digits and underscores"))]
    pub level_infix: String,
    #[validate(regex(path = *SUFFIX_REGEX, message = "rareLevel may only contain letters, digits and underscores"))]
    pub rare_level: String,
    #[validate(regex(path = *SUFFIX_REGEX, message = "missing may only contain letters, digits and underscores"))]
    pub missing: String,
    #[validate(regex(path = *SUFFIX_REGEX, message = "impact may only contain letters, digits and underscores"))]
    pub impact: String,
    #[validate(regex(path = *SUFFIX_REGEX, message = "frequency may only contain letters, digits and underscores"))]
    pub frequency: String,
}

impl Default for SuffixesDto {
    fn default() -> Self {
        ColumnSuffixes::default().into()
    }
}

impl From<ColumnSuffixes> for SuffixesDto {
    fn from(suffixes: ColumnSuffixes) -> Self {
        Self {
            level_infix: suffixes.level_infix,
            rare_level: suffixes.rare_level,
            missing: suffixes.missing,
            impact: suffixes.impact,
            frequency: suffixes.frequency,
        }
    }
}

impl From<SuffixesDto> for ColumnSuffixes {
    fn from(dto: SuffixesDto) -> Self {
        Self {
            level_infix: dto.level_infix,
            rare_level: dto.rare_level,
            missing: dto.missing,
            impact: dto.impact,
            frequency: dto.frequency,
        }
    }
}

/// Design settings as exchanged over the API
///
/// Omitted fields take their defaults.
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct DesignSettingsDto {
    #[validate(length(max = 1000, message = "idFeatures can have at most 1000 items"))]
    #[validate(custom(function = "validate_column_list"))]
    pub id_features: Vec<String>,

    #[validate(length(max = 1000, message = "datetimeFeatures can have at most 1000 items"))]
    #[validate(custom(function = "validate_column_list"))]
    pub datetime_features: Vec<String>,

    #[validate(length(min = 1, max = 200, message = "target must be between 1 and 200 characters"))]
    pub target: Option<String>,

    pub target_type: TargetType,

    #[validate(length(min = 1, max = 200, message = "positiveClass must be between 1 and 200 characters"))]
    pub positive_class: Option<String>,

    pub find_hidden_dtypes: bool,
    pub dtype_overrides: BTreeMap<String, DType>,
    pub missing_numerical_strategy: MissingNumericalStrategy,
    pub numerical_fill_value: f64,

    #[validate(length(min = 1, max = 100, message = "categoricalFillValue must be between 1 and 100 characters"))]
    pub categorical_fill_value: String,

    pub ints_to_categorical: bool,
    pub floats_to_ints: bool,

    #[validate(range(min = 0.0, max = 1.0, message = "rareLevelThreshold must be between 0 and 1"))]
    pub rare_level_threshold: f64,

    #[validate(range(min = 0.0, max = 1.0, message = "allowableRarePercentage must be between 0 and 1"))]
    pub allowable_rare_percentage: f64,

    #[validate(range(min = 0.0, message = "smoothingFactor must be at least 0"))]
    pub smoothing_factor: f64,

    pub exclude_zero_variance_features: bool,
    pub expand_datetimes: bool,

    #[validate(nested)]
    pub suffixes: SuffixesDto,
}

impl Default for DesignSettingsDto {
    fn default() -> Self {
        DesignSettings::default().into()
    }
}

impl From<DesignSettings> for DesignSettingsDto {
    fn from(settings: DesignSettings) -> Self {
        Self {
            id_features: settings.id_features,
            datetime_features: settings.datetime_features,
            target: settings.target,
            target_type: settings.target_type,
            positive_class: settings.positive_class,
            find_hidden_dtypes: settings.find_hidden_dtypes,
            dtype_overrides: settings.dtype_overrides,
            missing_numerical_strategy: settings.missing_numerical_strategy,
            numerical_fill_value: settings.numerical_fill_value,
            categorical_fill_value: settings.categorical_fill_value,
            ints_to_categorical: settings.ints_to_categorical,
            floats_to_ints: settings.floats_to_ints,
            rare_level_threshold: settings.rare_level_threshold,
            allowable_rare_percentage: settings.allowable_rare_percentage,
            smoothing_factor: settings.smoothing_factor,
            exclude_zero_variance_features: settings.exclude_zero_variance_features,
            expand_datetimes: settings.expand_datetimes,
            suffixes: settings.suffixes.into(),
        }
    }
}

impl From<DesignSettingsDto> for DesignSettings {
    fn from(dto: DesignSettingsDto) -> Self {
        Self {
            id_features: dto.id_features,
            datetime_features: dto.datetime_features,
            target: dto.target,
            target_type: dto.target_type,
            positive_class: dto.positive_class,
            find_hidden_dtypes: dto.find_hidden_dtypes,
            dtype_overrides: dto.dtype_overrides,
            missing_numerical_strategy: dto.missing_numerical_strategy,
            numerical_fill_value: dto.numerical_fill_value,
            categorical_fill_value: dto.categorical_fill_value,
            ints_to_categorical: dto.ints_to_categorical,
            floats_to_ints: dto.floats_to_ints,
            rare_level_threshold: dto.rare_level_threshold,
            allowable_rare_percentage: dto.allowable_rare_percentage,
            smoothing_factor: dto.smoothing_factor,
            exclude_zero_variance_features: dto.exclude_zero_variance_features,
            expand_datetimes: dto.expand_datetimes,
            suffixes: dto.suffixes.into(),
        }
    }
}

/// DTO for fitting and storing a new design
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateDesignDto {
    #[validate(length(min = 1, max = 100, message = "name must be between 1 and 100 characters"))]
    #[validate(regex(path = *DESIGN_NAME_REGEX, message = "name may only contain letters, digits, spaces, dots, dashes and underscores"))]
    pub name: String,

    #[validate(length(max = 500, message = "description must be at most 500 characters"))]
    pub description: Option<String>,

    #[serde(default)]
    #[validate(nested)]
    pub settings: DesignSettingsDto,

    #[validate(custom(function = "validate_dataset"))]
    pub dataset: DatasetDto,
}

impl CreateDesignDto {
    /// Split into the design data and the training dataset
    #[must_use]
    pub fn into_parts(self) -> (CreateDesignData, DatasetDto) {
        let data = CreateDesignData {
            name: self.name,
            description: self.description,
            settings: self.settings.into(),
        };
        (data, self.dataset)
    }
}

/// DTO for refitting a design (PUT): same shape as creation
pub type RefitDesignDto = CreateDesignDto;

/// DTO for fitting without storing anything
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PreviewDesignDto {
    #[serde(default)]
    #[validate(nested)]
    pub settings: DesignSettingsDto,

    #[validate(custom(function = "validate_dataset"))]
    pub dataset: DatasetDto,
}

/// DTO for partial design update (PATCH)
///
/// All fields are optional. Only provided fields will be updated.
#[derive(Debug, Clone, Deserialize, Validate, Default)]
#[serde(rename_all = "camelCase")]
pub struct PatchDesignDto {
    #[validate(length(min = 1, max = 100, message = "name must be between 1 and 100 characters"))]
    #[validate(regex(path = *DESIGN_NAME_REGEX, message = "name may only contain letters, digits, spaces, dots, dashes and underscores"))]
    pub name: Option<String>,

    #[validate(length(max = 500, message = "description must be at most 500 characters"))]
    pub description: Option<String>,

    pub active: Option<bool>,
}

impl From<PatchDesignDto> for UpdateDesignData {
    fn from(dto: PatchDesignDto) -> Self {
        Self {
            name: dto.name,
            description: dto.description,
            active: dto.active,
        }
    }
}

/// Fitted plan returned by the preview endpoint
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanPreviewDto {
    pub output_columns: Vec<String>,
    pub plan: TreatmentPlan,
}

impl From<TreatmentPlan> for PlanPreviewDto {
    fn from(plan: TreatmentPlan) -> Self {
        Self {
            output_columns: plan.output_columns(),
            plan,
        }
    }
}

/// Design response DTO
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignResponseDto {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub settings: DesignSettingsDto,
    pub output_columns: Vec<String>,
    pub plan: TreatmentPlan,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&TreatmentDesign> for DesignResponseDto {
    fn from(design: &TreatmentDesign) -> Self {
        Self {
            id: design.id().to_string(),
            name: design.name().to_string(),
            description: design.description().map(str::to_string),
            settings: design.settings().clone().into(),
            output_columns: design.plan().output_columns(),
            plan: design.plan().clone(),
            active: design.active(),
            created_at: design.created_at(),
            updated_at: design.updated_at(),
        }
    }
}

impl From<TreatmentDesign> for DesignResponseDto {
    fn from(design: TreatmentDesign) -> Self {
        Self::from(&design)
    }
}
