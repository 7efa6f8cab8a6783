//! Design Settings
//!
//! User-supplied knobs controlling how a treatment design is fitted.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use super::frame::DType;

/// Kind of target the design is built for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetType {
    #[default]
    Categorical,
    Numerical,
}

/// How missing numerical values are filled
///
/// `Systematically` fills with a constant so that missingness stays visible
/// to downstream models; `Random` fills with the column mean.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingNumericalStrategy {
    #[default]
    Systematically,
    Random,
}

/// Naming conventions for derived columns
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnSuffixes {
    pub level_infix: String,
    pub rare_level: String,
    pub missing: String,
    pub impact: String,
    pub frequency: String,
}

impl Default for ColumnSuffixes {
    fn default() -> Self {
        Self {
            level_infix: "_lev_".to_string(),
            rare_level: "rare".to_string(),
            missing: "_isbad".to_string(),
            impact: "_impact".to_string(),
            frequency: "_freq".to_string(),
        }
    }
}

impl ColumnSuffixes {
    fn validate(&self, errors: &mut Vec<String>) {
        for (field, value) in [
            ("level_infix", &self.level_infix),
            ("rare_level", &self.rare_level),
            ("missing", &self.missing),
            ("impact", &self.impact),
            ("frequency", &self.frequency),
        ] {
            if value.is_empty() || !value.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
                errors.push(format!(
                    "suffixes.{field}: must be non-empty and contain only letters, digits and underscores"
                ));
            }
        }
    }
}

/// Settings for fitting a treatment design
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DesignSettings {
    pub id_features: Vec<String>,
    pub datetime_features: Vec<String>,
    pub target: Option<String>,
    pub target_type: TargetType,
    pub positive_class: Option<String>,
    pub find_hidden_dtypes: bool,
    pub dtype_overrides: BTreeMap<String, DType>,
    pub missing_numerical_strategy: MissingNumericalStrategy,
    pub numerical_fill_value: f64,
    pub categorical_fill_value: String,
    pub ints_to_categorical: bool,
    pub floats_to_ints: bool,
    pub rare_level_threshold: f64,
    pub allowable_rare_percentage: f64,
    pub smoothing_factor: f64,
    pub exclude_zero_variance_features: bool,
    pub expand_datetimes: bool,
    pub suffixes: ColumnSuffixes,
}

impl Default for DesignSettings {
    fn default() -> Self {
        Self {
            id_features: Vec::new(),
            datetime_features: Vec::new(),
            target: None,
            target_type: TargetType::Categorical,
            positive_class: None,
            find_hidden_dtypes: false,
            dtype_overrides: BTreeMap::new(),
            missing_numerical_strategy: MissingNumericalStrategy::Systematically,
            numerical_fill_value: -1.0,
            categorical_fill_value: "NA".to_string(),
            ints_to_categorical: true,
            floats_to_ints: false,
            rare_level_threshold: 0.02,
            allowable_rare_percentage: 0.1,
            smoothing_factor: 0.0,
            exclude_zero_variance_features: true,
            expand_datetimes: false,
            suffixes: ColumnSuffixes::default(),
        }
    }
}

impl DesignSettings {
    /// Check internal consistency, returning every violated rule
    ///
    /// # Errors
    ///
    /// Returns the list of violation messages when any rule fails.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        for (field, value) in [
            ("rare_level_threshold", self.rare_level_threshold),
            ("allowable_rare_percentage", self.allowable_rare_percentage),
        ] {
            if !(0.0..=1.0).contains(&value) {
                errors.push(format!("{field}: must be between 0 and 1"));
            }
        }
        if !self.smoothing_factor.is_finite() || self.smoothing_factor < 0.0 {
            errors.push("smoothing_factor: must be a finite number of at least 0".to_string());
        }
        if !self.numerical_fill_value.is_finite() {
            errors.push("numerical_fill_value: must be a finite number".to_string());
        }
        if self.categorical_fill_value.is_empty() {
            errors.push("categorical_fill_value: must not be empty".to_string());
        }
        if self.positive_class.is_some() && self.target_type != TargetType::Categorical {
            errors.push("positive_class: only applies to a categorical target".to_string());
        }
        if self.positive_class.is_some() && self.target.is_none() {
            errors.push("positive_class: requires a target".to_string());
        }

        let mut roles: HashMap<&str, &str> = HashMap::new();
        let claims = self
            .id_features
            .iter()
            .map(|f| (f.as_str(), "id"))
            .chain(self.datetime_features.iter().map(|f| (f.as_str(), "datetime")))
            .chain(self.target.iter().map(|f| (f.as_str(), "target")));
        for (feature, role) in claims {
            if let Some(previous) = roles.insert(feature, role) {
                errors.push(format!("column '{feature}' is claimed by two roles ({previous}, {role})"));
            }
        }

        self.suffixes.validate(&mut errors);

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Columns that never receive a treatment of their own
    #[must_use]
    pub fn reserved_features(&self) -> Vec<&str> {
        self.id_features
            .iter()
            .chain(self.datetime_features.iter())
            .chain(self.target.iter())
            .map(String::as_str)
            .collect()
    }
}
