//! Treatment Plan Domain Model
//!
//! The fitted, serializable outcome of designing treatments for a dataset.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::frame::{DType, Frame};
use super::settings::TargetType;

/// Name and fitted dtype of a column seen during fit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSchema {
    pub name: String,
    pub dtype: DType,
}

/// Target column as seen during fit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetSummary {
    pub name: String,
    pub target_type: TargetType,
    /// Level counted as the positive outcome of a categorical target
    pub positive_class: Option<String>,
    /// Mean of the encoded target, present once a target encoding was needed
    pub mean: Option<f64>,
}

/// Indicator column for one categorical level
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelIndicator {
    pub level: String,
    pub output: String,
}

/// Pooled indicator for rare (and unseen) levels
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RareBucket {
    pub output: String,
    pub levels: Vec<String>,
}

/// Numeric part extracted from a datetime column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatePart {
    Year,
    Month,
    Day,
    DayOfWeek,
    Hour,
}

impl DatePart {
    pub const ALL: [DatePart; 5] = [Self::Year, Self::Month, Self::Day, Self::DayOfWeek, Self::Hour];

    #[must_use]
    pub fn suffix(self) -> &'static str {
        match self {
            Self::Year => "_year",
            Self::Month => "_month",
            Self::Day => "_day",
            Self::DayOfWeek => "_dayofweek",
            Self::Hour => "_hour",
        }
    }
}

/// Output column for one datetime part
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatePartOutput {
    pub part: DatePart,
    pub output: String,
}

/// Rule turning one source column into one or more numeric columns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Treatment {
    Numeric {
        feature: String,
        source_dtype: DType,
        fill_value: f64,
        output: String,
        missing_indicator: Option<String>,
    },
    Indicators {
        feature: String,
        source_dtype: DType,
        fill_level: String,
        levels: Vec<LevelIndicator>,
        rare: Option<RareBucket>,
    },
    Frequency {
        feature: String,
        source_dtype: DType,
        fill_level: String,
        output: String,
        frequencies: BTreeMap<String, f64>,
    },
    Impact {
        feature: String,
        source_dtype: DType,
        fill_level: String,
        output: String,
        effects: BTreeMap<String, f64>,
    },
    DateParts {
        feature: String,
        fill_value: f64,
        parts: Vec<DatePartOutput>,
    },
}

impl Treatment {
    /// Source column the treatment reads
    #[must_use]
    pub fn feature(&self) -> &str {
        match self {
            Self::Numeric { feature, .. }
            | Self::Indicators { feature, .. }
            | Self::Frequency { feature, .. }
            | Self::Impact { feature, .. }
            | Self::DateParts { feature, .. } => feature,
        }
    }

    /// Dtype the source column is coerced to before the treatment applies
    #[must_use]
    pub fn source_dtype(&self) -> DType {
        match self {
            Self::Numeric { source_dtype, .. }
            | Self::Indicators { source_dtype, .. }
            | Self::Frequency { source_dtype, .. }
            | Self::Impact { source_dtype, .. } => *source_dtype,
            Self::DateParts { .. } => DType::DateTime,
        }
    }

    /// Output column names, in the order they are produced
    #[must_use]
    pub fn outputs(&self) -> Vec<&str> {
        match self {
            Self::Numeric {
                output,
                missing_indicator,
                ..
            } => std::iter::once(output.as_str())
                .chain(missing_indicator.as_deref())
                .collect(),
            Self::Indicators { levels, rare, .. } => levels
                .iter()
                .map(|l| l.output.as_str())
                .chain(rare.as_ref().map(|r| r.output.as_str()))
                .collect(),
            Self::Frequency { output, .. } | Self::Impact { output, .. } => vec![output.as_str()],
            Self::DateParts { parts, .. } => parts.iter().map(|p| p.output.as_str()).collect(),
        }
    }
}

/// Everything learned while fitting a treatment design
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreatmentPlan {
    pub n_rows: usize,
    pub schema: Vec<ColumnSchema>,
    pub id_features: Vec<String>,
    pub datetime_features: Vec<String>,
    pub target: Option<TargetSummary>,
    pub zero_variance_features: Vec<String>,
    pub features_with_nans: Vec<String>,
    pub treatment_features: Vec<String>,
    pub integer_castables: Vec<String>,
    pub int_features: Vec<String>,
    pub float_features: Vec<String>,
    pub text_features: Vec<String>,
    pub bool_features: Vec<String>,
    pub high_cardinality_features: Vec<String>,
    pub categorical_features: Vec<String>,
    pub treatments: Vec<Treatment>,
}

impl TreatmentPlan {
    /// Column names produced by transform, in order, for an input holding
    /// every id column and the target
    #[must_use]
    pub fn output_columns(&self) -> Vec<String> {
        self.id_features
            .iter()
            .cloned()
            .chain(
                self.treatments
                    .iter()
                    .flat_map(Treatment::outputs)
                    .map(str::to_string),
            )
            .chain(self.target.iter().map(|t| t.name.clone()))
            .collect()
    }

    /// Column names produced by transforming `frame`
    ///
    /// Id columns and the target absent from `frame` are left out, as
    /// transform leaves them out.
    #[must_use]
    pub fn output_columns_for(&self, frame: &Frame) -> Vec<String> {
        let passthrough: Vec<&str> = self
            .id_features
            .iter()
            .map(String::as_str)
            .chain(self.target.iter().map(|t| t.name.as_str()))
            .collect();
        self.output_columns()
            .into_iter()
            .filter(|name| !passthrough.contains(&name.as_str()) || frame.contains(name))
            .collect()
    }

    /// Fitted dtype of a column
    #[must_use]
    pub fn dtype_of(&self, name: &str) -> Option<DType> {
        self.schema.iter().find(|c| c.name == name).map(|c| c.dtype)
    }
}
