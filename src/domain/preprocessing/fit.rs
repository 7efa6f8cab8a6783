//! Treatment design fitting.

use std::collections::HashSet;

use super::categorical::{
    encode_target, fill_level_for, find_high_cardinality_features, frequency_treatment, impact_treatment,
    indicator_treatment,
};
use super::datetime::date_parts_treatment;
use super::dtypes::{apply_overrides, cast_floats_to_ints, column_dtypes, discover_hidden_dtypes, parse_datetimes};
use super::missing::{features_with_nans, fill_missing_values, fill_values};
use super::naming::OutputNamer;
use super::numerical::numeric_treatment;
use super::selection::{reindex_target, treatment_features};
use super::variance::find_zero_variance_features;
use crate::domain::models::frame::{DType, Frame};
use crate::domain::models::plan::{ColumnSchema, TargetSummary, TreatmentPlan};
use crate::domain::models::settings::DesignSettings;
use crate::shared::errors::DomainError;

fn check_frame(frame: &Frame, settings: &DesignSettings) -> Result<(), DomainError> {
    if frame.n_rows() == 0 {
        return Err(DomainError::InvalidInput("dataset has no rows".to_string()));
    }
    let required = settings
        .id_features
        .iter()
        .chain(&settings.datetime_features)
        .chain(settings.dtype_overrides.keys())
        .chain(&settings.target);
    for name in required {
        if !frame.contains(name) {
            return Err(DomainError::MissingFeature(name.clone()));
        }
    }
    check_target(frame, settings.target.as_deref())
}

/// The target must be complete, both as given and after dtype handling
fn check_target(frame: &Frame, target: Option<&str>) -> Result<(), DomainError> {
    if let Some(target) = target.and_then(|t| frame.column(t)) {
        if target.has_nulls() {
            return Err(DomainError::InvalidInput(format!(
                "target '{}' has {} missing values",
                target.name(),
                target.null_count()
            )));
        }
    }
    Ok(())
}

/// Design the treatments of `frame`
///
/// The input frame is not modified; every intermediate result is recorded on
/// the returned plan.
///
/// # Errors
///
/// - `DomainError::InvalidSettings` when the settings are inconsistent
/// - `DomainError::MissingFeature` when a configured column is absent
/// - `DomainError::InvalidInput` when the data cannot be fitted
pub fn fit(frame: &Frame, settings: &DesignSettings) -> Result<TreatmentPlan, DomainError> {
    settings.validate().map_err(DomainError::InvalidSettings)?;
    check_frame(frame, settings)?;

    let mut work = frame.clone();
    let ids = &settings.id_features;
    let target = settings.target.as_deref();

    apply_overrides(&mut work, &settings.dtype_overrides)?;
    if settings.find_hidden_dtypes {
        let skip: Vec<&str> = ids
            .iter()
            .chain(settings.dtype_overrides.keys())
            .map(String::as_str)
            .collect();
        let changes = discover_hidden_dtypes(&mut work, &skip);
        tracing::debug!(discovered = changes.len(), "Hidden dtypes discovered");
    }
    parse_datetimes(&mut work, &settings.datetime_features)?;
    check_target(&work, target)?;

    let schema: Vec<ColumnSchema> = work
        .columns()
        .iter()
        .map(|c| ColumnSchema {
            name: c.name().to_string(),
            dtype: c.dtype(),
        })
        .collect();

    let mut datetime_features = settings.datetime_features.clone();
    for column in work.columns() {
        let name = column.name();
        if column.dtype() == DType::DateTime
            && !datetime_features.iter().any(|f| f == name)
            && !ids.iter().any(|f| f == name)
            && target != Some(name)
        {
            datetime_features.push(name.to_string());
        }
    }

    let candidates = treatment_features(&work, ids, &datetime_features, target, &[]);
    let features_with_nans = features_with_nans(&work);
    let fills = fill_values(&work, &candidates, settings);
    fill_missing_values(&mut work, &candidates, &fills);

    let zero_variance_features =
        find_zero_variance_features(&work, &candidates, settings.exclude_zero_variance_features);
    let treatment_features = treatment_features(&work, ids, &datetime_features, target, &zero_variance_features);
    reindex_target(&mut work, target);

    let integer_castables = if settings.floats_to_ints {
        cast_floats_to_ints(&mut work, &treatment_features)
    } else {
        Vec::new()
    };
    let dtypes = column_dtypes(&work, &treatment_features);

    let level_candidates: Vec<String> = treatment_features
        .iter()
        .filter(|f| dtypes.texts.contains(f) || (settings.ints_to_categorical && dtypes.ints.contains(f)))
        .cloned()
        .collect();
    let split = find_high_cardinality_features(
        &work,
        &level_candidates,
        settings.rare_level_threshold,
        settings.allowable_rare_percentage,
    );
    let categorical: HashSet<&String> = split.categorical.iter().collect();
    let coded: HashSet<&String> = split
        .high_cardinality
        .iter()
        .filter(|f| dtypes.texts.contains(f))
        .collect();

    let encoding = match target.and_then(|t| work.column(t)) {
        Some(column) if !coded.is_empty() => Some(encode_target(column, settings)?),
        _ => None,
    };

    let mut namer = OutputNamer::new(ids.iter().map(String::as_str).chain(target));
    let n_rows = work.n_rows();
    let mut treatments = Vec::new();
    for column in work.columns() {
        let name = column.name().to_string();
        let fill = fills.numeric_or(&name, settings.numerical_fill_value);

        if datetime_features.contains(&name) {
            if settings.expand_datetimes {
                treatments.push(date_parts_treatment(&name, settings.numerical_fill_value, &mut namer));
            }
            continue;
        }
        if !treatment_features.contains(&name) {
            continue;
        }

        let fill_level = fill_level_for(column.data(), fill, &fills.categorical);
        if categorical.contains(&name) {
            treatments.push(indicator_treatment(column, &fill_level, n_rows, settings, &mut namer));
        } else if coded.contains(&name) {
            treatments.push(frequency_treatment(column, &fill_level, n_rows, &settings.suffixes, &mut namer));
            if let Some(encoding) = &encoding {
                treatments.push(impact_treatment(column, &fill_level, encoding, settings, &mut namer));
            }
        } else if column.dtype() != DType::Text {
            treatments.push(numeric_treatment(
                &name,
                column.dtype(),
                fill,
                features_with_nans.contains(&name),
                &settings.suffixes,
                &mut namer,
            ));
        }
    }

    let target = settings.target.as_ref().map(|name| TargetSummary {
        name: name.clone(),
        target_type: settings.target_type,
        positive_class: encoding
            .as_ref()
            .and_then(|e| e.positive_class.clone())
            .or_else(|| settings.positive_class.clone()),
        mean: encoding.as_ref().map(|e| e.mean),
    });

    tracing::debug!(
        rows = n_rows,
        treatment_features = treatment_features.len(),
        treatments = treatments.len(),
        zero_variance = zero_variance_features.len(),
        "Treatment plan fitted"
    );

    Ok(TreatmentPlan {
        n_rows,
        schema,
        id_features: ids.clone(),
        datetime_features,
        target,
        zero_variance_features,
        features_with_nans,
        treatment_features,
        integer_castables,
        int_features: dtypes.ints,
        float_features: dtypes.floats,
        text_features: dtypes.texts,
        bool_features: dtypes.bools,
        high_cardinality_features: split.high_cardinality,
        categorical_features: split.categorical,
        treatments,
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use std::collections::BTreeMap;

    use chrono::NaiveDate;

    use super::*;
    use crate::domain::models::frame::Column;
    use crate::domain::models::plan::Treatment;

    fn text(name: &str, values: &[Option<&str>]) -> Column {
        Column::text(name, values.iter().map(|v| v.map(str::to_string)).collect())
    }

    /// Mixed-dtype training frame with hidden dtypes, gaps and constant columns
    pub(crate) fn training_frame() -> Frame {
        let day = NaiveDate::from_ymd_opt(2017, 6, 14).and_then(|d| d.and_hms_opt(0, 0, 0));
        Frame::new(vec![
            text("index", &[Some("100A"), Some("101A"), Some("102A"), Some("103A"), Some("104A")]),
            Column::datetime("datetime", vec![day; 5]),
            Column::int("target", vec![Some(1), Some(1), Some(0), Some(1), Some(1)]),
            Column::float("n", vec![None, Some(1.0), Some(2.0), Some(3.0), Some(4.0)]),
            text("nn", &[Some("1"), Some("2"), Some("3"), Some("4"), Some("")]),
            text("nnn", &[Some("1"), Some("2"), Some("3"), Some("4"), None]),
            Column::float("f", vec![Some(0.0), Some(1.1), Some(2.2), Some(3.3), Some(4.4)]),
            Column::float("ff", vec![Some(0.0), Some(1.1), Some(2.2), Some(3.3), None]),
            text("fff", &[Some("0.0"), Some("1.1"), Some("2.2"), Some("3.3"), Some("4.4")]),
            Column::boolean("i", vec![Some(true), Some(false), Some(true), Some(false), Some(true)]),
            text("ii", &[Some("true"), Some("false"), Some("true"), Some("false"), Some("true")]),
            text("c", &[Some("a"), Some("b"), Some("a"), Some("b"), Some("a")]),
            text("cc", &[Some("a"), Some("a"), Some("b"), Some("b"), None]),
            text("ccc", &[Some("a"), Some("b"), Some("c"), Some("d"), Some("e")]),
            text("z", &[Some("a"); 5]),
            Column::int("zz", vec![Some(0); 5]),
            Column::float("zzz", vec![Some(0.0); 5]),
        ])
        .unwrap()
    }

    pub(crate) fn training_settings() -> DesignSettings {
        DesignSettings {
            id_features: vec!["index".to_string()],
            datetime_features: vec!["datetime".to_string()],
            target: Some("target".to_string()),
            find_hidden_dtypes: true,
            floats_to_ints: true,
            ints_to_categorical: false,
            rare_level_threshold: 0.2,
            allowable_rare_percentage: 0.2,
            ..Default::default()
        }
    }

    #[test]
    fn test_fit_records_feature_lists() {
        let plan = fit(&training_frame(), &training_settings()).unwrap();

        assert_eq!(plan.n_rows, 5);
        assert_eq!(plan.zero_variance_features, vec!["z", "zz", "zzz"]);
        assert_eq!(
            plan.treatment_features,
            vec!["n", "nn", "nnn", "f", "ff", "fff", "i", "ii", "c", "cc", "ccc"]
        );
        assert_eq!(plan.features_with_nans, vec!["n", "nn", "nnn", "ff", "cc"]);
        assert_eq!(plan.integer_castables, vec!["n"]);
        assert_eq!(plan.int_features, vec!["n", "nn", "nnn"]);
        assert_eq!(plan.float_features, vec!["f", "ff", "fff"]);
        assert_eq!(plan.text_features, vec!["c", "cc", "ccc"]);
        assert_eq!(plan.bool_features, vec!["i", "ii"]);
        assert_eq!(plan.high_cardinality_features, vec!["ccc"]);
        assert_eq!(plan.categorical_features, vec!["c", "cc"]);
        assert_eq!(plan.dtype_of("nn"), Some(DType::Int));
        assert_eq!(plan.dtype_of("index"), Some(DType::Text));
    }

    #[test]
    fn test_fit_output_columns() {
        let plan = fit(&training_frame(), &training_settings()).unwrap();

        assert_eq!(
            plan.output_columns(),
            vec![
                "index",
                "n",
                "n_isbad",
                "nn",
                "nn_isbad",
                "nnn",
                "nnn_isbad",
                "f",
                "ff",
                "ff_isbad",
                "fff",
                "i",
                "ii",
                "c_lev_a",
                "c_lev_b",
                "cc_lev_a",
                "cc_lev_b",
                "cc_lev_rare",
                "ccc_freq",
                "ccc_impact",
                "target",
            ]
        );
    }

    #[test]
    fn test_fit_impact_codes_against_target_mean() {
        let plan = fit(&training_frame(), &training_settings()).unwrap();
        let target = plan.target.as_ref().unwrap();
        assert_eq!(target.positive_class.as_deref(), Some("1"));
        assert!((target.mean.unwrap() - 0.8).abs() < 1e-9);

        let effects: BTreeMap<String, f64> = plan
            .treatments
            .iter()
            .find_map(|t| match t {
                Treatment::Impact { effects, .. } => Some(effects.clone()),
                _ => None,
            })
            .unwrap();
        assert!((effects["a"] - 0.2).abs() < 1e-9);
        assert!((effects["c"] + 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_ints_to_categorical_classifies_ints() {
        let settings = DesignSettings {
            ints_to_categorical: true,
            ..training_settings()
        };
        let plan = fit(&training_frame(), &settings).unwrap();
        assert_eq!(plan.high_cardinality_features, vec!["n", "nn", "nnn", "ccc"]);
        // High-cardinality ints keep a numeric treatment
        assert!(plan.output_columns().contains(&"n_isbad".to_string()));
    }

    #[test]
    fn test_without_target_there_is_no_impact_code() {
        let settings = DesignSettings {
            target: None,
            ..training_settings()
        };
        let plan = fit(&training_frame(), &settings).unwrap();
        let outputs = plan.output_columns();
        assert!(outputs.contains(&"ccc_freq".to_string()));
        assert!(!outputs.contains(&"ccc_impact".to_string()));
        assert!(outputs.contains(&"target".to_string()));
        assert!(plan.target.is_none());
    }

    #[test]
    fn test_expand_datetimes() {
        let settings = DesignSettings {
            expand_datetimes: true,
            ..training_settings()
        };
        let plan = fit(&training_frame(), &settings).unwrap();
        let outputs = plan.output_columns();
        assert_eq!(&outputs[1..6], &["datetime_year", "datetime_month", "datetime_day", "datetime_dayofweek", "datetime_hour"]);
    }

    #[test]
    fn test_fit_rejects_bad_input() {
        let settings = DesignSettings {
            target: Some("missing".to_string()),
            ..training_settings()
        };
        assert!(matches!(
            fit(&training_frame(), &settings),
            Err(DomainError::MissingFeature(name)) if name == "missing"
        ));

        let settings = DesignSettings {
            rare_level_threshold: 2.0,
            ..training_settings()
        };
        assert!(matches!(
            fit(&training_frame(), &settings),
            Err(DomainError::InvalidSettings(_))
        ));

        let settings = DesignSettings {
            target: Some("cc".to_string()),
            ..training_settings()
        };
        assert!(matches!(
            fit(&training_frame(), &settings),
            Err(DomainError::InvalidInput(_))
        ));

        let empty = Frame::new(vec![Column::int("a", vec![])]).unwrap();
        assert!(fit(&empty, &DesignSettings::default()).is_err());
    }

    #[test]
    fn test_fit_rejects_target_blank_after_dtype_discovery() {
        let frame = Frame::new(vec![
            text("y", &[Some("1"), Some("0"), Some(" "), Some("1"), Some("0"), Some("1")]),
            Column::float("x", vec![Some(0.5), Some(1.5), Some(2.5), Some(3.5), Some(4.5), Some(5.5)]),
        ])
        .unwrap();
        let settings = DesignSettings {
            target: Some("y".to_string()),
            find_hidden_dtypes: true,
            ..Default::default()
        };

        assert!(matches!(
            fit(&frame, &settings),
            Err(DomainError::InvalidInput(message)) if message.contains("missing values")
        ));

        let settings = DesignSettings {
            find_hidden_dtypes: false,
            ..settings
        };
        assert!(fit(&frame, &settings).is_ok());
    }

    #[test]
    fn test_fit_leaves_input_untouched() {
        let frame = training_frame();
        fit(&frame, &training_settings()).unwrap();
        assert_eq!(frame, training_frame());
    }
}
