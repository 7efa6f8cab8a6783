//! Missing value discovery and filling.

use std::collections::BTreeMap;

use crate::domain::models::frame::{Column, ColumnData, DType, Frame};
use crate::domain::models::settings::{DesignSettings, MissingNumericalStrategy};

/// Fill values chosen for one frame
#[derive(Debug, Clone, PartialEq)]
pub struct FillValues {
    /// Per numeric (int, float, bool) column
    pub numeric: BTreeMap<String, f64>,
    pub categorical: String,
}

impl FillValues {
    /// Fill for a numeric column, falling back to `default`
    #[must_use]
    pub fn numeric_or(&self, feature: &str, default: f64) -> f64 {
        self.numeric.get(feature).copied().unwrap_or(default)
    }
}

/// Names of the columns holding at least one missing value
#[must_use]
pub fn features_with_nans(frame: &Frame) -> Vec<String> {
    frame
        .columns()
        .iter()
        .filter(|c| c.has_nulls())
        .map(|c| c.name().to_string())
        .collect()
}

#[allow(clippy::cast_precision_loss)]
fn mean(data: &ColumnData) -> Option<f64> {
    let values: Vec<f64> = (0..data.len()).filter_map(|row| data.as_f64(row)).collect();
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Choose the fill value of every numeric column in `features`
#[must_use]
pub fn fill_values(frame: &Frame, features: &[String], settings: &DesignSettings) -> FillValues {
    let numeric = features
        .iter()
        .filter_map(|name| frame.column(name))
        .filter(|c| c.dtype().is_numeric() || c.dtype() == DType::Bool)
        .map(|c| {
            let fill = match settings.missing_numerical_strategy {
                MissingNumericalStrategy::Systematically => settings.numerical_fill_value,
                MissingNumericalStrategy::Random => mean(c.data()).unwrap_or(settings.numerical_fill_value),
            };
            (c.name().to_string(), fill)
        })
        .collect();

    FillValues {
        numeric,
        categorical: settings.categorical_fill_value.clone(),
    }
}

/// Int fill derived from a float fill, truncating toward zero
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn int_fill(fill: f64) -> i64 {
    fill.trunc() as i64
}

/// Fill one column; datetime columns are returned unchanged
#[must_use]
pub fn fill_column(column: &Column, numeric_fill: f64, categorical_fill: &str) -> Column {
    if !column.has_nulls() {
        return column.clone();
    }
    let data = match column.data() {
        ColumnData::Int(v) => ColumnData::Int(v.iter().map(|x| Some(x.unwrap_or(int_fill(numeric_fill)))).collect()),
        ColumnData::Float(v) => ColumnData::Float(
            v.iter()
                .map(|x| Some(x.filter(|f| !f.is_nan()).unwrap_or(numeric_fill)))
                .collect(),
        ),
        ColumnData::Bool(v) => ColumnData::Float(
            v.iter()
                .map(|x| Some(x.map_or(numeric_fill, |b| if b { 1.0 } else { 0.0 })))
                .collect(),
        ),
        ColumnData::Text(v) => ColumnData::Text(
            v.iter()
                .map(|x| Some(x.clone().unwrap_or_else(|| categorical_fill.to_string())))
                .collect(),
        ),
        ColumnData::DateTime(_) => return column.clone(),
    };
    Column::new(column.name(), data)
}

/// Fill the missing values of `features` in place
pub fn fill_missing_values(frame: &mut Frame, features: &[String], fills: &FillValues) {
    for name in features {
        let Some(column) = frame.column(name) else {
            continue;
        };
        let filled = fill_column(column, fills.numeric_or(name, 0.0), &fills.categorical);
        if let Err(err) = frame.replace(filled) {
            tracing::warn!(feature = %name, error = %err, "Could not fill missing values");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame() -> Frame {
        Frame::new(vec![
            Column::float("n", vec![None, Some(1.0), Some(2.0), Some(3.0), Some(4.0)]),
            Column::int("nnn", vec![Some(1), Some(2), Some(3), Some(4), None]),
            Column::float("ff", vec![Some(0.0), Some(1.1), Some(2.2), Some(3.3), Some(f64::NAN)]),
            Column::text(
                "cc",
                vec![Some("a".into()), Some("a".into()), Some("b".into()), Some("b".into()), None],
            ),
            Column::boolean("b", vec![Some(true), None, Some(false), Some(true), Some(true)]),
            Column::int("full", vec![Some(1), Some(2), Some(3), Some(4), Some(5)]),
        ])
        .unwrap()
    }

    #[test]
    fn test_features_with_nans() {
        assert_eq!(features_with_nans(&frame()), vec!["n", "nnn", "ff", "cc", "b"]);
    }

    #[test]
    fn test_fill_systematically() {
        let mut frame = frame();
        let features = frame.column_names();
        let fills = fill_values(&frame, &features, &DesignSettings::default());

        fill_missing_values(&mut frame, &features, &fills);

        assert_eq!(frame.column("n").unwrap().render(0).as_deref(), Some("-1"));
        assert_eq!(
            frame.column("nnn").unwrap().data(),
            &ColumnData::Int(vec![Some(1), Some(2), Some(3), Some(4), Some(-1)])
        );
        assert_eq!(frame.column("ff").unwrap().data().as_f64(4), Some(-1.0));
        assert_eq!(frame.column("cc").unwrap().render(4).as_deref(), Some("NA"));
        assert_eq!(
            frame.column("b").unwrap().data(),
            &ColumnData::Float(vec![Some(1.0), Some(-1.0), Some(0.0), Some(1.0), Some(1.0)])
        );
        assert_eq!(frame.column("full").unwrap().dtype(), DType::Int);
        assert!(features_with_nans(&frame).is_empty());
    }

    #[test]
    fn test_fill_with_mean() {
        let frame = frame();
        let settings = DesignSettings {
            missing_numerical_strategy: MissingNumericalStrategy::Random,
            ..Default::default()
        };
        let fills = fill_values(&frame, &frame.column_names(), &settings);

        assert!((fills.numeric["n"] - 2.5).abs() < 1e-9);
        assert!((fills.numeric["nnn"] - 2.5).abs() < 1e-9);
        assert!((fills.numeric["b"] - 0.75).abs() < 1e-9);
        assert!(!fills.numeric.contains_key("cc"));
    }

    #[test]
    fn test_mean_of_empty_column_falls_back() {
        let frame = Frame::new(vec![Column::float("e", vec![None, None])]).unwrap();
        let settings = DesignSettings {
            missing_numerical_strategy: MissingNumericalStrategy::Random,
            numerical_fill_value: -9.0,
            ..Default::default()
        };
        let fills = fill_values(&frame, &frame.column_names(), &settings);
        assert!((fills.numeric["e"] - -9.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_int_fill_truncates() {
        assert_eq!(int_fill(-1.7), -1);
        assert_eq!(int_fill(2.9), 2);
    }
}
