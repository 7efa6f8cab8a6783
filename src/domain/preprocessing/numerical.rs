//! Numeric features: fill plus an optional missing-value indicator.

use super::missing::fill_column;
use super::naming::OutputNamer;
use crate::domain::models::frame::{Column, ColumnData, DType};
use crate::domain::models::plan::Treatment;
use crate::domain::models::settings::ColumnSuffixes;

/// Plan the treatment of an int, float or bool feature
#[must_use]
pub fn numeric_treatment(
    feature: &str,
    source_dtype: DType,
    fill_value: f64,
    had_missing: bool,
    suffixes: &ColumnSuffixes,
    namer: &mut OutputNamer,
) -> Treatment {
    let output = namer.claim(feature.to_string());
    let missing_indicator = had_missing.then(|| namer.claim(format!("{feature}{}", suffixes.missing)));
    Treatment::Numeric {
        feature: feature.to_string(),
        source_dtype,
        fill_value,
        output,
        missing_indicator,
    }
}

/// Apply a numeric treatment to a column already coerced to its source dtype
///
/// Int sources keep int output with the truncated fill; float and bool
/// sources produce floats.
#[must_use]
pub fn apply_numeric(column: &Column, fill_value: f64, output: &str, missing_indicator: Option<&str>) -> Vec<Column> {
    let indicator = missing_indicator.map(|name| {
        Column::int(
            name,
            (0..column.len())
                .map(|row| Some(i64::from(column.data().is_null(row))))
                .collect(),
        )
    });

    let filled = fill_column(column, fill_value, "");
    let data = match filled.into_data() {
        ColumnData::Int(v) => ColumnData::Int(v),
        ColumnData::Bool(v) => ColumnData::Float(
            v.into_iter()
                .map(|b| Some(b.map_or(fill_value, |b| if b { 1.0 } else { 0.0 })))
                .collect(),
        ),
        other => {
            let values = (0..other.len())
                .map(|row| Some(other.as_f64(row).unwrap_or(fill_value)))
                .collect();
            ColumnData::Float(values)
        }
    };

    std::iter::once(Column::new(output, data)).chain(indicator).collect()
}
