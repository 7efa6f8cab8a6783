//! Applying a fitted plan to new data.

use super::categorical::{apply_code, apply_indicators, row_levels};
use super::datetime::apply_date_parts;
use super::dtypes::convert;
use super::numerical::apply_numeric;
use crate::domain::models::frame::{Column, Frame};
use crate::domain::models::plan::{Treatment, TreatmentPlan};
use crate::shared::errors::DomainError;

fn apply(treatment: &Treatment, column: &Column) -> Vec<Column> {
    match treatment {
        Treatment::Numeric {
            fill_value,
            output,
            missing_indicator,
            ..
        } => apply_numeric(column, *fill_value, output, missing_indicator.as_deref()),
        Treatment::Indicators {
            fill_level,
            levels,
            rare,
            ..
        } => apply_indicators(&row_levels(column, fill_level), levels, rare.as_ref()),
        Treatment::Frequency {
            fill_level,
            output,
            frequencies,
            ..
        } => vec![apply_code(output, &row_levels(column, fill_level), frequencies)],
        Treatment::Impact {
            fill_level,
            output,
            effects,
            ..
        } => vec![apply_code(output, &row_levels(column, fill_level), effects)],
        Treatment::DateParts {
            fill_value, parts, ..
        } => apply_date_parts(column, *fill_value, parts),
    }
}

/// Apply `plan` to `frame`
///
/// Output columns are the id columns present in `frame`, then the treated
/// columns in plan order, then the target when present.
///
/// # Errors
///
/// Returns `DomainError::MissingFeature` when a treated column is absent.
pub fn transform(plan: &TreatmentPlan, frame: &Frame) -> Result<Frame, DomainError> {
    if let Some(missing) = plan.treatments.iter().map(Treatment::feature).find(|f| !frame.contains(f)) {
        return Err(DomainError::MissingFeature(missing.to_string()));
    }

    let mut output = Frame::default();
    for id in &plan.id_features {
        if let Some(column) = frame.column(id) {
            output.push(column.clone())?;
        }
    }

    for treatment in &plan.treatments {
        let feature = treatment.feature();
        let source = frame
            .column(feature)
            .ok_or_else(|| DomainError::MissingFeature(feature.to_string()))?;
        let conversion = convert(source, treatment.source_dtype());
        if !conversion.failed_rows.is_empty() {
            tracing::warn!(
                feature = %feature,
                dtype = %treatment.source_dtype(),
                failed = conversion.failed_rows.len(),
                "Values not matching the fitted dtype treated as missing"
            );
        }
        for column in apply(treatment, &conversion.column) {
            output.push(column)?;
        }
    }

    if let Some(column) = plan.target.as_ref().and_then(|t| frame.column(&t.name)) {
        output.push(column.clone())?;
    }

    tracing::debug!(rows = output.n_rows(), columns = output.n_cols(), "Dataset transformed");
    Ok(output)
}
