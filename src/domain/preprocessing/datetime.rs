//! Datetime expansion into numeric parts.

use chrono::{Datelike, NaiveDateTime, Timelike};

use super::naming::OutputNamer;
use crate::domain::models::frame::{Column, ColumnData};
use crate::domain::models::plan::{DatePart, DatePartOutput, Treatment};

/// Numeric value of one part; Monday is day 0 of the week
#[must_use]
pub fn date_part(value: &NaiveDateTime, part: DatePart) -> i64 {
    match part {
        DatePart::Year => i64::from(value.year()),
        DatePart::Month => i64::from(value.month()),
        DatePart::Day => i64::from(value.day()),
        DatePart::DayOfWeek => i64::from(value.weekday().num_days_from_monday()),
        DatePart::Hour => i64::from(value.hour()),
    }
}

/// Plan the expansion of a datetime feature
#[must_use]
pub fn date_parts_treatment(feature: &str, fill_value: f64, namer: &mut OutputNamer) -> Treatment {
    let parts = DatePart::ALL
        .iter()
        .map(|&part| DatePartOutput {
            part,
            output: namer.claim(format!("{feature}{}", part.suffix())),
        })
        .collect();
    Treatment::DateParts {
        feature: feature.to_string(),
        fill_value,
        parts,
    }
}

/// One float column per part; missing datetimes take `fill_value`
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn apply_date_parts(column: &Column, fill_value: f64, parts: &[DatePartOutput]) -> Vec<Column> {
    let values: &[Option<NaiveDateTime>] = match column.data() {
        ColumnData::DateTime(v) => v,
        _ => &[],
    };
    parts
        .iter()
        .map(|p| {
            let data = (0..column.len())
                .map(|row| {
                    Some(
                        values
                            .get(row)
                            .copied()
                            .flatten()
                            .map_or(fill_value, |d| date_part(&d, p.part) as f64),
                    )
                })
                .collect();
            Column::float(p.output.clone(), data)
        })
        .collect()
}
