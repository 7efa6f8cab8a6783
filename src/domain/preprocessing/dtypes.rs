//! Dtype discovery, overrides and casting.

use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::domain::models::frame::{Column, ColumnData, DType, Frame, DATETIME_FORMAT};
use crate::shared::errors::DomainError;

const DATETIME_FORMATS: [&str; 4] = [
    DATETIME_FORMAT,
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
];

/// Largest float that still converts to `i64` without losing integrality
const MAX_EXACT_INT: f64 = 9_007_199_254_740_992.0;

/// Parse the datetime layouts accepted for datetime columns
#[must_use]
pub fn parse_datetime(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|d| d.naive_utc()))
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// `true` / `false` in any capitalization, surrounding whitespace ignored
#[must_use]
pub fn parse_bool(raw: &str) -> Option<bool> {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("true") {
        Some(true)
    } else if raw.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

/// One non-missing cell
#[derive(Debug, Clone, Copy)]
enum Scalar<'a> {
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(&'a str),
    DateTime(NaiveDateTime),
}

impl Scalar<'_> {
    fn read(data: &ColumnData, row: usize) -> Option<Scalar<'_>> {
        match data {
            ColumnData::Int(v) => v[row].map(Scalar::Int),
            ColumnData::Float(v) => v[row].filter(|x| !x.is_nan()).map(Scalar::Float),
            ColumnData::Bool(v) => v[row].map(Scalar::Bool),
            ColumnData::Text(v) => v[row]
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(Scalar::Text),
            ColumnData::DateTime(v) => v[row].map(Scalar::DateTime),
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    fn to_int(self) -> Option<i64> {
        match self {
            Self::Int(x) => Some(x),
            Self::Float(x) => (x.fract() == 0.0 && x.abs() <= MAX_EXACT_INT).then(|| x as i64),
            Self::Bool(b) => Some(i64::from(b)),
            Self::Text(s) => s
                .parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(|f| Self::Float(f).to_int())),
            Self::DateTime(_) => None,
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn to_float(self) -> Option<f64> {
        match self {
            Self::Int(x) => Some(x as f64),
            Self::Float(x) => Some(x),
            Self::Bool(b) => Some(if b { 1.0 } else { 0.0 }),
            Self::Text(s) => s.parse::<f64>().ok().filter(|f| !f.is_nan()),
            Self::DateTime(_) => None,
        }
    }

    fn to_bool(self) -> Option<bool> {
        match self {
            Self::Int(0) => Some(false),
            Self::Int(1) => Some(true),
            Self::Float(x) if x == 0.0 => Some(false),
            Self::Float(x) if x == 1.0 => Some(true),
            Self::Bool(b) => Some(b),
            Self::Text(s) => parse_bool(s).or(match s {
                "0" => Some(false),
                "1" => Some(true),
                _ => None,
            }),
            _ => None,
        }
    }

    fn to_text(self) -> Option<String> {
        Some(match self {
            Self::Int(x) => x.to_string(),
            Self::Float(x) => x.to_string(),
            Self::Bool(b) => b.to_string(),
            Self::Text(s) => s.to_string(),
            Self::DateTime(d) => d.format(DATETIME_FORMAT).to_string(),
        })
    }

    fn to_datetime(self) -> Option<NaiveDateTime> {
        match self {
            Self::Text(s) => parse_datetime(s),
            Self::DateTime(d) => Some(d),
            _ => None,
        }
    }
}

/// Result of converting a column to another dtype
#[derive(Debug, Clone)]
pub struct Conversion {
    pub column: Column,
    /// Rows holding a value that could not be converted; they become missing
    pub failed_rows: Vec<usize>,
}

fn convert_values<T>(
    data: &ColumnData,
    failed_rows: &mut Vec<usize>,
    convert: impl Fn(Scalar<'_>) -> Option<T>,
) -> Vec<Option<T>> {
    (0..data.len())
        .map(|row| {
            let value = Scalar::read(data, row)?;
            let converted = convert(value);
            if converted.is_none() {
                failed_rows.push(row);
            }
            converted
        })
        .collect()
}

/// Convert a column to `dtype`, recording rows that do not convert
#[must_use]
pub fn convert(column: &Column, dtype: DType) -> Conversion {
    if column.dtype() == dtype {
        return Conversion {
            column: column.clone(),
            failed_rows: Vec::new(),
        };
    }
    let data = column.data();
    let mut failed_rows = Vec::new();
    let converted = match dtype {
        DType::Int => ColumnData::Int(convert_values(data, &mut failed_rows, |s| s.to_int())),
        DType::Float => ColumnData::Float(convert_values(data, &mut failed_rows, |s| s.to_float())),
        DType::Bool => ColumnData::Bool(convert_values(data, &mut failed_rows, |s| s.to_bool())),
        DType::Text => ColumnData::Text(convert_values(data, &mut failed_rows, |s| s.to_text())),
        DType::DateTime => ColumnData::DateTime(convert_values(data, &mut failed_rows, |s| s.to_datetime())),
    };
    Conversion {
        column: Column::new(column.name(), converted),
        failed_rows,
    }
}

/// Force the dtype of named columns
///
/// # Errors
///
/// Returns `DomainError::MissingFeature` for an unknown column and
/// `DomainError::InvalidInput` naming the first value that does not convert.
pub fn apply_overrides(frame: &mut Frame, overrides: &BTreeMap<String, DType>) -> Result<(), DomainError> {
    for (name, dtype) in overrides {
        let column = frame
            .column(name)
            .ok_or_else(|| DomainError::MissingFeature(name.clone()))?;
        let conversion = convert(column, *dtype);
        if let Some(&row) = conversion.failed_rows.first() {
            return Err(DomainError::InvalidInput(format!(
                "cannot convert column '{}' to {}: row {} holds '{}'",
                name,
                dtype,
                row,
                column.render(row).unwrap_or_default()
            )));
        }
        frame.replace(conversion.column)?;
    }
    Ok(())
}

fn parse_all<'a, T>(values: &[Option<&'a str>], parse: impl Fn(&'a str) -> Option<T>) -> Option<Vec<Option<T>>> {
    values
        .iter()
        .map(|value| match value {
            None => Some(None),
            Some(raw) => parse(raw).map(Some),
        })
        .collect()
}

/// Infer the real dtype of text values; `None` when they are plain text
fn infer_text(values: &[Option<String>]) -> Option<ColumnData> {
    let trimmed: Vec<Option<&str>> = values
        .iter()
        .map(|v| v.as_deref().map(str::trim).filter(|s| !s.is_empty()))
        .collect();
    if trimmed.iter().all(Option::is_none) {
        return None;
    }

    if let Some(ints) = parse_all(&trimmed, |s| s.parse::<i64>().ok()) {
        return Some(ColumnData::Int(ints));
    }
    if let Some(floats) = parse_all(&trimmed, |s| s.parse::<f64>().ok().filter(|f| !f.is_nan())) {
        return Some(ColumnData::Float(floats));
    }
    if let Some(bools) = parse_all(&trimmed, parse_bool) {
        let distinct: HashSet<bool> = bools.iter().flatten().copied().collect();
        if distinct.len() == 2 {
            return Some(ColumnData::Bool(bools));
        }
    }
    parse_all(&trimmed, parse_datetime).map(ColumnData::DateTime)
}

/// Find numbers, booleans and datetimes stored as text
///
/// Returns the columns whose dtype changed, with their new dtype.
pub fn discover_hidden_dtypes(frame: &mut Frame, skip: &[&str]) -> Vec<(String, DType)> {
    let discovered: Vec<Column> = frame
        .columns()
        .iter()
        .filter(|c| !skip.contains(&c.name()))
        .filter_map(|c| match c.data() {
            ColumnData::Text(values) => infer_text(values).map(|data| Column::new(c.name(), data)),
            _ => None,
        })
        .collect();

    discovered
        .into_iter()
        .filter_map(|column| {
            let change = (column.name().to_string(), column.dtype());
            frame.replace(column).ok().map(|()| change)
        })
        .collect()
}

/// Parse the named text columns as datetimes; unparseable values become missing
///
/// # Errors
///
/// Returns `DomainError::MissingFeature` for an unknown column.
pub fn parse_datetimes(frame: &mut Frame, names: &[String]) -> Result<(), DomainError> {
    for name in names {
        let column = frame
            .column(name)
            .ok_or_else(|| DomainError::MissingFeature(name.clone()))?;
        if column.dtype() != DType::Text {
            continue;
        }
        let conversion = convert(column, DType::DateTime);
        if !conversion.failed_rows.is_empty() {
            tracing::warn!(
                feature = %name,
                failed = conversion.failed_rows.len(),
                "Unparseable datetime values treated as missing"
            );
        }
        frame.replace(conversion.column)?;
    }
    Ok(())
}

/// Cast float features whose values are all integral to int
///
/// Returns the names of the cast features.
pub fn cast_floats_to_ints(frame: &mut Frame, features: &[String]) -> Vec<String> {
    let mut castables = Vec::new();
    for name in features {
        let Some(column) = frame.column(name) else {
            continue;
        };
        if column.dtype() != DType::Float {
            continue;
        }
        let conversion = convert(column, DType::Int);
        if conversion.failed_rows.is_empty() && frame.replace(conversion.column).is_ok() {
            castables.push(name.clone());
        }
    }
    castables
}

/// Treatment features split by dtype
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureDtypes {
    pub ints: Vec<String>,
    pub floats: Vec<String>,
    pub texts: Vec<String>,
    pub bools: Vec<String>,
}

/// Split `features` by dtype, keeping their order
#[must_use]
pub fn column_dtypes(frame: &Frame, features: &[String]) -> FeatureDtypes {
    let mut dtypes = FeatureDtypes::default();
    for name in features {
        let Some(column) = frame.column(name) else {
            continue;
        };
        let bucket = match column.dtype() {
            DType::Int => &mut dtypes.ints,
            DType::Float => &mut dtypes.floats,
            DType::Text => &mut dtypes.texts,
            DType::Bool => &mut dtypes.bools,
            DType::DateTime => continue,
        };
        bucket.push(name.clone());
    }
    dtypes
}
