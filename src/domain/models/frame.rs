//! Frame Domain Model
//!
//! A small in-memory columnar table. Every column carries one typed vector
//! where `None` marks a missing value.

use std::collections::HashSet;
use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::shared::errors::DomainError;

/// Format used when rendering datetime values
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Logical column type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DType {
    Int,
    Float,
    Bool,
    Text,
    DateTime,
}

impl DType {
    /// Int and float columns
    #[must_use]
    pub fn is_numeric(self) -> bool {
        matches!(self, Self::Int | Self::Float)
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Int => "int",
            Self::Float => "float",
            Self::Bool => "bool",
            Self::Text => "text",
            Self::DateTime => "date_time",
        };
        f.write_str(name)
    }
}

/// Typed column values
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    Int(Vec<Option<i64>>),
    Float(Vec<Option<f64>>),
    Bool(Vec<Option<bool>>),
    Text(Vec<Option<String>>),
    DateTime(Vec<Option<NaiveDateTime>>),
}

impl ColumnData {
    #[must_use]
    pub fn dtype(&self) -> DType {
        match self {
            Self::Int(_) => DType::Int,
            Self::Float(_) => DType::Float,
            Self::Bool(_) => DType::Bool,
            Self::Text(_) => DType::Text,
            Self::DateTime(_) => DType::DateTime,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Int(v) => v.len(),
            Self::Float(v) => v.len(),
            Self::Bool(v) => v.len(),
            Self::Text(v) => v.len(),
            Self::DateTime(v) => v.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether the value at `row` is missing. Float NaN counts as missing.
    #[must_use]
    pub fn is_null(&self, row: usize) -> bool {
        match self {
            Self::Int(v) => v[row].is_none(),
            Self::Float(v) => v[row].map_or(true, f64::is_nan),
            Self::Bool(v) => v[row].is_none(),
            Self::Text(v) => v[row].is_none(),
            Self::DateTime(v) => v[row].is_none(),
        }
    }

    #[must_use]
    pub fn null_count(&self) -> usize {
        (0..self.len()).filter(|&row| self.is_null(row)).count()
    }

    /// Numeric view of a value; bools map to 1/0
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(&self, row: usize) -> Option<f64> {
        match self {
            Self::Int(v) => v[row].map(|x| x as f64),
            Self::Float(v) => v[row].filter(|x| !x.is_nan()),
            Self::Bool(v) => v[row].map(|b| if b { 1.0 } else { 0.0 }),
            Self::Text(_) | Self::DateTime(_) => None,
        }
    }

    /// Textual rendering of a value, `None` when missing
    #[must_use]
    pub fn render(&self, row: usize) -> Option<String> {
        match self {
            Self::Int(v) => v[row].map(|x| x.to_string()),
            Self::Float(v) => v[row].filter(|x| !x.is_nan()).map(|x| x.to_string()),
            Self::Bool(v) => v[row].map(|b| b.to_string()),
            Self::Text(v) => v[row].clone(),
            Self::DateTime(v) => v[row].map(|d| d.format(DATETIME_FORMAT).to_string()),
        }
    }

    /// Number of distinct values, counting "missing" as one value
    #[must_use]
    pub fn distinct_count(&self) -> usize {
        match self {
            Self::Int(v) => v.iter().collect::<HashSet<_>>().len(),
            Self::Float(v) => v
                .iter()
                .map(|x| x.filter(|f| !f.is_nan()).map(|f| if f == 0.0 { 0 } else { f.to_bits() }))
                .collect::<HashSet<_>>()
                .len(),
            Self::Bool(v) => v.iter().collect::<HashSet<_>>().len(),
            Self::Text(v) => v.iter().collect::<HashSet<_>>().len(),
            Self::DateTime(v) => v.iter().collect::<HashSet<_>>().len(),
        }
    }
}

/// A named column
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    data: ColumnData,
}

impl Column {
    #[must_use]
    pub fn new(name: impl Into<String>, data: ColumnData) -> Self {
        Self { name: name.into(), data }
    }

    #[must_use]
    pub fn int(name: impl Into<String>, values: Vec<Option<i64>>) -> Self {
        Self::new(name, ColumnData::Int(values))
    }

    #[must_use]
    pub fn float(name: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        Self::new(name, ColumnData::Float(values))
    }

    #[must_use]
    pub fn boolean(name: impl Into<String>, values: Vec<Option<bool>>) -> Self {
        Self::new(name, ColumnData::Bool(values))
    }

    #[must_use]
    pub fn text(name: impl Into<String>, values: Vec<Option<String>>) -> Self {
        Self::new(name, ColumnData::Text(values))
    }

    #[must_use]
    pub fn datetime(name: impl Into<String>, values: Vec<Option<NaiveDateTime>>) -> Self {
        Self::new(name, ColumnData::DateTime(values))
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn data(&self) -> &ColumnData {
        &self.data
    }

    #[must_use]
    pub fn into_data(self) -> ColumnData {
        self.data
    }

    #[must_use]
    pub fn dtype(&self) -> DType {
        self.data.dtype()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[must_use]
    pub fn null_count(&self) -> usize {
        self.data.null_count()
    }

    #[must_use]
    pub fn has_nulls(&self) -> bool {
        (0..self.len()).any(|row| self.data.is_null(row))
    }

    #[must_use]
    pub fn render(&self, row: usize) -> Option<String> {
        self.data.render(row)
    }

    #[must_use]
    pub fn distinct_count(&self) -> usize {
        self.data.distinct_count()
    }
}

/// Column-oriented table
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
    columns: Vec<Column>,
}

impl Frame {
    /// Build a frame, checking that lengths agree and names are unique
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidInput` on ragged columns or duplicate names.
    pub fn new(columns: Vec<Column>) -> Result<Self, DomainError> {
        let mut frame = Self::default();
        for column in columns {
            frame.push(column)?;
        }
        Ok(frame)
    }

    #[must_use]
    pub fn n_rows(&self) -> usize {
        self.columns.first().map_or(0, Column::len)
    }

    #[must_use]
    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    #[must_use]
    pub fn into_columns(self) -> Vec<Column> {
        self.columns
    }

    #[must_use]
    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    #[must_use]
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    /// Append a column at the end
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidInput` if the name is taken or the length differs.
    pub fn push(&mut self, column: Column) -> Result<(), DomainError> {
        if self.contains(&column.name) {
            return Err(DomainError::InvalidInput(format!("duplicate column '{}'", column.name)));
        }
        if !self.columns.is_empty() && column.len() != self.n_rows() {
            return Err(DomainError::InvalidInput(format!(
                "column '{}' has {} rows, expected {}",
                column.name,
                column.len(),
                self.n_rows()
            )));
        }
        self.columns.push(column);
        Ok(())
    }

    /// Swap in a column with the same name, keeping its position
    ///
    /// # Errors
    ///
    /// Returns `DomainError::MissingFeature` if no column has that name, or
    /// `DomainError::InvalidInput` if the length differs.
    pub fn replace(&mut self, column: Column) -> Result<(), DomainError> {
        let n_rows = self.n_rows();
        let slot = self
            .columns
            .iter_mut()
            .find(|c| c.name == column.name)
            .ok_or_else(|| DomainError::MissingFeature(column.name.clone()))?;
        if column.len() != n_rows {
            return Err(DomainError::InvalidInput(format!(
                "column '{}' has {} rows, expected {}",
                column.name,
                column.len(),
                n_rows
            )));
        }
        *slot = column;
        Ok(())
    }

    pub fn remove(&mut self, name: &str) -> Option<Column> {
        let index = self.columns.iter().position(|c| c.name == name)?;
        Some(self.columns.remove(index))
    }

    /// Move a column to the last position; no-op when absent
    pub fn move_to_end(&mut self, name: &str) {
        if let Some(column) = self.remove(name) {
            self.columns.push(column);
        }
    }
}
