//! Dataset Sources
//!
//! Where a table comes from and how it is encoded.

use serde::{Deserialize, Serialize};

/// Wire encoding of a table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatasetFormat {
    #[default]
    Csv,
    /// Column-oriented JSON object: `{"column": [values...]}`
    Columns,
}

impl DatasetFormat {
    #[must_use]
    pub fn content_type(self) -> &'static str {
        match self {
            Self::Csv => "text/csv; charset=utf-8",
            Self::Columns => "application/json",
        }
    }

    /// Guess the format of a remote dataset from its content type, then its URL
    #[must_use]
    pub fn detect(content_type: Option<&str>, url: &str) -> Self {
        if content_type.is_some_and(|ct| ct.contains("json")) {
            return Self::Columns;
        }
        let path = url.split(['?', '#']).next().unwrap_or(url);
        if path.to_ascii_lowercase().ends_with(".json") {
            Self::Columns
        } else {
            Self::Csv
        }
    }
}

/// Table supplied with a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatasetSource {
    Inline { format: DatasetFormat, body: Vec<u8> },
    Remote { url: String, format: Option<DatasetFormat> },
}

/// Raw bytes of a dataset fetched from a remote location
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedDataset {
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_format() {
        assert_eq!(
            DatasetFormat::detect(Some("application/json; charset=utf-8"), "https://x.io/data"),
            DatasetFormat::Columns
        );
        assert_eq!(
            DatasetFormat::detect(None, "https://x.io/data.JSON?token=1"),
            DatasetFormat::Columns
        );
        assert_eq!(DatasetFormat::detect(Some("text/plain"), "https://x.io/data.csv"), DatasetFormat::Csv);
        assert_eq!(DatasetFormat::detect(None, "https://x.io/data"), DatasetFormat::Csv);
    }
}
