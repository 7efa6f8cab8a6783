//! Dataset DTOs
//!
//! How a request carries its table: inline CSV text, an inline column
//! object, or a URL to download.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::models::dataset::{DatasetFormat, DatasetSource};

/// Validates a URL format (must start with http:// or https:// and name a host)
pub(crate) fn validate_url(url: &str) -> Result<(), validator::ValidationError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        let mut error = validator::ValidationError::new("url");
        error.message = Some("URL must start with http:// or https://".into());
        return Err(error);
    }

    let without_protocol = url.strip_prefix("https://").or_else(|| url.strip_prefix("http://")).unwrap_or("");
    if without_protocol.is_empty() || without_protocol.starts_with('/') {
        let mut error = validator::ValidationError::new("url");
        error.message = Some("URL must include a valid host".into());
        return Err(error);
    }

    if url.len() > 2000 {
        let mut error = validator::ValidationError::new("url_length");
        error.message = Some("URL must be at most 2000 characters".into());
        return Err(error);
    }

    Ok(())
}

/// Validates the dataset carried by a request
pub(crate) fn validate_dataset(dataset: &DatasetDto) -> Result<(), validator::ValidationError> {
    match dataset {
        DatasetDto::Csv { content } if content.trim().is_empty() => {
            let mut error = validator::ValidationError::new("dataset");
            error.message = Some("CSV content must not be empty".into());
            Err(error)
        }
        DatasetDto::Columns { data } if data.is_empty() => {
            let mut error = validator::ValidationError::new("dataset");
            error.message = Some("Column data must hold at least one column".into());
            Err(error)
        }
        DatasetDto::Url { url, .. } => validate_url(url),
        _ => Ok(()),
    }
}

/// Table supplied with a request, tagged by `format`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "format", rename_all = "camelCase")]
pub enum DatasetDto {
    /// `{"format": "csv", "content": "a,b\n1,2\n"}`
    Csv { content: String },
    /// `{"format": "columns", "data": {"a": [1], "b": [2]}}`
    Columns { data: Map<String, Value> },
    /// `{"format": "url", "url": "https://...", "contentFormat": "csv"}`
    #[serde(rename_all = "camelCase")]
    Url {
        url: String,
        #[serde(default)]
        content_format: Option<DatasetFormat>,
    },
}

impl From<DatasetDto> for DatasetSource {
    fn from(dto: DatasetDto) -> Self {
        match dto {
            DatasetDto::Csv { content } => DatasetSource::Inline {
                format: DatasetFormat::Csv,
                body: content.into_bytes(),
            },
            DatasetDto::Columns { data } => DatasetSource::Inline {
                format: DatasetFormat::Columns,
                body: Value::Object(data).to_string().into_bytes(),
            },
            DatasetDto::Url { url, content_format } => DatasetSource::Remote {
                url,
                format: content_format,
            },
        }
    }
}

/// DTO for applying a stored design to a dataset
#[derive(Debug, Clone, Deserialize, validator::Validate)]
#[serde(rename_all = "camelCase")]
pub struct TransformDatasetDto {
    #[validate(custom(function = "validate_dataset"))]
    pub dataset: DatasetDto,

    /// Encoding of the treated table in the response
    #[serde(default)]
    pub output: DatasetFormat,
}
