//! Registry of the available dataset codecs.

use std::sync::Arc;

use crate::domain::gateways::DatasetCodec;
use crate::domain::models::dataset::DatasetFormat;
use crate::shared::errors::UseCaseError;

#[derive(Clone, Default)]
pub struct DatasetCodecs {
    codecs: Vec<Arc<dyn DatasetCodec>>,
}

impl DatasetCodecs {
    #[must_use]
    pub fn new(codecs: Vec<Arc<dyn DatasetCodec>>) -> Self {
        Self { codecs }
    }

    /// Codec handling `format`
    ///
    /// # Errors
    ///
    /// Returns `UseCaseError::Validation` when no codec handles the format.
    pub fn get(&self, format: DatasetFormat) -> Result<&dyn DatasetCodec, UseCaseError> {
        self.codecs
            .iter()
            .find(|c| c.format() == format)
            .map(|codec| &**codec)
            .ok_or_else(|| UseCaseError::Validation(vec![format!("format: no codec for {format:?}")]))
    }
}

/// Codec used by the use case tests: one int row per byte of the body
#[cfg(test)]
pub(crate) struct ByteCodec(pub DatasetFormat);

#[cfg(test)]
impl DatasetCodec for ByteCodec {
    fn format(&self) -> DatasetFormat {
        self.0
    }

    fn decode(&self, body: &[u8]) -> Result<crate::domain::models::frame::Frame, crate::shared::errors::DatasetError> {
        use crate::domain::models::frame::{Column, Frame};
        Ok(Frame::new(vec![Column::int(
            "byte",
            body.iter().map(|b| Some(i64::from(*b))).collect(),
        )])?)
    }

    fn encode(&self, frame: &crate::domain::models::frame::Frame) -> Result<Vec<u8>, crate::shared::errors::DatasetError> {
        Ok(frame.column_names().join(",").into_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_by_format() {
        let codecs = DatasetCodecs::new(vec![Arc::new(ByteCodec(DatasetFormat::Csv))]);
        assert_eq!(codecs.get(DatasetFormat::Csv).unwrap().format(), DatasetFormat::Csv);
        assert!(matches!(
            codecs.get(DatasetFormat::Columns),
            Err(UseCaseError::Validation(_))
        ));
    }
}
