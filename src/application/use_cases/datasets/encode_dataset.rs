//! Encode Dataset Use Case
//!
//! Serializes a frame in the requested wire format.

use super::codecs::DatasetCodecs;
use crate::domain::models::dataset::DatasetFormat;
use crate::domain::models::frame::Frame;
use crate::shared::errors::UseCaseError;

/// Use case for encoding response datasets
pub struct EncodeDatasetUseCase {
    codecs: DatasetCodecs,
}

impl EncodeDatasetUseCase {
    #[must_use]
    pub fn new(codecs: DatasetCodecs) -> Self {
        Self { codecs }
    }

    /// Execute the use case
    ///
    /// # Errors
    ///
    /// Returns `UseCaseError::Validation` if no codec handles the format.
    /// Returns `UseCaseError::Dataset` if the frame cannot be written.
    pub fn execute(&self, frame: &Frame, format: DatasetFormat) -> Result<Vec<u8>, UseCaseError> {
        let body = self.codecs.get(format)?.encode(frame)?;
        tracing::debug!(format = ?format, bytes = body.len(), "Dataset encoded");
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::application::use_cases::datasets::codecs::ByteCodec;
    use crate::domain::models::frame::Column;

    #[test]
    fn should_encode_with_matching_codec() {
        let use_case = EncodeDatasetUseCase::new(DatasetCodecs::new(vec![Arc::new(ByteCodec(DatasetFormat::Csv))]));
        let frame = Frame::new(vec![Column::int("a", vec![Some(1)]), Column::int("b", vec![Some(2)])]).unwrap();

        assert_eq!(use_case.execute(&frame, DatasetFormat::Csv).unwrap(), b"a,b".to_vec());
        assert!(use_case.execute(&frame, DatasetFormat::Columns).is_err());
    }
}
