//! Dataset Codec Gateway
//!
//! Conversion between wire encodings and in-memory frames.

use crate::domain::models::dataset::DatasetFormat;
use crate::domain::models::frame::Frame;
use crate::shared::errors::DatasetError;

pub trait DatasetCodec: Send + Sync {
    /// Encoding handled by this codec
    fn format(&self) -> DatasetFormat;

    /// Parse a frame, inferring column dtypes
    ///
    /// # Errors
    ///
    /// Returns `DatasetError` when the body is not a valid table.
    fn decode(&self, body: &[u8]) -> Result<Frame, DatasetError>;

    /// Serialize a frame
    ///
    /// # Errors
    ///
    /// Returns `DatasetError::Malformed` when the frame cannot be written.
    fn encode(&self, frame: &Frame) -> Result<Vec<u8>, DatasetError>;
}
