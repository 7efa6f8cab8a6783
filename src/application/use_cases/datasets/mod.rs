//! Dataset Use Cases
//!
//! Decoding request datasets and encoding treated results.

mod codecs;
mod encode_dataset;
mod load_dataset;

pub use codecs::DatasetCodecs;
pub use encode_dataset::EncodeDatasetUseCase;
pub use load_dataset::LoadDatasetUseCase;
