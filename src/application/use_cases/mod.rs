//! Use Cases
//!
//! Application-specific business rules.
//! Each use case is a single-purpose struct with an execute() method.

pub mod datasets;
pub mod designs;

pub use datasets::{DatasetCodecs, EncodeDatasetUseCase, LoadDatasetUseCase};
pub use designs::{
    CreateDesignUseCase, DeleteDesignUseCase, GetActiveDesignsUseCase, GetDesignByIdUseCase,
    PartialUpdateDesignUseCase, PreviewDesignUseCase, RefitDesignUseCase, TransformDatasetUseCase,
};
