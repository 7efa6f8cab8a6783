//! Preprocessing
//!
//! Fit routines that inspect a training frame and design per-column
//! treatments, and the transform that replays a fitted plan on new data.

pub mod categorical;
pub mod datetime;
pub mod dtypes;
pub mod missing;
pub mod naming;
pub mod numerical;
pub mod selection;
pub mod variance;

mod fit;
mod transform;

pub use fit::fit;
pub use transform::transform;
