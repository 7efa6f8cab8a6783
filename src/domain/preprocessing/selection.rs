//! Feature selection and column ordering.

use crate::domain::models::frame::Frame;

/// Columns eligible for treatment design, in frame order
#[must_use]
pub fn treatment_features(
    frame: &Frame,
    id_features: &[String],
    datetime_features: &[String],
    target: Option<&str>,
    blacklist: &[String],
) -> Vec<String> {
    frame
        .columns()
        .iter()
        .map(|c| c.name())
        .filter(|name| {
            !id_features.iter().any(|f| f == name)
                && !datetime_features.iter().any(|f| f == name)
                && !blacklist.iter().any(|f| f == name)
                && target != Some(*name)
        })
        .map(str::to_string)
        .collect()
}

/// Move the target column to the end of the frame
pub fn reindex_target(frame: &mut Frame, target: Option<&str>) {
    if let Some(target) = target {
        frame.move_to_end(target);
    }
}
