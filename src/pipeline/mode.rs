//! Rendering-mode detection.
//!
//! The host passes an empty data set for a blank form, or a data set holding
//! a single placeholder record under the empty identifier. Anything else is a
//! form with saved data.

use crate::config::{FilterConfig, RenderMode};
use crate::model::RecordData;

/// Detect the rendering mode from the record data alone.
pub fn detect_mode(records: &RecordData) -> RenderMode {
    let placeholder_only = records.len() == 1 && records.contains_key("");
    if records.is_empty() || placeholder_only {
        RenderMode::EmptyTemplate
    } else {
        RenderMode::WithData
    }
}

/// The configured mode if one is forced, otherwise the detected one.
pub fn resolve_mode(records: &RecordData, config: &FilterConfig) -> RenderMode {
    config.mode.unwrap_or_else(|| detect_mode(records))
}
