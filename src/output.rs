//! Result types of an action-tag pass.
//!
//! [`FilterOutput`] is what the host feeds to its renderer: the surviving
//! descriptors plus the rewritten record data. Everything else lives in
//! [`FilterReport`] so hosts that mutate their data in place
//! ([`crate::filter::apply_pdf_actiontags_in_place`]) get the same audit
//! trail.

use crate::config::RenderMode;
use crate::error::DirectiveIssue;
use crate::model::{FieldDescriptor, RecordData};
use serde::{Deserialize, Serialize};

/// Filtered descriptors, rewritten data, and the report explaining both.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterOutput {
    /// Included descriptors, in input order, with label/note/type rewrites applied.
    pub fields: Vec<FieldDescriptor>,
    /// Record data with enum substitutions applied.
    pub records: RecordData,
    pub report: FilterReport,
}

impl FilterOutput {
    /// Names of the included fields, in order.
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.field_name.as_str()).collect()
    }
}

/// Per-field decisions, applied edits, and degraded directives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterReport {
    pub mode: RenderMode,
    /// One entry per input field, in input order.
    pub decisions: Vec<FieldDecision>,
    pub edits: Vec<ValueEdit>,
    pub issues: Vec<DirectiveIssue>,
    pub stats: FilterStats,
}

impl FilterReport {
    pub fn decision(&self, field_name: &str) -> Option<&FieldDecision> {
        self.decisions.iter().find(|d| d.field_name == field_name)
    }
}

/// Why a field was left out of the PDF.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExclusionReason {
    /// `@HIDDEN-PDF`
    HiddenPdf,
    /// `@PDF-HIDDENNODATA`
    HiddenNoData,
    /// `@PDF-HIDDENDATA`
    HiddenData,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDecision {
    pub field_name: String,
    pub included: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<ExclusionReason>,
}

/// One enum substitution on one stored value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueEdit {
    pub record_id: String,
    pub event_id: String,
    pub field_name: String,
    pub old_value: String,
    pub new_value: String,
}

impl ValueEdit {
    /// Write `new_value` into `records`.
    ///
    /// Returns `false` (and changes nothing) when the location no longer
    /// holds `old_value`.
    pub fn apply(&self, records: &mut RecordData) -> bool {
        let slot = records
            .get_mut(&self.record_id)
            .and_then(|events| events.get_mut(&self.event_id))
            .and_then(|values| values.get_mut(&self.field_name));
        match slot {
            Some(v) if *v == self.old_value => {
                v.clone_from(&self.new_value);
                true
            }
            _ => false,
        }
    }
}

/// Counters for one pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterStats {
    pub total_fields: usize,
    pub included_fields: usize,
    pub excluded_fields: usize,
    /// Fields whose type was switched to the plain text type.
    pub retyped_fields: usize,
    pub values_rewritten: usize,
    pub issues: usize,
}
