//! Entry points for the action-tag pass.
//!
//! The pass runs in three phases so record data is never rewritten while it
//! is still being read:
//!
//! 1. snapshot: rendering mode and presence map from the untouched input
//! 2. decide: parse and evaluate every field in order, planning
//!    [`ValueEdit`]s for enum substitutions against the snapshot
//! 3. apply: write the planned edits into the record data
//!
//! [`apply_pdf_actiontags`] takes the records by value and hands them back
//! inside [`FilterOutput`]; [`apply_pdf_actiontags_in_place`] runs the same
//! phases over a caller-owned `&mut RecordData`.

use crate::config::{FilterConfig, UnmatchedEnumPolicy};
use crate::error::DirectiveIssue;
use crate::model::{FieldDescriptor, RecordData};
use crate::output::{FieldDecision, FilterOutput, FilterReport, FilterStats, ValueEdit};
use crate::pipeline::directives::parse_directives;
use crate::pipeline::enums::EnumTable;
use crate::pipeline::evaluate::{evaluate_field, FieldContext};
use crate::pipeline::mode::resolve_mode;
use crate::pipeline::presence::PresenceMap;
use tracing::{debug, info, warn};

/// Apply PDF action tags to `fields`, rewriting enum values in `records`.
///
/// This is the primary entry point for the library. It never fails:
/// malformed directives are ignored and reported in
/// [`FilterReport::issues`].
///
/// # Example
/// ```rust
/// use pdf_actiontags::{apply_pdf_actiontags, FieldDescriptor, FilterConfig, RecordData};
///
/// let fields = vec![
///     FieldDescriptor::new("name", "text"),
///     FieldDescriptor::new("internal_id", "text").with_misc("@HIDDEN-PDF"),
/// ];
/// let output = apply_pdf_actiontags(&fields, RecordData::new(), &FilterConfig::default());
/// assert_eq!(output.field_names(), vec!["name"]);
/// ```
pub fn apply_pdf_actiontags(
    fields: &[FieldDescriptor],
    mut records: RecordData,
    config: &FilterConfig,
) -> FilterOutput {
    let (fields, report) = apply_pdf_actiontags_in_place(fields, &mut records, config);
    FilterOutput {
        fields,
        records,
        report,
    }
}

/// Same pass as [`apply_pdf_actiontags`], rewriting `records` where it lies.
///
/// Returns the included descriptors and the report.
pub fn apply_pdf_actiontags_in_place(
    fields: &[FieldDescriptor],
    records: &mut RecordData,
    config: &FilterConfig,
) -> (Vec<FieldDescriptor>, FilterReport) {
    // ── Phase 1: snapshot ────────────────────────────────────────────────
    let mode = resolve_mode(records, config);
    let presence = PresenceMap::build(fields, records, mode);
    debug!(
        ?mode,
        fields = fields.len(),
        present = presence.present_count(),
        "presence map built"
    );

    let ctx = FieldContext {
        mode,
        presence: &presence,
        config,
    };

    // ── Phase 2: decide ──────────────────────────────────────────────────
    let mut included = Vec::with_capacity(fields.len());
    let mut decisions = Vec::with_capacity(fields.len());
    let mut edits = Vec::new();
    let mut issues = Vec::new();
    let mut retyped_fields = 0;

    for field in fields {
        let parsed = parse_directives(&field.field_name, &field.misc);
        let eval = evaluate_field(field, &parsed, &ctx);

        if let Some(ref table) = eval.enum_table {
            plan_enum_edits(field, table, records, config, &mut edits, &mut issues);
        }
        issues.extend(eval.issues);

        decisions.push(FieldDecision {
            field_name: field.field_name.clone(),
            included: eval.included,
            reason: eval.reason,
        });
        if eval.included {
            if eval.retyped {
                retyped_fields += 1;
            }
            included.push(eval.descriptor);
        }
    }

    // ── Phase 3: apply ───────────────────────────────────────────────────
    let mut applied = Vec::with_capacity(edits.len());
    for edit in edits {
        if edit.apply(records) {
            applied.push(edit);
        } else {
            warn!(
                field = %edit.field_name,
                record = %edit.record_id,
                event = %edit.event_id,
                "planned value edit no longer matches the stored value"
            );
        }
    }

    for issue in &issues {
        warn!("{issue}");
    }

    let stats = FilterStats {
        total_fields: fields.len(),
        included_fields: included.len(),
        excluded_fields: fields.len() - included.len(),
        retyped_fields,
        values_rewritten: applied.len(),
        issues: issues.len(),
    };
    info!(
        "Action tags applied ({:?}): {}/{} fields kept, {} values rewritten, {} issues",
        mode, stats.included_fields, stats.total_fields, stats.values_rewritten, stats.issues
    );

    let report = FilterReport {
        mode,
        decisions,
        edits: applied,
        issues,
        stats,
    };
    (included, report)
}

/// Plan one edit per non-empty stored value of `field`.
///
/// Values with no enum label are kept or blanked per
/// [`FilterConfig::unmatched_enum`]; either way they are reported.
fn plan_enum_edits(
    field: &FieldDescriptor,
    table: &EnumTable,
    records: &RecordData,
    config: &FilterConfig,
    edits: &mut Vec<ValueEdit>,
    issues: &mut Vec<DirectiveIssue>,
) {
    let name = &field.field_name;
    for (record_id, events) in records.iter() {
        for (event_id, values) in events.iter() {
            let Some(raw) = values.get(name).filter(|v| !v.is_empty()) else {
                continue;
            };

            let new_value = match table.label(raw) {
                Some(label) => label.to_string(),
                None => {
                    issues.push(DirectiveIssue::UnmatchedEnumKey {
                        field: name.clone(),
                        record_id: record_id.to_string(),
                        event_id: event_id.to_string(),
                        value: raw.clone(),
                    });
                    match config.unmatched_enum {
                        UnmatchedEnumPolicy::PassThrough => continue,
                        UnmatchedEnumPolicy::Blank => String::new(),
                    }
                }
            };

            if new_value != *raw {
                edits.push(ValueEdit {
                    record_id: record_id.to_string(),
                    event_id: event_id.to_string(),
                    field_name: name.clone(),
                    old_value: raw.clone(),
                    new_value,
                });
            }
        }
    }
}
