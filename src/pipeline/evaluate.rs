//! Directive policy: decide one field's fate from its parsed directives.
//!
//! Pure function of the descriptor, its [`ParsedDirectives`], the rendering
//! mode and the presence snapshot. It never touches record data; an enum
//! substitution comes back as an [`EnumTable`] for the caller to plan edits
//! from.
//!
//! ## Evaluation order
//!
//! `@HIDDEN-PDF` drops the field outright. Otherwise `include` starts true
//! and each directive below runs only while `include` is still true:
//!
//! 1. `@PDF-HIDDENNODATA`: reassigns `include`
//! 2. `@PDF-HIDDENDATA`: reassigns `include`
//! 3. `@PDF-WHITESPACE`: empty template, field without value
//! 4. `@PDF-FIELDNOTEEMPTY`: empty template
//! 5. `@PDF-FIELDNOTEDATA`: with data, field with value
//! 6. `@PDF-NOENUM`: enumerated type; always retypes
//! 7. `@PDF-DATANOENUM`: enumerated type with value
//!
//! Steps 1 and 2 overwrite `include` rather than combining with it. Because
//! step 2 only runs while `include` is true, a field hidden by step 1 stays
//! hidden.

use crate::config::{FilterConfig, RenderMode};
use crate::error::DirectiveIssue;
use crate::model::FieldDescriptor;
use crate::output::ExclusionReason;
use crate::pipeline::directives::{
    ParsedDirectives, TAG_DATA_NO_ENUM, TAG_HIDDEN_DATA, TAG_HIDDEN_NO_DATA, TAG_NO_ENUM,
};
use crate::pipeline::enums::EnumTable;
use crate::pipeline::presence::PresenceMap;
use tracing::debug;

/// Shared, read-only inputs for evaluating every field of one pass.
#[derive(Debug, Clone, Copy)]
pub struct FieldContext<'a> {
    pub mode: RenderMode,
    pub presence: &'a PresenceMap,
    pub config: &'a FilterConfig,
}

/// Outcome for one field.
#[derive(Debug, Clone)]
pub struct FieldEvaluation {
    /// Copy of the input descriptor with rewrites applied.
    pub descriptor: FieldDescriptor,
    pub included: bool,
    pub reason: Option<ExclusionReason>,
    /// Set when stored values of this field must be replaced by enum labels.
    pub enum_table: Option<EnumTable>,
    /// Whether the element type was switched to the plain text type.
    pub retyped: bool,
    pub issues: Vec<DirectiveIssue>,
}

pub fn evaluate_field(
    field: &FieldDescriptor,
    parsed: &ParsedDirectives,
    ctx: &FieldContext<'_>,
) -> FieldEvaluation {
    let mut eval = FieldEvaluation {
        descriptor: field.clone(),
        included: true,
        reason: None,
        enum_table: None,
        retyped: false,
        issues: Vec::new(),
    };

    if parsed.hidden_pdf() {
        eval.included = false;
        eval.reason = Some(ExclusionReason::HiddenPdf);
        return eval;
    }
    eval.issues.extend(parsed.issues.iter().cloned());

    let name = field.field_name.as_str();
    let with_data = ctx.mode.is_with_data();
    let has_value = ctx.presence.is_present(name);

    // ── Inclusion ────────────────────────────────────────────────────────
    if let Some(target) = parsed.hidden_no_data() {
        match target {
            None => eval.included = with_data,
            Some(t) if ctx.presence.is_known(t) => eval.included = ctx.presence.is_present(t),
            Some(t) => eval.issues.push(unknown_target(name, TAG_HIDDEN_NO_DATA, t)),
        }
        if !eval.included {
            eval.reason = Some(ExclusionReason::HiddenNoData);
        }
    }

    if eval.included {
        if let Some(target) = parsed.hidden_data() {
            match target {
                None => eval.included = !with_data,
                Some(t) if ctx.presence.is_known(t) => {
                    eval.included = !ctx.presence.is_present(t)
                }
                Some(t) => eval.issues.push(unknown_target(name, TAG_HIDDEN_DATA, t)),
            }
            if !eval.included {
                eval.reason = Some(ExclusionReason::HiddenData);
            }
        }
    }

    if !eval.included {
        debug!(field = name, reason = ?eval.reason, "field excluded");
        return eval;
    }

    // ── Label and note ───────────────────────────────────────────────────
    if let Some(lines) = parsed.whitespace() {
        if !with_data && !has_value {
            let max = ctx.config.max_whitespace_lines;
            if lines > max {
                eval.issues.push(DirectiveIssue::WhitespaceClamped {
                    field: name.to_string(),
                    requested: lines,
                    applied: max,
                });
            }
            let n = lines.min(max) as usize;
            eval.descriptor
                .element_label
                .push_str(&ctx.config.label_line_break.repeat(n));
            debug!(field = name, lines = n, "padded label");
        }
    }

    if let Some(note) = parsed.field_note_empty() {
        if !with_data {
            eval.descriptor.element_note = note.to_string();
        }
    }

    if let Some(note) = parsed.field_note_data() {
        if with_data && has_value {
            eval.descriptor.element_note = note.to_string();
        }
    }

    // ── Enumerations ─────────────────────────────────────────────────────
    let enumerated = ctx.config.is_enum_type(&field.element_type);

    if parsed.no_enum() {
        if enumerated {
            if has_value {
                eval.enum_table = Some(table_for(field, ctx.config));
            }
            retype(&mut eval, ctx.config);
        } else {
            eval.issues.push(non_enum(field, TAG_NO_ENUM));
        }
    }

    if parsed.data_no_enum() {
        if !enumerated {
            eval.issues.push(non_enum(field, TAG_DATA_NO_ENUM));
        } else if has_value && ctx.config.is_enum_type(&eval.descriptor.element_type) {
            eval.enum_table = Some(table_for(field, ctx.config));
            retype(&mut eval, ctx.config);
        }
    }

    eval
}

fn table_for(field: &FieldDescriptor, config: &FilterConfig) -> EnumTable {
    EnumTable::parse(&field.element_enum, &config.enum_line_marker)
}

fn retype(eval: &mut FieldEvaluation, config: &FilterConfig) {
    eval.descriptor.element_type.clone_from(&config.text_type);
    eval.retyped = true;
}

fn unknown_target(field: &str, tag: &str, target: &str) -> DirectiveIssue {
    DirectiveIssue::UnknownTarget {
        field: field.to_string(),
        tag: tag.to_string(),
        target: target.to_string(),
    }
}

fn non_enum(field: &FieldDescriptor, tag: &str) -> DirectiveIssue {
    DirectiveIssue::EnumOnNonEnumType {
        field: field.field_name.clone(),
        tag: tag.to_string(),
        element_type: field.element_type.clone(),
    }
}
