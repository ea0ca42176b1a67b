//! # pdf-actiontags
//!
//! Interpret PDF action tags embedded in form metadata before the host
//! renders a form to PDF.
//!
//! Form designers annotate fields with tags such as `@HIDDEN-PDF` or
//! `@PDF-NOENUM` in each field's free-text `misc` attribute. This crate reads
//! those tags and decides, per field, whether it appears in the PDF, how its
//! label and note read, and whether enumerated values are printed as their
//! display labels instead of a list of choices.
//!
//! ## Pipeline Overview
//!
//! ```text
//! metadata + records
//!  │
//!  ├─ 1. Mode       empty template or form with saved data
//!  ├─ 2. Presence   last non-empty value per field (read-only snapshot)
//!  ├─ 3. Parse      tokenize each field's misc into typed directives
//!  ├─ 4. Evaluate   include / relabel / retype, in declaration order
//!  └─ 5. Apply      planned enum substitutions written into the records
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use pdf_actiontags::{apply_pdf_actiontags, FieldDescriptor, FilterConfig, RecordData};
//!
//! let fields = vec![
//!     FieldDescriptor::new("consent", "radio")
//!         .with_enum(r"1, Yes \n 0, No")
//!         .with_misc("@PDF-NOENUM"),
//!     FieldDescriptor::new("staff_notes", "notes").with_misc("@HIDDEN-PDF"),
//! ];
//! let records: RecordData =
//!     serde_json::from_str(r#"{"101": {"baseline": {"consent": "1"}}}"#).unwrap();
//!
//! let output = apply_pdf_actiontags(&fields, records, &FilterConfig::default());
//! assert_eq!(output.field_names(), vec!["consent"]);
//! assert_eq!(output.fields[0].element_type, "text");
//! assert_eq!(output.records.get("101").unwrap().get("baseline").unwrap()["consent"], "Yes");
//! ```
//!
//! ## Supported Tags
//!
//! | Tag | Parameter | Effect |
//! |-----|-----------|--------|
//! | `@HIDDEN-PDF` | — | never printed |
//! | `@PDF-HIDDENDATA` | optional field | hidden when data is present (in the field named) |
//! | `@PDF-HIDDENNODATA` | optional field | hidden when data is absent (in the field named) |
//! | `@PDF-NOENUM` | — | print as a text line instead of a choice list |
//! | `@PDF-DATANOENUM` | — | like `@PDF-NOENUM`, only when the field has a value |
//! | `@PDF-WHITESPACE` | line count | blank lines under the label (empty template) |
//! | `@PDF-FIELDNOTEEMPTY` | text | replacement note (empty template) |
//! | `@PDF-FIELDNOTEDATA` | text | replacement note (saved data, field has a value) |
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdf-actiontags` binary (clap + anyhow + tracing-subscriber) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod filter;
pub mod model;
pub mod output;
pub mod pipeline;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{FilterConfig, FilterConfigBuilder, RenderMode, UnmatchedEnumPolicy};
pub use error::{ActionTagError, DirectiveIssue};
pub use filter::{apply_pdf_actiontags, apply_pdf_actiontags_in_place};
pub use model::{EventData, FieldDescriptor, FieldValues, OrderedMap, RecordData};
pub use output::{
    ExclusionReason, FieldDecision, FilterOutput, FilterReport, FilterStats, ValueEdit,
};
pub use pipeline::directives::{parse_directives, tag_param, Directive, ParsedDirectives};
