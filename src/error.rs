//! Error types for the pdf-actiontags library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`ActionTagError`] — **Fatal**: the pass cannot even start (metadata
//!   file missing, JSON malformed, configuration rejected). Only the I/O and
//!   configuration edges return it; the filter itself never fails.
//!
//! * [`DirectiveIssue`] — **Non-fatal**: one directive on one field was
//!   malformed or could not be honoured, so it was ignored. Collected in
//!   [`crate::output::FilterReport::issues`] so callers can surface bad
//!   annotations to form designers without losing the rendered PDF.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the pdf-actiontags library.
///
/// Directive-level problems use [`DirectiveIssue`] and are reported in
/// [`crate::output::FilterReport::issues`] rather than propagated here.
#[derive(Debug, Error)]
pub enum ActionTagError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("Input file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The file was read but its contents are not the expected JSON shape.
    #[error("Invalid JSON in '{path}': {source}")]
    InvalidJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Any other read failure.
    #[error("Failed to read '{path}': {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Output errors ─────────────────────────────────────────────────────
    /// Could not create or write the output file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// A non-fatal problem with a single directive on a single field.
///
/// The offending directive is ignored (or degraded to its parameterless
/// form); every other directive on the field is still evaluated.
#[derive(Debug, Clone, PartialEq, Eq, Error, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DirectiveIssue {
    /// `TAG=` was present but the closing quote delimiter never appeared.
    #[error("Field '{field}': @{tag} has an unterminated parameter")]
    MalformedParameter { field: String, tag: String },

    /// A directive that only works with a parameter was given none.
    #[error("Field '{field}': @{tag} requires a quoted parameter")]
    MissingParameter { field: String, tag: String },

    /// `@PDF-WHITESPACE` parameter is not a number.
    #[error("Field '{field}': @PDF-WHITESPACE expects a number of lines, got {value:?}")]
    InvalidWhitespaceCount { field: String, value: String },

    /// `@PDF-WHITESPACE` asked for more lines than the configured maximum.
    #[error("Field '{field}': @PDF-WHITESPACE requested {requested} lines, capped at {applied}")]
    WhitespaceClamped {
        field: String,
        requested: u32,
        applied: u32,
    },

    /// `@PDF-HIDDENDATA` / `@PDF-HIDDENNODATA` names a field not on this form.
    #[error("Field '{field}': @{tag} targets unknown field '{target}'")]
    UnknownTarget {
        field: String,
        tag: String,
        target: String,
    },

    /// A stored value has no entry in the field's enumeration.
    #[error("Field '{field}': value {value:?} (record '{record_id}', event '{event_id}') has no enum label")]
    UnmatchedEnumKey {
        field: String,
        record_id: String,
        event_id: String,
        value: String,
    },

    /// `@PDF-NOENUM` / `@PDF-DATANOENUM` on a field whose type has no enumeration.
    #[error("Field '{field}': @{tag} ignored on non-enumerated type '{element_type}'")]
    EnumOnNonEnumType {
        field: String,
        tag: String,
        element_type: String,
    },
}

impl DirectiveIssue {
    /// Name of the field the issue was raised on.
    pub fn field(&self) -> &str {
        match self {
            DirectiveIssue::MalformedParameter { field, .. }
            | DirectiveIssue::MissingParameter { field, .. }
            | DirectiveIssue::InvalidWhitespaceCount { field, .. }
            | DirectiveIssue::WhitespaceClamped { field, .. }
            | DirectiveIssue::UnknownTarget { field, .. }
            | DirectiveIssue::UnmatchedEnumKey { field, .. }
            | DirectiveIssue::EnumOnNonEnumType { field, .. } => field,
        }
    }
}
