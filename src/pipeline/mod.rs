//! Pipeline stages of the action-tag pass.
//!
//! Each submodule implements exactly one step. Parsing never looks at data,
//! policy never touches data, and data is only rewritten once every field
//! has been decided.
//!
//! ## Data Flow
//!
//! ```text
//! records ──▶ mode ──▶ presence ─┐
//!                                ├──▶ evaluate ──▶ edits (filter.rs)
//! misc ─────▶ directives ────────┘        ▲
//! element_enum ─────────────────▶ enums ──┘
//! ```
//!
//! 1. [`mode`]       — empty template or form with saved data
//! 2. [`presence`]   — last non-empty value per field, from the untouched input
//! 3. [`directives`] — tokenize `misc` into typed [`directives::Directive`]s
//! 4. [`enums`]      — `key, label` lookup tables for enum substitution
//! 5. [`evaluate`]   — per-field policy over directives and presence facts
//!
//! [`input`] sits outside the pass: it loads descriptors and record data
//! from JSON files for the CLI.

pub mod directives;
pub mod enums;
pub mod evaluate;
pub mod input;
pub mod mode;
pub mod presence;
