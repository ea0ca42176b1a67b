//! Configuration for the action-tag pass.
//!
//! All filter behaviour is controlled through [`FilterConfig`], built via its
//! [`FilterConfigBuilder`]. The defaults reproduce the host platform exactly;
//! override them only when the host stores metadata differently (another
//! enum separator, extra enumerated element types).

use crate::error::ActionTagError;
use serde::{Deserialize, Serialize};

/// Configuration for one action-tag pass.
///
/// Built via [`FilterConfig::builder()`] or using [`FilterConfig::default()`].
///
/// # Example
/// ```rust
/// use pdf_actiontags::{FilterConfig, UnmatchedEnumPolicy};
///
/// let config = FilterConfig::builder()
///     .unmatched_enum(UnmatchedEnumPolicy::Blank)
///     .enum_type("checkbox")
///     .build()
///     .unwrap();
/// assert!(config.is_enum_type("checkbox"));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Element types that carry an enumeration. Default: `sql`, `select`, `radio`.
    pub enum_types: Vec<String>,

    /// Element type assigned by `@PDF-NOENUM` / `@PDF-DATANOENUM`. Default: `text`.
    ///
    /// The renderer draws a blank answer line for this type when no value exists.
    pub text_type: String,

    /// Separator between `key, label` pairs in `element_enum`. Default: the
    /// two-character sequence `\n` the host stores in its metadata table.
    /// Real newlines always split as well.
    pub enum_line_marker: String,

    /// Appended to the label once per `@PDF-WHITESPACE` line. Default: `"\n"`.
    pub label_line_break: String,

    /// Upper bound on `@PDF-WHITESPACE` lines. Default: 200.
    pub max_whitespace_lines: u32,

    /// What to write when a stored value has no enum label. Default: pass-through.
    pub unmatched_enum: UnmatchedEnumPolicy,

    /// Force a rendering mode instead of detecting it from the record data.
    pub mode: Option<RenderMode>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            enum_types: vec!["sql".into(), "select".into(), "radio".into()],
            text_type: "text".into(),
            enum_line_marker: "\\n".into(),
            label_line_break: "\n".into(),
            max_whitespace_lines: 200,
            unmatched_enum: UnmatchedEnumPolicy::default(),
            mode: None,
        }
    }
}

impl FilterConfig {
    /// Create a new builder for `FilterConfig`.
    pub fn builder() -> FilterConfigBuilder {
        FilterConfigBuilder {
            config: Self::default(),
        }
    }

    /// Whether `element_type` supports the enum directives.
    pub fn is_enum_type(&self, element_type: &str) -> bool {
        self.enum_types.iter().any(|t| t == element_type)
    }
}

/// Builder for [`FilterConfig`].
#[derive(Debug)]
pub struct FilterConfigBuilder {
    config: FilterConfig,
}

impl FilterConfigBuilder {
    /// Replace the whole list of enumerated element types.
    pub fn enum_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.enum_types = types.into_iter().map(Into::into).collect();
        self
    }

    /// Add one enumerated element type to the defaults.
    pub fn enum_type(mut self, element_type: impl Into<String>) -> Self {
        let t = element_type.into();
        if !self.config.enum_types.contains(&t) {
            self.config.enum_types.push(t);
        }
        self
    }

    pub fn text_type(mut self, t: impl Into<String>) -> Self {
        self.config.text_type = t.into();
        self
    }

    pub fn enum_line_marker(mut self, marker: impl Into<String>) -> Self {
        self.config.enum_line_marker = marker.into();
        self
    }

    pub fn label_line_break(mut self, br: impl Into<String>) -> Self {
        self.config.label_line_break = br.into();
        self
    }

    pub fn max_whitespace_lines(mut self, n: u32) -> Self {
        self.config.max_whitespace_lines = n;
        self
    }

    pub fn unmatched_enum(mut self, policy: UnmatchedEnumPolicy) -> Self {
        self.config.unmatched_enum = policy;
        self
    }

    pub fn mode(mut self, mode: RenderMode) -> Self {
        self.config.mode = Some(mode);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<FilterConfig, ActionTagError> {
        let c = &self.config;
        if c.enum_types.is_empty() {
            return Err(ActionTagError::InvalidConfig(
                "enum_types must name at least one element type".into(),
            ));
        }
        if c.text_type.is_empty() {
            return Err(ActionTagError::InvalidConfig(
                "text_type must not be empty".into(),
            ));
        }
        if c.is_enum_type(&c.text_type) {
            return Err(ActionTagError::InvalidConfig(format!(
                "text_type '{}' must not itself be an enumerated type",
                c.text_type
            )));
        }
        if c.enum_line_marker.is_empty() {
            return Err(ActionTagError::InvalidConfig(
                "enum_line_marker must not be empty".into(),
            ));
        }
        Ok(self.config)
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// Which kind of PDF the host is rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderMode {
    /// Blank form, no record bound.
    EmptyTemplate,
    /// Form populated with saved record values.
    WithData,
}

impl RenderMode {
    pub fn is_with_data(self) -> bool {
        matches!(self, RenderMode::WithData)
    }
}

/// Replacement written when a stored value is not a key of the field's enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnmatchedEnumPolicy {
    /// Keep the raw stored value. (default)
    #[default]
    PassThrough,
    /// Replace it with the empty string, as if no label existed.
    Blank,
}
