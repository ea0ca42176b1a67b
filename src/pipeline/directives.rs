//! Directive parsing: turn a field's `misc` annotation into typed directives.
//!
//! Tags are recognised as whole tokens, not substrings: `@` followed by a
//! greedy run of name characters, where the `@` is not glued to a preceding
//! name character. `@HIDDEN-PDFX` is therefore never mistaken for
//! `@HIDDEN-PDF`, and `user@PDF-NOENUM` is not a tag at all. The end of the
//! previous tag counts as a boundary, so `@PDF-NOENUM@HIDDEN-PDF` holds two
//! tags.
//!
//! A tag may carry a parameter: `=` directly after the name, then any single
//! character acting as quote delimiter, then the value up to the next
//! occurrence of that same character. `="x"`, `='x'` and `=|x|` are all
//! accepted. Scanning resumes after the closing delimiter, so a parameter
//! that mentions another tag (`@PDF-FIELDNOTEEMPTY="see @HIDDEN-PDF"`) does
//! not activate it.

use crate::error::DirectiveIssue;
use once_cell::sync::Lazy;
use regex::Regex;
use std::ops::Range;
use tracing::trace;

pub const TAG_HIDDEN_PDF: &str = "HIDDEN-PDF";
pub const TAG_HIDDEN_DATA: &str = "PDF-HIDDENDATA";
pub const TAG_HIDDEN_NO_DATA: &str = "PDF-HIDDENNODATA";
pub const TAG_NO_ENUM: &str = "PDF-NOENUM";
pub const TAG_DATA_NO_ENUM: &str = "PDF-DATANOENUM";
pub const TAG_WHITESPACE: &str = "PDF-WHITESPACE";
pub const TAG_FIELD_NOTE_EMPTY: &str = "PDF-FIELDNOTEEMPTY";
pub const TAG_FIELD_NOTE_DATA: &str = "PDF-FIELDNOTEDATA";

// ── Tokenizer ────────────────────────────────────────────────────────────────

static RE_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"@([A-Za-z0-9_-]+)").unwrap());

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

/// Parameter clause following a tag name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagParam<'a> {
    /// No `=` after the name.
    None,
    /// `=` plus a matched quote pair; the text between the delimiters.
    Quoted(&'a str),
    /// `=` present but the closing delimiter never appears.
    Unterminated,
}

impl<'a> TagParam<'a> {
    pub fn value(self) -> Option<&'a str> {
        match self {
            TagParam::Quoted(v) => Some(v),
            _ => None,
        }
    }
}

/// One `@NAME[=<q>value<q>]` occurrence inside an annotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagToken<'a> {
    /// Tag name without the `@`.
    pub name: &'a str,
    pub param: TagParam<'a>,
    /// Byte range of the whole token, parameter included.
    pub span: Range<usize>,
}

/// Split an annotation into tag tokens, in order of appearance.
pub fn tokenize(misc: &str) -> Vec<TagToken<'_>> {
    let mut tokens: Vec<TagToken<'_>> = Vec::new();
    let mut pos = 0;

    while let Some(m) = RE_TAG.find_at(misc, pos) {
        let start = m.start();
        // A tag that ends right here is a boundary, not a glued name.
        let follows_tag = tokens.last().is_some_and(|t| t.span.end == start);
        let glued =
            !follows_tag && misc[..start].chars().next_back().is_some_and(is_name_char);
        if glued {
            pos = start + 1;
            continue;
        }

        let name = &m.as_str()[1..];
        let mut end = m.end();
        let param = match misc[end..].strip_prefix('=') {
            None => TagParam::None,
            Some(rest) => match read_quoted(rest) {
                Some((value, consumed)) => {
                    end += 1 + consumed;
                    TagParam::Quoted(value)
                }
                None => {
                    end += 1;
                    TagParam::Unterminated
                }
            },
        };

        tokens.push(TagToken {
            name,
            param,
            span: start..end,
        });
        pos = end;
    }

    tokens
}

/// Read a delimited value from text that starts right after `=`.
///
/// Returns the value and the number of bytes consumed including both
/// delimiters, or `None` when there is no closing delimiter.
fn read_quoted(rest: &str) -> Option<(&str, usize)> {
    let quote = rest.chars().next()?;
    let body = &rest[quote.len_utf8()..];
    let close = body.find(quote)?;
    Some((&body[..close], quote.len_utf8() * 2 + close))
}

/// Parameter of the first `tag` token in `misc`, if it has a well-formed one.
///
/// `tag` may be given with or without its leading `@`.
pub fn tag_param<'a>(misc: &'a str, tag: &str) -> Option<&'a str> {
    let tag = tag.strip_prefix('@').unwrap_or(tag);
    tokenize(misc)
        .into_iter()
        .find(|t| t.name == tag)
        .and_then(|t| t.param.value())
}

// ── Directives ───────────────────────────────────────────────────────────────

/// A recognised PDF action tag with its validated parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    /// `@HIDDEN-PDF`
    HiddenPdf,
    /// `@PDF-HIDDENDATA[="field"]`
    HiddenData { target: Option<String> },
    /// `@PDF-HIDDENNODATA[="field"]`
    HiddenNoData { target: Option<String> },
    /// `@PDF-NOENUM`
    NoEnum,
    /// `@PDF-DATANOENUM`
    DataNoEnum,
    /// `@PDF-WHITESPACE="n"`
    WhiteSpace { lines: u32 },
    /// `@PDF-FIELDNOTEEMPTY="text"`
    FieldNoteEmpty { note: String },
    /// `@PDF-FIELDNOTEDATA="text"`
    FieldNoteData { note: String },
}

/// Everything parsed from one field's annotation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedDirectives {
    pub directives: Vec<Directive>,
    pub issues: Vec<DirectiveIssue>,
}

impl ParsedDirectives {
    pub fn is_empty(&self) -> bool {
        self.directives.is_empty()
    }

    pub fn hidden_pdf(&self) -> bool {
        self.directives.contains(&Directive::HiddenPdf)
    }

    /// `Some(target)` when `@PDF-HIDDENDATA` is present.
    pub fn hidden_data(&self) -> Option<Option<&str>> {
        self.directives.iter().find_map(|d| match d {
            Directive::HiddenData { target } => Some(target.as_deref()),
            _ => None,
        })
    }

    /// `Some(target)` when `@PDF-HIDDENNODATA` is present.
    pub fn hidden_no_data(&self) -> Option<Option<&str>> {
        self.directives.iter().find_map(|d| match d {
            Directive::HiddenNoData { target } => Some(target.as_deref()),
            _ => None,
        })
    }

    pub fn no_enum(&self) -> bool {
        self.directives.contains(&Directive::NoEnum)
    }

    pub fn data_no_enum(&self) -> bool {
        self.directives.contains(&Directive::DataNoEnum)
    }

    pub fn whitespace(&self) -> Option<u32> {
        self.directives.iter().find_map(|d| match d {
            Directive::WhiteSpace { lines } => Some(*lines),
            _ => None,
        })
    }

    pub fn field_note_empty(&self) -> Option<&str> {
        self.directives.iter().find_map(|d| match d {
            Directive::FieldNoteEmpty { note } => Some(note.as_str()),
            _ => None,
        })
    }

    pub fn field_note_data(&self) -> Option<&str> {
        self.directives.iter().find_map(|d| match d {
            Directive::FieldNoteData { note } => Some(note.as_str()),
            _ => None,
        })
    }
}

/// Parse the PDF action tags in `misc` for the field `field_name`.
///
/// Only the first occurrence of each tag is interpreted. Tags outside the
/// PDF vocabulary are skipped silently; they belong to other host features.
pub fn parse_directives(field_name: &str, misc: &str) -> ParsedDirectives {
    let mut parsed = ParsedDirectives::default();
    let mut seen: Vec<&str> = Vec::new();

    for token in tokenize(misc) {
        if seen.contains(&token.name) {
            continue;
        }
        seen.push(token.name);

        if token.param == TagParam::Unterminated {
            parsed.issues.push(DirectiveIssue::MalformedParameter {
                field: field_name.to_string(),
                tag: token.name.to_string(),
            });
        }
        let param = token.param.value();

        let directive = match token.name {
            TAG_HIDDEN_PDF => Some(Directive::HiddenPdf),
            TAG_HIDDEN_DATA => Some(Directive::HiddenData {
                target: target_param(param),
            }),
            TAG_HIDDEN_NO_DATA => Some(Directive::HiddenNoData {
                target: target_param(param),
            }),
            TAG_NO_ENUM => Some(Directive::NoEnum),
            TAG_DATA_NO_ENUM => Some(Directive::DataNoEnum),
            TAG_WHITESPACE => match param {
                Some(p) => match parse_line_count(p) {
                    Some(lines) => Some(Directive::WhiteSpace { lines }),
                    None => {
                        parsed.issues.push(DirectiveIssue::InvalidWhitespaceCount {
                            field: field_name.to_string(),
                            value: p.to_string(),
                        });
                        None
                    }
                },
                None => {
                    missing_param(&mut parsed, field_name, &token);
                    None
                }
            },
            TAG_FIELD_NOTE_EMPTY => match param {
                Some(note) => Some(Directive::FieldNoteEmpty {
                    note: note.to_string(),
                }),
                None => {
                    missing_param(&mut parsed, field_name, &token);
                    None
                }
            },
            TAG_FIELD_NOTE_DATA => match param {
                Some(note) => Some(Directive::FieldNoteData {
                    note: note.to_string(),
                }),
                None => {
                    missing_param(&mut parsed, field_name, &token);
                    None
                }
            },
            _ => None,
        };

        if let Some(d) = directive {
            trace!(field = field_name, ?d, "parsed directive");
            parsed.directives.push(d);
        }
    }

    parsed
}

/// An empty target means "no target", the same as omitting the parameter.
fn target_param(param: Option<&str>) -> Option<String> {
    param.filter(|p| !p.is_empty()).map(str::to_string)
}

fn missing_param(parsed: &mut ParsedDirectives, field_name: &str, token: &TagToken<'_>) {
    // Unterminated parameters were already reported as malformed.
    if token.param == TagParam::None {
        parsed.issues.push(DirectiveIssue::MissingParameter {
            field: field_name.to_string(),
            tag: token.name.to_string(),
        });
    }
}

/// Parse a `@PDF-WHITESPACE` count.
///
/// Accepts integer or decimal text (truncated toward zero), with surrounding
/// whitespace. Negative values clamp to 0 and oversized values to `u32::MAX`.
fn parse_line_count(s: &str) -> Option<u32> {
    let s = s.trim();
    let n = match s.parse::<i64>() {
        Ok(n) => n,
        Err(_) => {
            let f = s.parse::<f64>().ok().filter(|f| f.is_finite())?;
            f.trunc().clamp(i64::MIN as f64, i64::MAX as f64) as i64
        }
    };
    Some(n.clamp(0, u32::MAX as i64) as u32)
}
