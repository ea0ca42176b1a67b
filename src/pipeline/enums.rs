//! Enumeration tables: `element_enum` → key/label lookup.
//!
//! The host stores a choice list as `key, label` pairs joined by a line
//! marker (by default the literal two characters `\n`). Keys and labels are
//! trimmed; a line without a comma maps its key to an empty label. When a
//! key repeats, the later line wins.

use std::collections::HashMap;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnumTable {
    labels: HashMap<String, String>,
}

impl EnumTable {
    /// Parse a raw enumeration definition, splitting on `line_marker` and on real newlines.
    pub fn parse(spec: &str, line_marker: &str) -> Self {
        let mut labels = HashMap::new();
        for line in spec.split(line_marker).flat_map(|chunk| chunk.split('\n')) {
            if line.trim().is_empty() {
                continue;
            }
            let (key, label) = line.split_once(',').unwrap_or((line, ""));
            labels.insert(key.trim().to_string(), label.trim().to_string());
        }
        Self { labels }
    }

    /// Display label for a stored key (exact match against trimmed keys).
    pub fn label(&self, key: &str) -> Option<&str> {
        self.labels.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}
