//! Presence map: which fields hold a value anywhere in the record data.
//!
//! Built once from the untouched input, before any directive runs, and
//! read-only afterwards. For each field the last non-empty value in document
//! order (records, then events within a record) is kept. In empty-template
//! mode no field has a value, whatever a placeholder record contains.

use crate::config::RenderMode;
use crate::model::{FieldDescriptor, RecordData};
use std::collections::HashMap;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PresenceMap {
    values: HashMap<String, Option<String>>,
}

impl PresenceMap {
    pub fn build(fields: &[FieldDescriptor], records: &RecordData, mode: RenderMode) -> Self {
        let mut values: HashMap<String, Option<String>> = fields
            .iter()
            .map(|f| (f.field_name.clone(), None))
            .collect();

        if mode.is_with_data() {
            for (_, events) in records.iter() {
                for (_, field_values) in events.iter() {
                    for (name, value) in field_values {
                        if value.is_empty() {
                            continue;
                        }
                        if let Some(slot) = values.get_mut(name) {
                            *slot = Some(value.clone());
                        }
                    }
                }
            }
        }

        Self { values }
    }

    /// Whether `field_name` is a field of this form.
    pub fn is_known(&self, field_name: &str) -> bool {
        self.values.contains_key(field_name)
    }

    /// Whether `field_name` has a non-empty value. Unknown fields have none.
    pub fn is_present(&self, field_name: &str) -> bool {
        self.value(field_name).is_some()
    }

    /// The last non-empty value seen for `field_name`.
    pub fn value(&self, field_name: &str) -> Option<&str> {
        self.values.get(field_name)?.as_deref()
    }

    pub fn present_count(&self) -> usize {
        self.values.values().filter(|v| v.is_some()).count()
    }
}
