//! Input data model: field descriptors and nested record data.
//!
//! Both structures arrive from the host exactly as it builds them for its PDF
//! renderer. [`FieldDescriptor`] keeps any attribute this crate does not
//! interpret in [`FieldDescriptor::extra`] so a JSON round-trip through the
//! CLI hands the renderer back everything it sent.
//!
//! Record data is ordered: when several records or events carry a value for
//! the same field, the last one in document order wins the presence check.
//! [`OrderedMap`] preserves that order through serde, which a `BTreeMap` or
//! `HashMap` would not.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::marker::PhantomData;

/// One form field, in declaration order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Unique variable name; key into record data.
    pub field_name: String,

    /// Rendering kind, e.g. `text`, `radio`, `select`, `sql`, `notes`.
    #[serde(default, deserialize_with = "nullable_string")]
    pub element_type: String,

    /// Raw enumeration, `key, label` pairs separated by the enum line marker.
    #[serde(default, deserialize_with = "nullable_string")]
    pub element_enum: String,

    #[serde(default, deserialize_with = "nullable_string")]
    pub element_label: String,

    #[serde(default, deserialize_with = "nullable_string")]
    pub element_note: String,

    /// Free-text annotation carrying the action tags.
    #[serde(default, deserialize_with = "nullable_string")]
    pub misc: String,

    /// Host attributes passed through untouched (form name, branching logic, ...).
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl FieldDescriptor {
    /// Create a descriptor with the given name and element type and empty text attributes.
    pub fn new(field_name: impl Into<String>, element_type: impl Into<String>) -> Self {
        Self {
            field_name: field_name.into(),
            element_type: element_type.into(),
            element_enum: String::new(),
            element_label: String::new(),
            element_note: String::new(),
            misc: String::new(),
            extra: BTreeMap::new(),
        }
    }

    pub fn with_enum(mut self, element_enum: impl Into<String>) -> Self {
        self.element_enum = element_enum.into();
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.element_label = label.into();
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.element_note = note.into();
        self
    }

    pub fn with_misc(mut self, misc: impl Into<String>) -> Self {
        self.misc = misc.into();
        self
    }
}

/// Host metadata uses `null` for unset text attributes.
fn nullable_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Field name → raw stored value for one event of one record.
pub type FieldValues = BTreeMap<String, String>;

/// Event identifier → field values, in document order.
pub type EventData = OrderedMap<FieldValues>;

/// Record identifier → events, in document order.
pub type RecordData = OrderedMap<EventData>;

/// A string-keyed map that keeps insertion order.
///
/// Keys are unique: [`OrderedMap::insert`] replaces the value of an existing
/// key in place rather than moving it to the end. A key → position index
/// sits beside the entries, so lookups are O(1).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderedMap<V> {
    entries: Vec<(String, V)>,
    index: HashMap<String, usize>,
}

impl<V> Default for OrderedMap<V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<V> OrderedMap<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.index.get(key).map(|&i| &self.entries[i].1)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        let i = *self.index.get(key)?;
        Some(&mut self.entries[i].1)
    }

    /// Insert or replace. Returns the previous value when the key existed.
    pub fn insert(&mut self, key: impl Into<String>, value: V) -> Option<V> {
        let key = key.into();
        match self.index.get(&key) {
            Some(&i) => Some(std::mem::replace(&mut self.entries[i].1, value)),
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>, V> FromIterator<(K, V)> for OrderedMap<V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = OrderedMap::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

impl<V: Serialize> Serialize for OrderedMap<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl<'de, V: Deserialize<'de>> Deserialize<'de> for OrderedMap<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct OrderedMapVisitor<V>(PhantomData<V>);

        impl<'de, V: Deserialize<'de>> Visitor<'de> for OrderedMapVisitor<V> {
            type Value = OrderedMap<V>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map with string keys")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut map = OrderedMap::new();
                while let Some((k, v)) = access.next_entry::<String, V>()? {
                    map.insert(k, v);
                }
                Ok(map)
            }
        }

        deserializer.deserialize_map(OrderedMapVisitor(PhantomData))
    }
}
