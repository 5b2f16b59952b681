use dicom_core::Tag;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// Normalized value of an extracted DICOM tag
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TagValue {
    Text(String),
    Integer(i64),
    Decimal(f64),
    Integers(Vec<i64>),
    Decimals(Vec<f64>),
}

impl TagValue {
    /// Returns the text content, if this is a text value
    pub fn as_text(&self) -> Option<&str> {
        match self {
            TagValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the integer components, if this is an integer list
    pub fn as_integers(&self) -> Option<&[i64]> {
        match self {
            TagValue::Integers(v) => Some(v),
            _ => None,
        }
    }
}

impl fmt::Display for TagValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagValue::Text(s) => write!(f, "{}", s),
            TagValue::Integer(i) => write!(f, "{}", i),
            TagValue::Decimal(d) => write!(f, "{}", d),
            TagValue::Integers(v) => write!(f, "{:?}", v),
            TagValue::Decimals(v) => write!(f, "{:?}", v),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct TagEntry {
    name: String,
    value: TagValue,
}

/// Extracted tag values of one series, keyed by tag
///
/// Serialized as a map from the human-readable tag name (e.g. `"Series Description"`)
/// to the value, in ascending tag order. Tags absent from the source file are simply
/// not present; there are no null placeholders.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TagTable(BTreeMap<Tag, TagEntry>);

impl TagTable {
    pub fn new() -> Self {
        TagTable(BTreeMap::new())
    }

    pub fn insert(&mut self, tag: Tag, name: impl Into<String>, value: TagValue) {
        self.0.insert(
            tag,
            TagEntry {
                name: name.into(),
                value,
            },
        );
    }

    pub fn get(&self, tag: Tag) -> Option<&TagValue> {
        self.0.get(&tag).map(|entry| &entry.value)
    }

    pub fn contains(&self, tag: Tag) -> bool {
        self.0.contains_key(&tag)
    }

    /// Iterates over `(name, value)` pairs in tag order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &TagValue)> {
        self.0
            .values()
            .map(|entry| (entry.name.as_str(), &entry.value))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for TagTable {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, value) in self.iter() {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}
