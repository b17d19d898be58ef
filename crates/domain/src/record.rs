//! Schema-less access to provider resource descriptions.
//!
//! Filtering and sorting operate purely against the [`Record`] trait, so any
//! resource family (instances, volumes, scaling groups, ...) can be listed on
//! a landing page without a dedicated filter implementation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The value of a named attribute on a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// A single value rendered as a string.
    Scalar(String),
    /// A sequence of values rendered as strings.
    List(Vec<String>),
    /// The record has no such attribute, or it is null.
    Absent,
}

impl FieldValue {
    /// Builds a scalar.
    #[must_use]
    pub fn scalar(value: impl Into<String>) -> Self {
        Self::Scalar(value.into())
    }

    /// Builds a scalar from an optional value, `None` becoming `Absent`.
    #[must_use]
    pub fn optional<S: Into<String>>(value: Option<S>) -> Self {
        value.map_or(Self::Absent, |v| Self::Scalar(v.into()))
    }

    /// Returns true when the attribute is missing or empty.
    #[must_use]
    pub fn is_absent(&self) -> bool {
        match self {
            Self::Absent => true,
            Self::Scalar(s) => s.is_empty(),
            Self::List(_) => false,
        }
    }
}

impl From<&Value> for FieldValue {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => Self::Absent,
            Value::String(s) => Self::Scalar(s.clone()),
            Value::Bool(b) => Self::Scalar(b.to_string()),
            Value::Number(n) => Self::Scalar(n.to_string()),
            Value::Array(items) => Self::List(
                items
                    .iter()
                    .filter_map(|item| match Self::from(item) {
                        Self::Scalar(s) => Some(s),
                        _ => None,
                    })
                    .collect(),
            ),
            Value::Object(_) => Self::Scalar(value.to_string()),
        }
    }
}

/// A key/value tag object, as returned by the auto scaling API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    /// Tag key.
    pub key: String,
    /// Tag value.
    #[serde(default)]
    pub value: String,
}

impl Tag {
    /// Creates a tag.
    #[must_use]
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// How a record exposes its tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TagStyle {
    /// A mapping from key to value (EC2 style).
    #[default]
    Mapping,
    /// A list of key/value objects (auto scaling style).
    ObjectList,
}

/// Capability trait for anything that can be filtered and sorted by name.
pub trait Record {
    /// Returns the attribute called `name`, or [`FieldValue::Absent`].
    fn field(&self, name: &str) -> FieldValue;

    /// Tags as a key/value mapping, when the record has them.
    fn tag_map(&self) -> Option<&BTreeMap<String, String>> {
        None
    }

    /// Tags as a list of key/value objects.
    fn tag_objects(&self) -> &[Tag] {
        &[]
    }
}

/// Tags attached to a [`ResourceRecord`], in either supported shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordTags {
    /// Key to value mapping.
    Mapping(BTreeMap<String, String>),
    /// Auto scaling tag objects.
    ObjectList(Vec<Tag>),
}

impl Default for RecordTags {
    fn default() -> Self {
        Self::Mapping(BTreeMap::new())
    }
}

/// A generic resource description: a bag of named attributes plus tags.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceRecord {
    /// Tags attached to the resource.
    #[serde(default)]
    pub tags: RecordTags,

    /// Every other attribute.
    #[serde(flatten)]
    pub attributes: BTreeMap<String, Value>,
}

impl ResourceRecord {
    /// Creates an empty record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets an attribute.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Adds a mapping-style tag, converting object-list tags if needed.
    #[must_use]
    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        match &mut self.tags {
            RecordTags::Mapping(map) => {
                map.insert(key.into(), value.into());
            }
            RecordTags::ObjectList(list) => list.push(Tag::new(key, value)),
        }
        self
    }

    /// Replaces the tags with auto scaling style tag objects.
    #[must_use]
    pub fn with_tag_objects(mut self, tags: Vec<Tag>) -> Self {
        self.tags = RecordTags::ObjectList(tags);
        self
    }
}

impl Record for ResourceRecord {
    fn field(&self, name: &str) -> FieldValue {
        self.attributes
            .get(name)
            .map_or(FieldValue::Absent, FieldValue::from)
    }

    fn tag_map(&self) -> Option<&BTreeMap<String, String>> {
        match &self.tags {
            RecordTags::Mapping(map) => Some(map),
            RecordTags::ObjectList(_) => None,
        }
    }

    fn tag_objects(&self) -> &[Tag] {
        match &self.tags {
            RecordTags::ObjectList(list) => list,
            RecordTags::Mapping(_) => &[],
        }
    }
}

impl<R: Record + ?Sized> Record for &R {
    fn field(&self, name: &str) -> FieldValue {
        (**self).field(name)
    }

    fn tag_map(&self) -> Option<&BTreeMap<String, String>> {
        (**self).tag_map()
    }

    fn tag_objects(&self) -> &[Tag] {
        (**self).tag_objects()
    }
}
