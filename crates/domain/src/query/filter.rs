//! Attribute-based filtering of resource records.
//!
//! A record passes a [`FilterSpec`] when it matches every field (AND) and,
//! within a field, any one accepted value (OR). The reserved `tags` field
//! matches tag keys or values instead of an attribute.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::params::QueryParams;
use crate::record::{FieldValue, Record, TagStyle};
use crate::text::unescape_braces;

/// Reserved filter field that matches against tags.
pub const TAGS_FIELD: &str = "tags";

/// Accepted tokens for records whose attribute is missing.
const NONE_TOKENS: [&str; 2] = ["none", "None"];

/// Filter field name to accepted values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterSpec {
    fields: BTreeMap<String, Vec<String>>,
}

impl FilterSpec {
    /// Creates an empty filter.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            fields: BTreeMap::new(),
        }
    }

    /// Groups query parameters by key.
    #[must_use]
    pub fn from_query(params: &QueryParams) -> Self {
        let mut spec = Self::new();
        for param in params.all() {
            spec.fields
                .entry(param.key.clone())
                .or_default()
                .push(param.value.clone());
        }
        spec
    }

    /// Adds accepted values for a field.
    #[must_use]
    pub fn with<I, S>(mut self, field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields
            .entry(field.into())
            .or_default()
            .extend(values.into_iter().map(Into::into));
        self
    }

    /// Removes the named fields.
    #[must_use]
    pub fn without<S: AsRef<str>>(mut self, ignore: &[S]) -> Self {
        for field in ignore {
            self.fields.remove(field.as_ref());
        }
        self
    }

    /// Returns the accepted values for a field.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.fields.get(field).map(Vec::as_slice)
    }

    /// Iterates fields and their accepted values.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Returns true when no field is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Returns the number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }
}

/// Options controlling [`filter_records`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterOptions {
    /// Fields removed from the filter before matching (e.g. paging params).
    pub ignore_fields: Vec<String>,
    /// Shape of the records' tags.
    pub tag_style: TagStyle,
}

impl FilterOptions {
    /// Options that ignore the given fields.
    #[must_use]
    pub fn ignoring<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            ignore_fields: fields.into_iter().map(Into::into).collect(),
            tag_style: TagStyle::Mapping,
        }
    }

    /// Sets the tag style.
    #[must_use]
    pub const fn with_tag_style(mut self, tag_style: TagStyle) -> Self {
        self.tag_style = tag_style;
        self
    }
}

/// Keeps the records matching `filter`, preserving order.
///
/// An empty filter (after removing ignored fields) returns `records` untouched.
#[must_use]
pub fn filter_records<R: Record>(
    records: Vec<R>,
    filter: &FilterSpec,
    options: &FilterOptions,
) -> Vec<R> {
    let filter = filter.clone().without(options.ignore_fields.as_slice());
    if filter.is_empty() {
        return records;
    }
    records
        .into_iter()
        .filter(|record| matches(record, &filter, options.tag_style))
        .collect()
}

/// Returns true when `record` matches every field of `filter`.
#[must_use]
pub fn matches<R: Record + ?Sized>(record: &R, filter: &FilterSpec, tag_style: TagStyle) -> bool {
    filter.iter().all(|(field, values)| {
        let accepted: Vec<&str> = values
            .iter()
            .map(String::as_str)
            .filter(|v| !v.is_empty())
            .collect();
        if accepted.is_empty() {
            return true;
        }
        if field == TAGS_FIELD {
            let tokens: Vec<String> = accepted
                .iter()
                .flat_map(|v| v.split(','))
                .map(|t| unescape_braces(t.trim()))
                .filter(|t| !t.is_empty())
                .collect();
            return match_tags(record, &tokens, tag_style);
        }
        match_field(&record.field(field), &accepted)
    })
}

fn match_field(value: &FieldValue, accepted: &[&str]) -> bool {
    let accepted: BTreeSet<&str> = accepted.iter().copied().collect();
    match value {
        FieldValue::List(items) => items.iter().any(|item| accepted.contains(item.as_str())),
        FieldValue::Scalar(s) if !s.is_empty() => accepted.contains(s.as_str()),
        _ => NONE_TOKENS.iter().any(|t| accepted.contains(t)),
    }
}

/// Returns true when any token equals a tag key or value on the record.
#[must_use]
pub fn match_tags<R: Record + ?Sized, S: AsRef<str>>(
    record: &R,
    tokens: &[S],
    tag_style: TagStyle,
) -> bool {
    tokens.iter().map(|t| t.as_ref().trim()).any(|token| match tag_style {
        TagStyle::Mapping => record
            .tag_map()
            .is_some_and(|tags| tags.iter().any(|(k, v)| k == token || v == token)),
        TagStyle::ObjectList => record
            .tag_objects()
            .iter()
            .any(|tag| tag.key == token || tag.value == token),
    })
}
