//! Option lists for select inputs.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Label of the blank sentinel choice.
pub const BLANK_LABEL: &str = "Select...";

/// One `(value, label)` option.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Choice {
    /// Submitted value.
    pub value: String,
    /// Human-facing label.
    pub label: String,
}

impl Choice {
    /// Creates a choice.
    #[must_use]
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }

    /// Creates a choice whose label equals its value.
    #[must_use]
    pub fn same(value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            label: value.clone(),
            value,
        }
    }

    /// The blank `("", "Select...")` sentinel.
    #[must_use]
    pub fn blank() -> Self {
        Self::new("", BLANK_LABEL)
    }
}

/// An ordered sequence of choices.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChoiceList {
    choices: Vec<Choice>,
}

/// The `{key, label}` shape consumed by client-side widgets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceOption {
    /// Choice value.
    pub key: String,
    /// Choice label.
    pub label: String,
}

impl ChoiceList {
    /// Creates an empty list.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            choices: Vec::new(),
        }
    }

    /// Creates a list starting with the blank sentinel when `add_blank` is set.
    #[must_use]
    pub fn with_blank(add_blank: bool) -> Self {
        let mut list = Self::new();
        if add_blank {
            list.push(Choice::blank());
        }
        list
    }

    /// Appends a choice.
    pub fn push(&mut self, choice: Choice) {
        self.choices.push(choice);
    }

    /// Appends a `(value, label)` pair.
    pub fn push_pair(&mut self, value: impl Into<String>, label: impl Into<String>) {
        self.push(Choice::new(value, label));
    }

    /// Appends every choice from `other`.
    pub fn extend(&mut self, other: Self) {
        self.choices.extend(other.choices);
    }

    /// Deduplicates and sorts by `(value, label)`.
    #[must_use]
    pub fn dedup_sorted(self) -> Self {
        let unique: BTreeSet<Choice> = self.choices.into_iter().collect();
        Self {
            choices: unique.into_iter().collect(),
        }
    }

    /// Sorts by `(value, label)` keeping duplicates.
    #[must_use]
    pub fn sorted(mut self) -> Self {
        self.choices.sort();
        self
    }

    /// Deduplicates and sorts high to low.
    #[must_use]
    pub fn dedup_sorted_desc(self) -> Self {
        let mut list = self.dedup_sorted();
        list.choices.reverse();
        list
    }

    /// Returns the choices.
    #[must_use]
    pub fn as_slice(&self) -> &[Choice] {
        &self.choices
    }

    /// Returns the values in order.
    #[must_use]
    pub fn values(&self) -> Vec<&str> {
        self.choices.iter().map(|c| c.value.as_str()).collect()
    }

    /// Returns true when the list contains a choice with this value.
    #[must_use]
    pub fn contains_value(&self, value: &str) -> bool {
        self.choices.iter().any(|c| c.value == value)
    }

    /// Converts to the `{key, label}` option shape.
    #[must_use]
    pub fn to_options(&self) -> Vec<ChoiceOption> {
        self.choices
            .iter()
            .map(|c| ChoiceOption {
                key: c.value.clone(),
                label: c.label.clone(),
            })
            .collect()
    }

    /// Returns the number of choices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.choices.len()
    }

    /// Returns true if the list is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.choices.is_empty()
    }
}

impl FromIterator<Choice> for ChoiceList {
    fn from_iter<T: IntoIterator<Item = Choice>>(iter: T) -> Self {
        Self {
            choices: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for ChoiceList {
    type Item = Choice;
    type IntoIter = std::vec::IntoIter<Choice>;

    fn into_iter(self) -> Self::IntoIter {
        self.choices.into_iter()
    }
}
