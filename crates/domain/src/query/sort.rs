//! Key-based sorting of resource records.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::error::{DomainError, DomainResult};
use crate::record::{FieldValue, Record};

/// A sort field with direction; a leading `-` means descending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    field: String,
    descending: bool,
}

impl SortKey {
    /// Creates an ascending sort key.
    #[must_use]
    pub fn ascending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            descending: false,
        }
    }

    /// Creates a descending sort key.
    #[must_use]
    pub fn descending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            descending: true,
        }
    }

    /// Parses `name` or `-name`.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidSortKey`] when no field name remains.
    pub fn parse(key: &str) -> DomainResult<Self> {
        let key = key.trim();
        let (field, descending) = key
            .strip_prefix('-')
            .map_or((key, false), |rest| (rest, true));
        if field.is_empty() {
            return Err(DomainError::InvalidSortKey(key.to_string()));
        }
        Ok(Self {
            field: field.to_string(),
            descending,
        })
    }

    /// Field name.
    #[must_use]
    pub fn field(&self) -> &str {
        &self.field
    }

    /// True when sorting high to low.
    #[must_use]
    pub const fn is_descending(&self) -> bool {
        self.descending
    }
}

impl FromStr for SortKey {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.descending {
            f.write_str("-")?;
        }
        f.write_str(&self.field)
    }
}

/// Stable sort by the key's field; equal values keep their source order.
pub fn sort_records<R: Record>(records: &mut [R], key: &SortKey) {
    records.sort_by(|a, b| {
        let ordering = compare_field_values(&a.field(key.field()), &b.field(key.field()));
        if key.descending { ordering.reverse() } else { ordering }
    });
}

/// Orders field values: absent first, then scalars, then lists.
///
/// Numeric scalars sort before non-numeric ones. Two numbers compare
/// numerically, two non-numbers lexicographically.
#[must_use]
pub fn compare_field_values(a: &FieldValue, b: &FieldValue) -> Ordering {
    match (a, b) {
        (FieldValue::Absent, FieldValue::Absent) => Ordering::Equal,
        (FieldValue::Absent, _) => Ordering::Less,
        (_, FieldValue::Absent) => Ordering::Greater,
        (FieldValue::Scalar(x), FieldValue::Scalar(y)) => compare_scalars(x, y),
        (FieldValue::Scalar(_), FieldValue::List(_)) => Ordering::Less,
        (FieldValue::List(_), FieldValue::Scalar(_)) => Ordering::Greater,
        (FieldValue::List(x), FieldValue::List(y)) => x
            .iter()
            .zip(y)
            .map(|(p, q)| compare_scalars(p, q))
            .find(|o| o.is_ne())
            .unwrap_or_else(|| x.len().cmp(&y.len())),
    }
}

fn compare_scalars(a: &str, b: &str) -> Ordering {
    match (a.parse::<f64>(), b.parse::<f64>()) {
        (Ok(x), Ok(y)) => x.total_cmp(&y).then_with(|| a.cmp(b)),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::record::ResourceRecord;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn names(records: &[ResourceRecord]) -> Vec<String> {
        records
            .iter()
            .map(|r| match r.field("name") {
                FieldValue::Scalar(s) => s,
                _ => "-".to_string(),
            })
            .collect()
    }

    fn named(name: &str) -> ResourceRecord {
        ResourceRecord::new().with("name", name)
    }

    #[test]
    fn test_parse_sort_key() {
        let key = SortKey::parse("-launch_time").unwrap();
        assert_eq!(key.field(), "launch_time");
        assert!(key.is_descending());
        assert_eq!(key.to_string(), "-launch_time");
        assert!(SortKey::parse("-").is_err());
        assert!(SortKey::parse("").is_err());
    }

    #[test]
    fn test_descending_is_reverse_of_ascending() {
        let mut asc = vec![named("b"), named("c"), named("a")];
        let mut desc = asc.clone();
        sort_records(&mut asc, &SortKey::parse("name").unwrap());
        sort_records(&mut desc, &SortKey::parse("-name").unwrap());
        assert_eq!(names(&asc), vec!["a", "b", "c"]);
        let mut reversed = names(&asc);
        reversed.reverse();
        assert_eq!(names(&desc), reversed);
    }

    #[test]
    fn test_sort_is_stable_for_ties() {
        let mut records = vec![
            ResourceRecord::new().with("name", "x").with("id", 1),
            ResourceRecord::new().with("name", "x").with("id", 2),
            ResourceRecord::new().with("name", "a").with("id", 3),
        ];
        sort_records(&mut records, &SortKey::ascending("name"));
        let ids: Vec<_> = records.iter().map(|r| r.attributes["id"].clone()).collect();
        assert_eq!(ids, vec![json!(3), json!(1), json!(2)]);
    }

    #[test]
    fn test_numeric_and_absent_ordering() {
        let mut records = vec![
            ResourceRecord::new().with("size", 10),
            ResourceRecord::new(),
            ResourceRecord::new().with("size", 9),
        ];
        sort_records(&mut records, &SortKey::ascending("size"));
        let sizes: Vec<_> = records.iter().map(|r| r.field("size")).collect();
        assert_eq!(
            sizes,
            vec![
                FieldValue::Absent,
                FieldValue::scalar("9"),
                FieldValue::scalar("10")
            ]
        );
    }

    #[test]
    fn test_mixed_numeric_and_text_order_is_total() {
        let cmp = |a: &str, b: &str| {
            compare_field_values(&FieldValue::scalar(a), &FieldValue::scalar(b))
        };
        assert_eq!(cmp("9", "10"), Ordering::Less);
        assert_eq!(cmp("10", "1a"), Ordering::Less);
        assert_eq!(cmp("9", "1a"), Ordering::Less);
        assert_eq!(cmp("1a", "9"), Ordering::Greater);

        let inputs = [
            vec!["1a", "9", "10", "b"],
            vec!["10", "b", "1a", "9"],
            vec!["b", "1a", "10", "9"],
        ];
        for input in inputs {
            let mut asc: Vec<_> = input.iter().map(|n| named(n)).collect();
            let mut desc = asc.clone();
            sort_records(&mut asc, &SortKey::parse("name").unwrap());
            sort_records(&mut desc, &SortKey::parse("-name").unwrap());
            assert_eq!(names(&asc), vec!["9", "10", "1a", "b"]);
            assert_eq!(names(&desc), vec!["b", "1a", "10", "9"]);
        }
    }
}
