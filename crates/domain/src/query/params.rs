//! Query parameter types

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// A query parameter key-value pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryParam {
    /// The parameter key
    pub key: String,
    /// The parameter value
    pub value: String,
}

impl QueryParam {
    /// Creates a new query parameter.
    #[must_use]
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// An ordered, multi-valued collection of query parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueryParams {
    items: Vec<QueryParam>,
}

impl QueryParams {
    /// Creates an empty query parameter collection.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Parses a URL query string (with or without a leading `?`).
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidQuery`] when a key is empty but a value
    /// is present (e.g. `=running`).
    pub fn parse(query: &str) -> DomainResult<Self> {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut params = Self::new();
        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            if key.is_empty() {
                if value.is_empty() {
                    continue;
                }
                return Err(DomainError::InvalidQuery(format!(
                    "parameter without a name: {value}"
                )));
            }
            params.add(QueryParam::new(key, value));
        }
        Ok(params)
    }

    /// Adds a query parameter to the collection.
    pub fn add(&mut self, param: QueryParam) {
        self.items.push(param);
    }

    /// Returns the first value for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.items
            .iter()
            .find(|p| p.key == key)
            .map(|p| p.value.as_str())
    }

    /// Returns every value for `key`, in order.
    pub fn get_all<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.items
            .iter()
            .filter(move |p| p.key == key)
            .map(|p| p.value.as_str())
    }

    /// Returns all parameters.
    #[must_use]
    pub fn all(&self) -> &[QueryParam] {
        &self.items
    }

    /// Re-encodes the parameters as a query string without a leading `?`.
    #[must_use]
    pub fn to_query_string(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.items.iter().map(|p| (&p.key, &p.value)))
            .finish()
    }

    /// Returns the number of parameters.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if there are no parameters.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl FromIterator<QueryParam> for QueryParams {
    fn from_iter<T: IntoIterator<Item = QueryParam>>(iter: T) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_multi_valued() {
        let params = QueryParams::parse("?status=running&status=stopped&zone=a").unwrap();
        assert_eq!(params.len(), 3);
        assert_eq!(params.get("zone"), Some("a"));
        assert_eq!(
            params.get_all("status").collect::<Vec<_>>(),
            vec!["running", "stopped"]
        );
    }

    #[test]
    fn test_parse_decodes() {
        let params = QueryParams::parse("tags=Name%2Cenv&q=a+b").unwrap();
        assert_eq!(params.get("tags"), Some("Name,env"));
        assert_eq!(params.get("q"), Some("a b"));
    }

    #[test]
    fn test_parse_rejects_nameless_value() {
        assert!(QueryParams::parse("=running").is_err());
        assert!(QueryParams::parse("&&").unwrap().is_empty());
    }

    #[test]
    fn test_to_query_string() {
        let params: QueryParams = vec![QueryParam::new("a", "1"), QueryParam::new("b", "x y")]
            .into_iter()
            .collect();
        assert_eq!(params.to_query_string(), "a=1&b=x+y");
    }
}
