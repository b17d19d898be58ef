//! Landing page use case
//!
//! Applies a page's raw query string to its resource list: every parameter
//! becomes a filter (repeated keys widen the match) and `sort` picks the
//! ordering.

use cirrus_domain::{
    FilterOptions, FilterSpec, QueryParam, QueryParams, Record, SortKey, TagStyle, filter_records,
    sort_records,
};
use tracing::debug;

use crate::ApplicationResult;

/// Query parameter carrying the sort key.
pub const SORT_PARAM: &str = "sort";

/// Suffix of a landing page's JSON items endpoint.
const JSON_SUFFIX: &str = "/json";

/// Per-page filtering options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LandingOptions {
    /// Query keys that never filter (paging, display flags).
    pub ignore_fields: Vec<String>,
    /// Sort used when the query has none.
    pub default_sort: Option<SortKey>,
    /// Shape of the records' tags.
    pub tag_style: TagStyle,
}

impl LandingOptions {
    /// Ignores the given query keys.
    #[must_use]
    pub fn ignoring<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignore_fields.extend(fields.into_iter().map(Into::into));
        self
    }

    /// Sorts by `key` when the query does not say otherwise.
    #[must_use]
    pub fn with_default_sort(mut self, key: SortKey) -> Self {
        self.default_sort = Some(key);
        self
    }

    /// Sets the tag style.
    #[must_use]
    pub const fn with_tag_style(mut self, tag_style: TagStyle) -> Self {
        self.tag_style = tag_style;
        self
    }
}

/// Query → filter → sort over a landing page's records.
pub struct LandingPage;

impl LandingPage {
    /// Filters and sorts `records` by the raw query string.
    ///
    /// # Errors
    ///
    /// Returns a domain error for a malformed query or an empty sort key.
    pub fn apply<R: Record>(
        records: Vec<R>,
        query: &str,
        options: &LandingOptions,
    ) -> ApplicationResult<Vec<R>> {
        let params = QueryParams::parse(query)?;
        let sort = match params.get(SORT_PARAM).filter(|s| !s.is_empty()) {
            Some(key) => Some(SortKey::parse(key)?),
            None => options.default_sort.clone(),
        };

        let spec = FilterSpec::from_query(&params).without(&[SORT_PARAM]);
        let filter_options = FilterOptions::ignoring(options.ignore_fields.iter().cloned())
            .with_tag_style(options.tag_style);
        let total = records.len();
        let mut records = filter_records(records, &spec, &filter_options);
        debug!(
            total,
            matched = records.len(),
            sort = ?sort.as_ref().map(ToString::to_string),
            "applied landing page query"
        );

        if let Some(key) = sort {
            sort_records(&mut records, &key);
        }
        Ok(records)
    }

    /// The JSON items endpoint of the page at `path`, keeping `query`.
    #[must_use]
    pub fn json_endpoint_url(path: &str, query: &QueryParams) -> String {
        let path = path.trim_end_matches('/');
        let query = query.to_query_string();
        if query.is_empty() {
            format!("{path}{JSON_SUFFIX}")
        } else {
            format!("{path}{JSON_SUFFIX}?{query}")
        }
    }

    /// Query parameters that narrow the page, without the sort key.
    #[must_use]
    pub fn filter_params(params: &QueryParams, options: &LandingOptions) -> Vec<QueryParam> {
        params
            .all()
            .iter()
            .filter(|p| p.key != SORT_PARAM && !options.ignore_fields.contains(&p.key))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::ApplicationError;
    use cirrus_domain::{DomainError, ResourceRecord, Tag};
    use pretty_assertions::assert_eq;

    fn volumes() -> Vec<ResourceRecord> {
        vec![
            ResourceRecord::new()
                .with("id", "vol-1")
                .with("status", "available")
                .with("size", 10)
                .with("zone", "zone-a"),
            ResourceRecord::new()
                .with("id", "vol-2")
                .with("status", "in-use")
                .with("size", 2)
                .with("zone", "zone-b")
                .with_tag("Name", "db"),
            ResourceRecord::new()
                .with("id", "vol-3")
                .with("status", "deleting")
                .with("size", 100)
                .with("zone", "zone-a"),
        ]
    }

    fn ids(records: &[ResourceRecord]) -> Vec<String> {
        records
            .iter()
            .map(|r| r.attributes["id"].as_str().unwrap().to_string())
            .collect()
    }

    #[test]
    fn test_empty_query_keeps_order() {
        let records = LandingPage::apply(volumes(), "", &LandingOptions::default()).unwrap();
        assert_eq!(ids(&records), vec!["vol-1", "vol-2", "vol-3"]);
    }

    #[test]
    fn test_repeated_keys_widen_match() {
        let records = LandingPage::apply(
            volumes(),
            "?status=available&status=in-use&zone=zone-a",
            &LandingOptions::default(),
        )
        .unwrap();
        assert_eq!(ids(&records), vec!["vol-1"]);
    }

    #[test]
    fn test_sort_param_is_not_a_filter() {
        let records =
            LandingPage::apply(volumes(), "sort=-size", &LandingOptions::default()).unwrap();
        assert_eq!(ids(&records), vec!["vol-3", "vol-1", "vol-2"]);
    }

    #[test]
    fn test_default_sort_and_ignored_fields() {
        let options = LandingOptions::default()
            .ignoring(["page", "display"])
            .with_default_sort(SortKey::ascending("size"));
        let records = LandingPage::apply(volumes(), "page=2&zone=zone-a", &options).unwrap();
        assert_eq!(ids(&records), vec!["vol-1", "vol-3"]);
    }

    #[test]
    fn test_tag_filter() {
        let records =
            LandingPage::apply(volumes(), "tags=db", &LandingOptions::default()).unwrap();
        assert_eq!(ids(&records), vec!["vol-2"]);
    }

    #[test]
    fn test_object_list_tags() {
        let groups = vec![
            ResourceRecord::new()
                .with("id", "asg-1")
                .with_tag_objects(vec![Tag::new("team", "web")]),
            ResourceRecord::new()
                .with("id", "asg-2")
                .with_tag_objects(vec![Tag::new("team", "batch")]),
        ];
        let options = LandingOptions::default().with_tag_style(TagStyle::ObjectList);
        let records = LandingPage::apply(groups, "tags=batch", &options).unwrap();
        assert_eq!(ids(&records), vec!["asg-2"]);
    }

    #[test]
    fn test_bad_sort_key() {
        let result = LandingPage::apply(volumes(), "sort=-", &LandingOptions::default());
        assert!(matches!(
            result,
            Err(ApplicationError::Domain(DomainError::InvalidSortKey(_)))
        ));
    }

    #[test]
    fn test_json_endpoint_url() {
        let params = QueryParams::parse("status=in-use&sort=id").unwrap();
        assert_eq!(
            LandingPage::json_endpoint_url("/volumes/", &params),
            "/volumes/json?status=in-use&sort=id"
        );
        assert_eq!(
            LandingPage::json_endpoint_url("/volumes", &QueryParams::new()),
            "/volumes/json"
        );
    }

    #[test]
    fn test_filter_params() {
        let params = QueryParams::parse("status=in-use&sort=id&page=3").unwrap();
        let options = LandingOptions::default().ignoring(["page"]);
        assert_eq!(
            LandingPage::filter_params(&params, &options),
            vec![QueryParam::new("status", "in-use")]
        );
    }
}
