//! Landing page query handling: parameters, filtering and sorting.

mod filter;
mod params;
mod sort;

pub use filter::{FilterOptions, FilterSpec, TAGS_FIELD, filter_records, match_tags, matches};
pub use params::{QueryParam, QueryParams};
pub use sort::{SortKey, compare_field_values, sort_records};
