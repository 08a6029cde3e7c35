//! Property search: derived fields, filter predicate, sorting and the
//! default-range bookkeeping behind the filter badges.

pub mod catalog;
pub mod derive;
pub mod engine;
pub mod types;

pub use catalog::Catalog;
pub use derive::{derive_fields, infer_property_type, parse_price, split_location, Listing};
pub use engine::{apply_filters, count_active_filters, sort_listings};
pub use types::{FilterBounds, FilterKey, FilterState, SortKey, ValueRange};
