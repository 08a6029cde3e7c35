use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::models::PropertyType;

pub const FALLBACK_PRICE_RANGE: ValueRange<u64> = ValueRange(0, 100_000_000);
pub const FALLBACK_BEDROOM_RANGE: ValueRange<u32> = ValueRange(0, 20);
pub const FALLBACK_BATHROOM_RANGE: ValueRange<u32> = ValueRange(0, 20);

/// Inclusive `[min, max]` range, serialized as a two element array
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ValueRange<T>(pub T, pub T);

impl<T: PartialOrd + Copy> ValueRange<T> {
    pub fn min(&self) -> T {
        self.0
    }

    pub fn max(&self) -> T {
        self.1
    }

    pub fn contains(&self, value: T) -> bool {
        value >= self.0 && value <= self.1
    }
}

/// Result ordering
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    #[default]
    Default,
    PriceAsc,
    PriceDesc,
    Newest,
    Oldest,
    BedroomsAsc,
    BedroomsDesc,
}

impl SortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Default => "default",
            SortKey::PriceAsc => "price-asc",
            SortKey::PriceDesc => "price-desc",
            SortKey::Newest => "newest",
            SortKey::Oldest => "oldest",
            SortKey::BedroomsAsc => "bedrooms-asc",
            SortKey::BedroomsDesc => "bedrooms-desc",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" | "default" => Ok(SortKey::Default),
            "price-asc" => Ok(SortKey::PriceAsc),
            "price-desc" => Ok(SortKey::PriceDesc),
            "newest" => Ok(SortKey::Newest),
            "oldest" => Ok(SortKey::Oldest),
            "bedrooms-asc" => Ok(SortKey::BedroomsAsc),
            "bedrooms-desc" => Ok(SortKey::BedroomsDesc),
            other => Err(format!("unknown sort key '{}'", other)),
        }
    }
}

/// One dimension of the filter state
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FilterKey {
    PropertyTypes,
    PriceRange,
    BedroomRange,
    BathroomRange,
    Status,
    Locations,
    Amenities,
    SearchQuery,
    SortBy,
}

/// Default ranges for the range filters.
///
/// Observed `[min, max]` of the live listings, or the fallback constants
/// when there is nothing to observe.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct FilterBounds {
    pub price: ValueRange<u64>,
    pub bedrooms: ValueRange<u32>,
    pub bathrooms: ValueRange<u32>,
}

impl Default for FilterBounds {
    fn default() -> Self {
        Self {
            price: FALLBACK_PRICE_RANGE,
            bedrooms: FALLBACK_BEDROOM_RANGE,
            bathrooms: FALLBACK_BATHROOM_RANGE,
        }
    }
}

/// Complete set of user-selected constraints plus sort order.
///
/// Never partial: an unset constraint is an empty set, the full default range,
/// or an empty query.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FilterState {
    pub property_types: BTreeSet<PropertyType>,
    pub price_range: ValueRange<u64>,
    pub bedroom_range: ValueRange<u32>,
    pub bathroom_range: ValueRange<u32>,
    pub status: BTreeSet<String>,
    pub locations: BTreeSet<String>,
    /// Carried for the UI, not used when matching.
    pub amenities: BTreeSet<String>,
    pub search_query: String,
    pub sort_by: SortKey,
}

impl FilterState {
    pub fn with_bounds(bounds: &FilterBounds) -> Self {
        Self {
            property_types: BTreeSet::new(),
            price_range: bounds.price,
            bedroom_range: bounds.bedrooms,
            bathroom_range: bounds.bathrooms,
            status: BTreeSet::new(),
            locations: BTreeSet::new(),
            amenities: BTreeSet::new(),
            search_query: String::new(),
            sort_by: SortKey::Default,
        }
    }

    /// Reset one dimension to its value in `defaults`
    pub fn reset(&mut self, key: FilterKey, defaults: &FilterState) {
        match key {
            FilterKey::PropertyTypes => self.property_types = defaults.property_types.clone(),
            FilterKey::PriceRange => self.price_range = defaults.price_range,
            FilterKey::BedroomRange => self.bedroom_range = defaults.bedroom_range,
            FilterKey::BathroomRange => self.bathroom_range = defaults.bathroom_range,
            FilterKey::Status => self.status = defaults.status.clone(),
            FilterKey::Locations => self.locations = defaults.locations.clone(),
            FilterKey::Amenities => self.amenities = defaults.amenities.clone(),
            FilterKey::SearchQuery => self.search_query = defaults.search_query.clone(),
            FilterKey::SortBy => self.sort_by = defaults.sort_by,
        }
    }
}

impl Default for FilterState {
    fn default() -> Self {
        Self::with_bounds(&FilterBounds::default())
    }
}
