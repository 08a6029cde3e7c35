//! Public property search handlers.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::str::FromStr;

use crate::filters::{Catalog, FilterBounds, FilterState, Listing, ValueRange};
use crate::insights;
use crate::models::PropertyType;
use crate::server::error::ApiError;
use crate::server::state::AppState;

/// Query-string form of the filter state. Lists are comma separated and
/// anything missing keeps its default.
#[derive(Debug, Default, Deserialize)]
pub struct PropertyQuery {
    pub types: Option<String>,
    pub status: Option<String>,
    pub locations: Option<String>,
    pub amenities: Option<String>,
    pub min_price: Option<u64>,
    pub max_price: Option<u64>,
    pub min_bedrooms: Option<u32>,
    pub max_bedrooms: Option<u32>,
    pub min_bathrooms: Option<u32>,
    pub max_bathrooms: Option<u32>,
    pub q: Option<String>,
    pub sort: Option<String>,
}

impl PropertyQuery {
    /// Overlay the query onto `defaults`
    pub fn into_filters(self, defaults: FilterState) -> Result<FilterState, ApiError> {
        let mut filters = defaults;

        if let Some(types) = self.types {
            filters.property_types = split_list(&types)
                .into_iter()
                .map(|t| PropertyType::from_str(&t))
                .collect::<Result<_, _>>()
                .map_err(ApiError::BadRequest)?;
        }
        if let Some(status) = self.status {
            filters.status = split_list(&status);
        }
        if let Some(locations) = self.locations {
            filters.locations = split_list(&locations);
        }
        if let Some(amenities) = self.amenities {
            filters.amenities = split_list(&amenities);
        }

        filters.price_range = overlay("price", filters.price_range, self.min_price, self.max_price)?;
        filters.bedroom_range =
            overlay("bedroom", filters.bedroom_range, self.min_bedrooms, self.max_bedrooms)?;
        filters.bathroom_range =
            overlay("bathroom", filters.bathroom_range, self.min_bathrooms, self.max_bathrooms)?;

        if let Some(q) = self.q {
            filters.search_query = q;
        }
        if let Some(sort) = self.sort {
            filters.sort_by = sort.parse().map_err(ApiError::BadRequest)?;
        }

        Ok(filters)
    }
}

fn split_list(raw: &str) -> BTreeSet<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn overlay<T: PartialOrd + Copy>(
    name: &str,
    range: ValueRange<T>,
    min: Option<T>,
    max: Option<T>,
) -> Result<ValueRange<T>, ApiError> {
    // A lone bound may fall outside the observed data; the open side follows it.
    match (min, max) {
        (Some(lo), Some(hi)) if lo > hi => Err(ApiError::BadRequest(format!(
            "{} range minimum exceeds maximum",
            name
        ))),
        (Some(lo), Some(hi)) => Ok(ValueRange(lo, hi)),
        (Some(lo), None) => {
            let hi = if range.max() < lo { lo } else { range.max() };
            Ok(ValueRange(lo, hi))
        }
        (None, Some(hi)) => {
            let lo = if range.min() > hi { hi } else { range.min() };
            Ok(ValueRange(lo, hi))
        }
        (None, None) => Ok(range),
    }
}

/// One page of search results
#[derive(Debug, Serialize, Deserialize)]
pub struct SearchResponse {
    pub results: Vec<Listing>,
    pub total: usize,
    pub active_filters: usize,
    pub filters: FilterState,
    pub bounds: FilterBounds,
}

fn search(mut catalog: Catalog, filters: FilterState) -> SearchResponse {
    catalog.set_filters(filters);
    let results = catalog.results();
    SearchResponse {
        total: results.len(),
        active_filters: catalog.active_filter_count(),
        filters: catalog.filters().clone(),
        bounds: *catalog.bounds(),
        results,
    }
}

/// List properties matching the query-string filters.
pub async fn list_properties(
    State(state): State<AppState>,
    Query(query): Query<PropertyQuery>,
) -> Result<Json<SearchResponse>, ApiError> {
    let catalog = state.catalog().await;
    let filters = query.into_filters(catalog.defaults())?;
    Ok(Json(search(catalog, filters)))
}

/// Search with a complete filter state in the body.
pub async fn search_properties(
    State(state): State<AppState>,
    Json(filters): Json<FilterState>,
) -> Result<Json<SearchResponse>, ApiError> {
    let catalog = state.catalog().await;
    Ok(Json(search(catalog, filters)))
}

pub async fn get_property(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<Listing>, ApiError> {
    let property = state.store.property(id).await?;
    Ok(Json(Listing::from_property(property)))
}

pub async fn similar_properties(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<Vec<Listing>>, ApiError> {
    let catalog = state.catalog().await;
    insights::similar_properties(catalog.listings(), id, state.similar_limit)
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("property {}", id)))
}
