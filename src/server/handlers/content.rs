//! Blog and area guide handlers.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;

use crate::filters::Listing;
use crate::models::{AreaGuide, BlogPost};
use crate::server::error::ApiError;
use crate::server::state::AppState;

pub async fn list_posts(State(state): State<AppState>) -> Json<Vec<BlogPost>> {
    Json(state.store.posts(true).await)
}

/// Drafts are invisible to the public site.
pub async fn get_post(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<BlogPost>, ApiError> {
    let post = state.store.post(&slug).await?;
    if !post.published {
        return Err(ApiError::NotFound(format!("post '{}'", slug)));
    }
    Ok(Json(post))
}

/// Area guide entry with its live listing count
#[derive(Debug, Serialize)]
pub struct AreaSummary {
    #[serde(flatten)]
    pub area: AreaGuide,
    pub listing_count: usize,
}

fn summarize(area: AreaGuide, listings: &[Listing]) -> AreaSummary {
    let listing_count = listings
        .iter()
        .filter(|l| l.city.eq_ignore_ascii_case(&area.name))
        .count();
    AreaSummary { area, listing_count }
}

pub async fn list_areas(State(state): State<AppState>) -> Json<Vec<AreaSummary>> {
    let catalog = state.catalog().await;
    let areas = state.store.areas().await;
    Json(
        areas
            .into_iter()
            .map(|area| summarize(area, catalog.listings()))
            .collect(),
    )
}

pub async fn get_area(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<AreaSummary>, ApiError> {
    let area = state.store.area(&slug).await?;
    let catalog = state.catalog().await;
    Ok(Json(summarize(area, catalog.listings())))
}
