//! Dashboard handlers. Every route here requires an [`AdminSession`].

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::filters::derive_fields;
use crate::insights::{self, DashboardOverview};
use crate::models::{AreaGuide, BlogPost, Lead, Property, PropertyInput};
use crate::server::auth::AdminSession;
use crate::server::error::ApiError;
use crate::server::state::AppState;
use crate::store::PostInput;

pub async fn overview(
    State(state): State<AppState>,
    _admin: AdminSession,
) -> Json<DashboardOverview> {
    let content = state.store.snapshot().await;
    let listings = derive_fields(content.properties);
    Json(insights::dashboard_overview(&listings, &content.posts, &content.leads))
}

pub async fn list_leads(State(state): State<AppState>, _admin: AdminSession) -> Json<Vec<Lead>> {
    Json(state.store.leads().await)
}

fn check_property(input: &PropertyInput) -> Result<(), ApiError> {
    if input.title.trim().is_empty() {
        return Err(ApiError::BadRequest("title is required".to_string()));
    }
    if input.location.trim().is_empty() {
        return Err(ApiError::BadRequest("location is required".to_string()));
    }
    Ok(())
}

pub async fn create_property(
    State(state): State<AppState>,
    _admin: AdminSession,
    Json(input): Json<PropertyInput>,
) -> Result<(StatusCode, Json<Property>), ApiError> {
    check_property(&input)?;
    let property = state.store.create_property(input).await?;
    Ok((StatusCode::CREATED, Json(property)))
}

pub async fn update_property(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<u64>,
    Json(input): Json<PropertyInput>,
) -> Result<Json<Property>, ApiError> {
    check_property(&input)?;
    Ok(Json(state.store.update_property(id, input).await?))
}

pub async fn delete_property(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<u64>,
) -> Result<StatusCode, ApiError> {
    state.store.delete_property(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Drafts included
pub async fn list_posts(State(state): State<AppState>, _admin: AdminSession) -> Json<Vec<BlogPost>> {
    Json(state.store.posts(false).await)
}

pub async fn create_post(
    State(state): State<AppState>,
    _admin: AdminSession,
    Json(input): Json<PostInput>,
) -> Result<(StatusCode, Json<BlogPost>), ApiError> {
    if input.title.trim().is_empty() {
        return Err(ApiError::BadRequest("title is required".to_string()));
    }
    let post = state.store.create_post(input).await?;
    Ok((StatusCode::CREATED, Json(post)))
}

pub async fn update_post(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(slug): Path<String>,
    Json(input): Json<PostInput>,
) -> Result<Json<BlogPost>, ApiError> {
    Ok(Json(state.store.update_post(&slug, input).await?))
}

pub async fn delete_post(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(slug): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.store.delete_post(&slug).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// The path slug wins over any slug in the body
pub async fn upsert_area(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(slug): Path<String>,
    Json(mut area): Json<AreaGuide>,
) -> Result<Json<AreaGuide>, ApiError> {
    if area.name.trim().is_empty() {
        return Err(ApiError::BadRequest("name is required".to_string()));
    }
    area.slug = slug;
    Ok(Json(state.store.upsert_area(area).await?))
}

pub async fn delete_area(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(slug): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.store.delete_area(&slug).await?;
    Ok(StatusCode::NO_CONTENT)
}
