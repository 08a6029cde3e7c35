//! Contact and evaluation form submissions.

use axum::{extract::State, http::StatusCode, Json};

use crate::models::{Lead, LeadKind};
use crate::server::error::ApiError;
use crate::server::state::AppState;
use crate::store::LeadInput;

fn validate(input: &LeadInput) -> Result<(), ApiError> {
    if input.name.trim().is_empty() {
        return Err(ApiError::BadRequest("name is required".to_string()));
    }
    let email = input.email.trim();
    if email.is_empty() || !email.contains('@') {
        return Err(ApiError::BadRequest("a valid email is required".to_string()));
    }
    if input.kind == LeadKind::Evaluation && input.evaluation.is_none() {
        return Err(ApiError::BadRequest(
            "evaluation requests need property details".to_string(),
        ));
    }
    Ok(())
}

pub async fn submit_lead(
    State(state): State<AppState>,
    Json(input): Json<LeadInput>,
) -> Result<(StatusCode, Json<Lead>), ApiError> {
    validate(&input)?;
    if let Some(id) = input.property_id {
        state.store.property(id).await?;
    }
    let lead = state.store.add_lead(input).await?;
    Ok((StatusCode::CREATED, Json(lead)))
}
