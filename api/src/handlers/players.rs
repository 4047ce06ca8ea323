//! Player handlers
//!
//! Endpoints for resolved player profiles and per-player evaluation queries.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;

use crate::app::{CompletedEvaluation, PendingEvaluation};
use crate::domain::entities::{PlayerId, PlayerProfile};
use crate::domain::ports::resolve_profile;
use crate::error::AppError;
use crate::AppState;

/// A profile tagged with the collection it was resolved from
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    #[serde(flatten)]
    pub profile: PlayerProfile,
    pub source: String,
}

/// GET /players/:id
pub async fn get_profile(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ProfileResponse>, AppError> {
    let resolved = resolve_profile(state.directory.as_ref(), &PlayerId(id.clone()))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No profile for player {}", id)))?;

    Ok(Json(ProfileResponse {
        profile: resolved.profile,
        source: resolved.source.to_string(),
    }))
}

/// GET /players/:id/evaluations/pending
pub async fn pending_evaluations(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<PendingEvaluation>>, AppError> {
    let pending = state.evaluation_service.pending_for(&PlayerId(id)).await?;
    Ok(Json(pending))
}

/// GET /players/:id/evaluations/completed
pub async fn completed_evaluations(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<CompletedEvaluation>>, AppError> {
    let completed = state
        .evaluation_service
        .completed_for(&PlayerId(id))
        .await?;
    Ok(Json(completed))
}
