//! Evaluation handlers
//!
//! Endpoints for initializing evaluations after a match, submitting ratings,
//! and the expiry sweep.

use std::collections::HashMap;

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entities::{
    EvaluationRecord, Fixture, MatchId, MatchKind, Participant, PlayerId, Position,
    RatingSubmission, TeamSheet,
};
use crate::domain::ports::repositories::EvaluationRepository;
use crate::error::AppError;
use crate::AppState;

/// A roster entry as the client sends it. Positions arrive as free text.
#[derive(Debug, Deserialize)]
pub struct ParticipantRequest {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub position: String,
    #[serde(default)]
    pub ovr: i32,
    #[serde(default)]
    pub guest: bool,
}

#[derive(Debug, Deserialize)]
pub struct TeamRequest {
    pub name: String,
    pub players: Vec<ParticipantRequest>,
}

/// Request body for evaluation initialization
#[derive(Debug, Deserialize)]
pub struct InitializeRequest {
    pub match_id: String,
    #[serde(default)]
    pub kind: Option<String>,
    pub name: String,
    pub date: DateTime<Utc>,
    pub team_a: TeamRequest,
    pub team_b: TeamRequest,
}

/// Response body for evaluation initialization
#[derive(Debug, Serialize)]
pub struct InitializeResponse {
    pub created: bool,
    pub evaluators: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline: Option<DateTime<Utc>>,
}

/// One rating in a submission
#[derive(Debug, Deserialize)]
pub struct RatingRequest {
    pub rating: f64,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub goals: Option<i32>,
}

/// Request body for rating submission
#[derive(Debug, Deserialize)]
pub struct SubmitRequest {
    pub evaluator_id: String,
    pub ratings: HashMap<String, RatingRequest>,
}

/// Response body for rating submission
#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub participation_rate: f64,
    pub ratings_updated: bool,
}

/// Response body for the expiry sweep
#[derive(Debug, Serialize)]
pub struct CleanupResponse {
    pub expired: usize,
}

fn team_from(request: TeamRequest) -> TeamSheet {
    TeamSheet {
        name: request.name,
        players: request
            .players
            .into_iter()
            .map(|p| Participant {
                id: PlayerId(p.id),
                name: p.name,
                position: Position::parse(&p.position),
                ovr: p.ovr,
                guest: p.guest,
            })
            .collect(),
    }
}

impl From<InitializeRequest> for Fixture {
    fn from(request: InitializeRequest) -> Self {
        let kind = match request.kind.as_deref() {
            Some("collaborative") => MatchKind::Collaborative,
            _ => MatchKind::Manual,
        };
        Fixture {
            id: MatchId(request.match_id),
            kind,
            name: request.name,
            date: request.date,
            team_a: team_from(request.team_a),
            team_b: team_from(request.team_b),
        }
    }
}

/// POST /evaluations
///
/// Initialize evaluations for a finalized match. Returns `created: false`
/// when the roster is too small for peer evaluation.
pub async fn initialize(
    State(state): State<AppState>,
    Json(request): Json<InitializeRequest>,
) -> Result<Json<InitializeResponse>, AppError> {
    let fixture: Fixture = request.into();
    let record = state.evaluation_service.initialize(&fixture).await?;

    Ok(Json(match record {
        Some(record) => InitializeResponse {
            created: true,
            evaluators: record.assignments.len(),
            deadline: Some(record.deadline),
        },
        None => InitializeResponse {
            created: false,
            evaluators: 0,
            deadline: None,
        },
    }))
}

/// GET /evaluations/:match_id
pub async fn get_record(
    State(state): State<AppState>,
    Path(match_id): Path<String>,
) -> Result<Json<EvaluationRecord>, AppError> {
    let record = state
        .evaluations
        .find_by_match(&MatchId(match_id.clone()))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No evaluations for match {}", match_id)))?;

    Ok(Json(record))
}

/// POST /evaluations/:match_id/submit
pub async fn submit(
    State(state): State<AppState>,
    Path(match_id): Path<String>,
    Json(request): Json<SubmitRequest>,
) -> Result<Json<SubmitResponse>, AppError> {
    let ratings = request
        .ratings
        .into_iter()
        .map(|(id, r)| {
            (
                PlayerId(id),
                RatingSubmission {
                    rating: r.rating,
                    notes: r.notes,
                    tags: r.tags,
                    goals: r.goals,
                },
            )
        })
        .collect();

    let outcome = state
        .evaluation_service
        .submit_evaluation(
            &MatchId(match_id),
            &PlayerId(request.evaluator_id),
            ratings,
        )
        .await?;

    Ok(Json(SubmitResponse {
        participation_rate: outcome.participation_rate,
        ratings_updated: outcome.ratings_updated,
    }))
}

/// POST /evaluations/cleanup
///
/// Expire pending records past their deadline. Invoked by an external
/// scheduler.
pub async fn cleanup(State(state): State<AppState>) -> Result<Json<CleanupResponse>, AppError> {
    let expired = state.evaluation_service.cleanup_expired(Utc::now()).await?;
    Ok(Json(CleanupResponse { expired }))
}
