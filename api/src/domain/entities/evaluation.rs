//! Evaluation record aggregate
//!
//! One record per finalized match, keyed by match id. It holds the generated
//! assignments, the submitted ratings, and the lifecycle state that decides
//! when the rating update fires.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::fixture::{MatchId, MatchKind, PlayerId, Position};

/// Lifecycle of an evaluation record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EvaluationStatus {
    Pending,
    Completed,
    Expired,
}

impl std::fmt::Display for EvaluationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EvaluationStatus::Pending => write!(f, "pending"),
            EvaluationStatus::Completed => write!(f, "completed"),
            EvaluationStatus::Expired => write!(f, "expired"),
        }
    }
}

impl std::str::FromStr for EvaluationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(EvaluationStatus::Pending),
            "completed" => Ok(EvaluationStatus::Completed),
            "expired" => Ok(EvaluationStatus::Expired),
            _ => Err(format!("Unknown evaluation status: {}", s)),
        }
    }
}

/// A teammate the evaluator must rate, snapshotted at assignment time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationTarget {
    pub id: PlayerId,
    pub name: String,
    pub position: Position,
    pub ovr: i32,
}

/// One submitted rating for one target
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatingSubmission {
    /// 1.0 to 10.0
    pub rating: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goals: Option<i32>,
}

/// One evaluator's assignment: the two teammates they must rate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assignment {
    pub evaluator_name: String,
    pub targets: Vec<EvaluationTarget>,
    pub completed: bool,
    #[serde(default)]
    pub ratings: HashMap<PlayerId, RatingSubmission>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

/// Team sheet summary stored on the record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamSummary {
    pub name: String,
    pub players: Vec<EvaluationTarget>,
}

/// The per-match evaluation document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationRecord {
    pub match_id: MatchId,
    pub match_kind: MatchKind,
    pub match_name: String,
    pub match_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    /// Submissions past this instant are rejected by cleanup expiring the record
    pub deadline: DateTime<Utc>,
    pub assignments: HashMap<PlayerId, Assignment>,
    /// Mirror of per-assignment completion, kept for cheap participation math
    pub completed: HashMap<PlayerId, bool>,
    pub participation_rate: f64,
    /// Set only after the profile batch has been committed
    pub update_triggered: bool,
    pub status: EvaluationStatus,
    pub team_a: TeamSummary,
    pub team_b: TeamSummary,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ratings_updated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expired_at: Option<DateTime<Utc>>,
}

impl EvaluationRecord {
    /// Recompute `participation_rate` from the completion map. A record with
    /// no assignments stays at 0.0.
    pub fn recompute_participation(&mut self) {
        let total = self.assignments.len();
        if total == 0 {
            self.participation_rate = 0.0;
            return;
        }
        let done = self.completed.values().filter(|c| **c).count();
        self.participation_rate = done as f64 / total as f64;
    }

    /// Whether the record is pending and past its deadline at `now`
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.status == EvaluationStatus::Pending && now > self.deadline
    }
}
