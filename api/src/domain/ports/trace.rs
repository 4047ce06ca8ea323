//! Rating trace port
//!
//! Defines the interface for the audit trail written alongside each rating
//! commit. Traces are diagnostics; a failed trace never rolls back a commit.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::entities::{AttributeSet, MatchId, PlayerId};
use crate::error::DomainError;

/// A player's rating state on one side of a commit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatingSnapshot {
    pub ovr: i32,
    pub attributes: AttributeSet,
}

/// Aggregated inputs that produced the change
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatingStats {
    pub average_rating: f64,
    pub total_goals: i32,
    pub unique_tags: Vec<String>,
}

/// Context shared by every trace of one commit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceContext {
    pub match_id: MatchId,
    pub match_name: String,
    pub participation_rate: f64,
    pub evaluator_count: usize,
}

/// Port for persisting rating-change audit records
#[async_trait]
pub trait TraceSink: Send + Sync {
    async fn log_trace(
        &self,
        player_id: &PlayerId,
        before: &RatingSnapshot,
        after: &RatingSnapshot,
        stats: &RatingStats,
        context: &TraceContext,
    ) -> Result<(), DomainError>;
}
