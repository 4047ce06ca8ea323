//! Repository port traits
//!
//! These traits define the interface for evaluation record persistence.
//! Implementations are provided by adapters (e.g., PostgreSQL).

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::entities::{EvaluationRecord, EvaluationStatus, MatchId};
use crate::error::DomainError;

/// Repository for per-match evaluation records
#[async_trait]
pub trait EvaluationRepository: Send + Sync {
    /// Create a record keyed by its match id
    async fn create(&self, record: &EvaluationRecord) -> Result<(), DomainError>;

    /// Find the record for a match
    async fn find_by_match(&self, match_id: &MatchId) -> Result<Option<EvaluationRecord>, DomainError>;

    /// Persist the full record state
    async fn save(&self, record: &EvaluationRecord) -> Result<(), DomainError>;

    /// Pending records whose deadline has passed at `now`
    async fn find_pending_expired(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<EvaluationRecord>, DomainError>;

    /// All records in a given status
    async fn find_by_status(
        &self,
        status: EvaluationStatus,
    ) -> Result<Vec<EvaluationRecord>, DomainError>;

    /// Most recent records by match date, newest first
    async fn find_recent(&self, limit: usize) -> Result<Vec<EvaluationRecord>, DomainError>;
}
