//! PostgreSQL adapter for EvaluationRepository

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

use crate::domain::entities::{
    Assignment, EvaluationRecord, EvaluationStatus, MatchId, MatchKind, PlayerId, TeamSummary,
};
use crate::domain::ports::EvaluationRepository;
use crate::entity::evaluations;
use crate::error::DomainError;

/// PostgreSQL implementation of EvaluationRepository
pub struct PostgresEvaluationRepository {
    db: DatabaseConnection,
}

impl PostgresEvaluationRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl EvaluationRepository for PostgresEvaluationRepository {
    async fn create(&self, record: &EvaluationRecord) -> Result<(), DomainError> {
        active_model(record)?
            .insert(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;
        Ok(())
    }

    async fn find_by_match(
        &self,
        match_id: &MatchId,
    ) -> Result<Option<EvaluationRecord>, DomainError> {
        let result = evaluations::Entity::find_by_id(match_id.0.clone())
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        result.map(EvaluationRecord::try_from).transpose()
    }

    async fn save(&self, record: &EvaluationRecord) -> Result<(), DomainError> {
        active_model(record)?
            .update(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;
        Ok(())
    }

    async fn find_pending_expired(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<EvaluationRecord>, DomainError> {
        let results = evaluations::Entity::find()
            .filter(evaluations::Column::Status.eq(EvaluationStatus::Pending.to_string()))
            .filter(evaluations::Column::Deadline.lt(now.fixed_offset()))
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        results.into_iter().map(EvaluationRecord::try_from).collect()
    }

    async fn find_by_status(
        &self,
        status: EvaluationStatus,
    ) -> Result<Vec<EvaluationRecord>, DomainError> {
        let results = evaluations::Entity::find()
            .filter(evaluations::Column::Status.eq(status.to_string()))
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        results.into_iter().map(EvaluationRecord::try_from).collect()
    }

    async fn find_recent(&self, limit: usize) -> Result<Vec<EvaluationRecord>, DomainError> {
        let results = evaluations::Entity::find()
            .order_by_desc(evaluations::Column::MatchDate)
            .limit(limit as u64)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        results.into_iter().map(EvaluationRecord::try_from).collect()
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<serde_json::Value, DomainError> {
    serde_json::to_value(value).map_err(|e| DomainError::Database(e.to_string()))
}

fn from_json<T: serde::de::DeserializeOwned>(value: serde_json::Value) -> Result<T, DomainError> {
    serde_json::from_value(value).map_err(|e| DomainError::Database(e.to_string()))
}

fn active_model(record: &EvaluationRecord) -> Result<evaluations::ActiveModel, DomainError> {
    Ok(evaluations::ActiveModel {
        match_id: Set(record.match_id.0.clone()),
        match_kind: Set(record.match_kind.to_string()),
        match_name: Set(record.match_name.clone()),
        match_date: Set(record.match_date.fixed_offset()),
        created_at: Set(record.created_at.fixed_offset()),
        deadline: Set(record.deadline.fixed_offset()),
        assignments: Set(to_json(&record.assignments)?),
        completed: Set(to_json(&record.completed)?),
        participation_rate: Set(record.participation_rate),
        update_triggered: Set(record.update_triggered),
        status: Set(record.status.to_string()),
        team_a: Set(to_json(&record.team_a)?),
        team_b: Set(to_json(&record.team_b)?),
        ratings_updated_at: Set(record.ratings_updated_at.map(|dt| dt.fixed_offset())),
        expired_at: Set(record.expired_at.map(|dt| dt.fixed_offset())),
    })
}

/// Convert SeaORM model to domain entity
impl TryFrom<evaluations::Model> for EvaluationRecord {
    type Error = DomainError;

    fn try_from(model: evaluations::Model) -> Result<Self, Self::Error> {
        let match_kind = match model.match_kind.as_str() {
            "collaborative" => MatchKind::Collaborative,
            _ => MatchKind::Manual,
        };
        let status = model
            .status
            .parse()
            .map_err(|e: String| DomainError::Database(e))?;
        let assignments: HashMap<PlayerId, Assignment> = from_json(model.assignments)?;
        let completed: HashMap<PlayerId, bool> = from_json(model.completed)?;
        let team_a: TeamSummary = from_json(model.team_a)?;
        let team_b: TeamSummary = from_json(model.team_b)?;

        Ok(EvaluationRecord {
            match_id: MatchId(model.match_id),
            match_kind,
            match_name: model.match_name,
            match_date: model.match_date.with_timezone(&Utc),
            created_at: model.created_at.with_timezone(&Utc),
            deadline: model.deadline.with_timezone(&Utc),
            assignments,
            completed,
            participation_rate: model.participation_rate,
            update_triggered: model.update_triggered,
            status,
            team_a,
            team_b,
            ratings_updated_at: model.ratings_updated_at.map(|dt| dt.with_timezone(&Utc)),
            expired_at: model.expired_at.map(|dt| dt.with_timezone(&Utc)),
        })
    }
}
