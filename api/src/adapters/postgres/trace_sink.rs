//! PostgreSQL adapter for TraceSink

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};
use uuid::Uuid;

use crate::domain::entities::PlayerId;
use crate::domain::ports::{RatingSnapshot, RatingStats, TraceContext, TraceSink};
use crate::entity::rating_traces;
use crate::error::DomainError;

/// PostgreSQL implementation of TraceSink
pub struct PostgresTraceSink {
    db: DatabaseConnection,
}

impl PostgresTraceSink {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TraceSink for PostgresTraceSink {
    async fn log_trace(
        &self,
        player_id: &PlayerId,
        before: &RatingSnapshot,
        after: &RatingSnapshot,
        stats: &RatingStats,
        context: &TraceContext,
    ) -> Result<(), DomainError> {
        let model = rating_traces::ActiveModel {
            id: Set(Uuid::new_v4()),
            player_id: Set(player_id.0.clone()),
            match_id: Set(context.match_id.0.clone()),
            match_name: Set(context.match_name.clone()),
            before: Set(to_json(before)?),
            after: Set(to_json(after)?),
            stats: Set(to_json(stats)?),
            participation_rate: Set(context.participation_rate),
            evaluator_count: Set(context.evaluator_count as i32),
            created_at: Set(Utc::now().fixed_offset()),
        };

        model
            .insert(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(())
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<serde_json::Value, DomainError> {
    serde_json::to_value(value).map_err(|e| DomainError::Database(e.to_string()))
}
