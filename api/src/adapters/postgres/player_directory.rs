//! PostgreSQL adapter for PlayerDirectory
//!
//! Profiles are split across the `players` table (authenticated users) and
//! the group-scoped `group_players` roster. Batch commits run inside one
//! transaction so a trigger's updates land together or not at all.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ConnectionTrait, DatabaseConnection, EntityTrait, Set, TransactionTrait,
};

use crate::domain::entities::{
    AttributeSet, PlayerId, PlayerProfile, Position, ProfileUpdate, RatingChange,
};
use crate::domain::ports::PlayerDirectory;
use crate::entity::{group_players, players};
use crate::error::DomainError;

/// PostgreSQL implementation of PlayerDirectory
pub struct PostgresPlayerDirectory {
    db: DatabaseConnection,
    group_id: String,
}

impl PostgresPlayerDirectory {
    pub fn new(db: DatabaseConnection, group_id: String) -> Self {
        Self { db, group_id }
    }
}

#[async_trait]
impl PlayerDirectory for PostgresPlayerDirectory {
    async fn find_authenticated(
        &self,
        id: &PlayerId,
    ) -> Result<Option<PlayerProfile>, DomainError> {
        let result = players::Entity::find_by_id(id.0.clone())
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        result.map(PlayerProfile::try_from).transpose()
    }

    async fn find_in_group(&self, id: &PlayerId) -> Result<Option<PlayerProfile>, DomainError> {
        let result = group_players::Entity::find_by_id((self.group_id.clone(), id.0.clone()))
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        result.map(PlayerProfile::try_from).transpose()
    }

    async fn commit_all(&self, updates: &[ProfileUpdate]) -> Result<(), DomainError> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        for update in updates {
            apply_update(&txn, &self.group_id, update).await?;
        }

        txn.commit()
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(())
    }
}

async fn apply_update<C: ConnectionTrait>(
    conn: &C,
    group_id: &str,
    update: &ProfileUpdate,
) -> Result<(), DomainError> {
    // Same resolution order as lookups: authenticated users first
    let authenticated = players::Entity::find_by_id(update.player_id.0.clone())
        .one(conn)
        .await
        .map_err(|e| DomainError::Database(e.to_string()))?;

    if let Some(model) = authenticated {
        let history = appended_history(model.history.clone(), &update.change)?;
        players::ActiveModel {
            id: Set(model.id),
            ovr: Set(update.new_ovr),
            attributes: Set(to_json(&update.new_attributes)?),
            history: Set(history),
            ..Default::default()
        }
        .update(conn)
        .await
        .map_err(|e| DomainError::Database(e.to_string()))?;
        return Ok(());
    }

    let group_member =
        group_players::Entity::find_by_id((group_id.to_string(), update.player_id.0.clone()))
            .one(conn)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

    let Some(model) = group_member else {
        return Err(DomainError::NotFound(format!(
            "Profile {} vanished during commit",
            update.player_id
        )));
    };

    let history = appended_history(model.history.clone(), &update.change)?;
    group_players::ActiveModel {
        group_id: Set(model.group_id),
        player_id: Set(model.player_id),
        ovr: Set(update.new_ovr),
        attributes: Set(to_json(&update.new_attributes)?),
        history: Set(history),
        ..Default::default()
    }
    .update(conn)
    .await
    .map_err(|e| DomainError::Database(e.to_string()))?;

    Ok(())
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<serde_json::Value, DomainError> {
    serde_json::to_value(value).map_err(|e| DomainError::Database(e.to_string()))
}

fn appended_history(
    stored: serde_json::Value,
    change: &RatingChange,
) -> Result<serde_json::Value, DomainError> {
    let mut history: Vec<RatingChange> = if stored.is_null() {
        vec![]
    } else {
        serde_json::from_value(stored).map_err(|e| DomainError::Database(e.to_string()))?
    };
    history.push(change.clone());
    to_json(&history)
}

fn profile_from_parts(
    id: String,
    name: String,
    position: String,
    ovr: i32,
    attributes: serde_json::Value,
    history: serde_json::Value,
) -> Result<PlayerProfile, DomainError> {
    let attributes: AttributeSet = if attributes.is_null() {
        AttributeSet::flat(ovr)
    } else {
        serde_json::from_value(attributes).map_err(|e| DomainError::Database(e.to_string()))?
    };
    let history: Vec<RatingChange> = if history.is_null() {
        vec![]
    } else {
        serde_json::from_value(history).map_err(|e| DomainError::Database(e.to_string()))?
    };

    Ok(PlayerProfile {
        id: PlayerId(id),
        name,
        position: Position::parse(&position),
        ovr,
        attributes,
        history,
    })
}

impl TryFrom<players::Model> for PlayerProfile {
    type Error = DomainError;

    fn try_from(model: players::Model) -> Result<Self, Self::Error> {
        profile_from_parts(
            model.id,
            model.name,
            model.position,
            model.ovr,
            model.attributes,
            model.history,
        )
    }
}

impl TryFrom<group_players::Model> for PlayerProfile {
    type Error = DomainError;

    fn try_from(model: group_players::Model) -> Result<Self, Self::Error> {
        profile_from_parts(
            model.player_id,
            model.name,
            model.position,
            model.ovr,
            model.attributes,
            model.history,
        )
    }
}
