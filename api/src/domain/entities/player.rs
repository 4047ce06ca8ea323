//! Player profile domain entity
//!
//! The rating sheet a committed evaluation mutates: overall rating, the six
//! sub-attributes, and the per-match change history.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::fixture::{MatchId, PlayerId, Position};

/// The six rateable attributes (FIFA-card style)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeSet {
    pub pac: i32,
    pub sho: i32,
    pub pas: i32,
    pub dri: i32,
    pub def: i32,
    pub phy: i32,
}

impl AttributeSet {
    /// Uniform attribute sheet (used when a profile has no stored attributes)
    pub fn flat(value: i32) -> Self {
        Self {
            pac: value,
            sho: value,
            pas: value,
            dri: value,
            def: value,
            phy: value,
        }
    }
}

/// One applied rating adjustment, appended to the profile history
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatingChange {
    pub date: DateTime<Utc>,
    pub match_id: MatchId,
    pub old_ovr: i32,
    pub new_ovr: i32,
    pub delta: i32,
    /// Per-attribute deltas actually applied, keyed by attribute name
    pub attribute_deltas: HashMap<String, i32>,
}

/// A player's rating profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerProfile {
    pub id: PlayerId,
    pub name: String,
    pub position: Position,
    pub ovr: i32,
    pub attributes: AttributeSet,
    #[serde(default)]
    pub history: Vec<RatingChange>,
}

/// One player's pending profile mutation, committed in a single batch
#[derive(Debug, Clone)]
pub struct ProfileUpdate {
    pub player_id: PlayerId,
    pub new_ovr: i32,
    pub new_attributes: AttributeSet,
    pub change: RatingChange,
}
