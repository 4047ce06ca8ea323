//! Domain entities
//!
//! Pure domain models representing core business concepts.
//! These are separate from the SeaORM entities in the `entity` module.

pub mod evaluation;
pub mod fixture;
pub mod player;

pub use evaluation::{
    Assignment, EvaluationRecord, EvaluationStatus, EvaluationTarget, RatingSubmission,
    TeamSummary,
};
pub use fixture::{Fixture, MatchId, MatchKind, Participant, PlayerId, Position, TeamSheet, TeamSide};
pub use player::{AttributeSet, PlayerProfile, ProfileUpdate, RatingChange};
