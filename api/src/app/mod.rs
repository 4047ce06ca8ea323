//! Application layer
//!
//! Contains use cases and service orchestration.
//! Services coordinate between domain entities, ports, and external systems.

pub mod aggregation;
pub mod assignment;
pub mod evaluation_config;
pub mod evaluation_service;
pub mod redistribution;

pub use evaluation_service::{
    CompletedEvaluation, EvaluationService, PendingEvaluation, SubmissionOutcome,
};
// Re-export tuning constants for public API (used by consumers)
#[allow(unused_imports)]
pub use evaluation_config::*;
#[allow(unused_imports)]
pub use aggregation::{aggregate_ratings, rating_delta, round_half_up, PlayerAggregate};
#[allow(unused_imports)]
pub use assignment::{eligible_players, generate_assignments, has_enough_players};
#[allow(unused_imports)]
pub use redistribution::{apply_attribute_deltas, attribute_deltas, clamp_ovr, intensity};
