//! SeaORM table models
//!
//! Database-facing models, kept separate from the domain entities in
//! `domain::entities`. Adapters convert between the two.

pub mod evaluations;
pub mod group_players;
pub mod players;
pub mod rating_traces;
