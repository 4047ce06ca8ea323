//! HTTP handlers
//!
//! Axum request handlers for the API endpoints.

pub mod evaluations;
pub mod players;

pub use evaluations::{cleanup, get_record, initialize, submit};
pub use players::{completed_evaluations, get_profile, pending_evaluations};
