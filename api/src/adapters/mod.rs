//! Adapters layer
//!
//! Implementations of port traits for external systems.

pub mod postgres;
pub mod webhook;

pub use postgres::{PostgresEvaluationRepository, PostgresPlayerDirectory, PostgresTraceSink};
pub use webhook::WebhookNotifier;
