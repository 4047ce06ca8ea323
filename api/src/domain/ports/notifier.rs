//! Notification sink port
//!
//! Outbound notifications to evaluators plus group-wide activity events.
//! Delivery is best-effort everywhere in the service layer; callers log
//! failures and keep going.

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::entities::{MatchId, PlayerId};
use crate::error::NotifyError;

/// Kinds of notification this system emits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    EvaluationPending,
    RatingsUpdated,
}

/// A notification addressed to one player
#[derive(Debug, Clone, Serialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub recipient: PlayerId,
    pub match_id: MatchId,
    pub title: String,
    pub body: String,
}

/// Port for outbound notification delivery
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Deliver one player-addressed notification
    async fn notify(&self, notification: &Notification) -> Result<(), NotifyError>;

    /// Post a group-wide activity event
    async fn broadcast_activity(&self, kind: &str, message: &str) -> Result<(), NotifyError>;
}
