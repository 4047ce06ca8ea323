//! Mock implementations of port traits
//!
//! These are in-memory implementations that can be configured for testing.
//! They store data in memory and allow tests to verify behavior.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::domain::entities::{
    EvaluationRecord, EvaluationStatus, MatchId, PlayerId, PlayerProfile, ProfileUpdate,
};
use crate::domain::ports::{
    EvaluationRepository, Notification, NotificationSink, PlayerDirectory, RatingSnapshot,
    RatingStats, TraceContext, TraceSink,
};
use crate::error::{DomainError, NotifyError};

// ============================================================================
// In-Memory Evaluation Repository
// ============================================================================

#[derive(Default)]
pub struct InMemoryEvaluationRepository {
    records: Arc<RwLock<HashMap<MatchId, EvaluationRecord>>>,
}

impl InMemoryEvaluationRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate with a record for testing
    pub fn with_record(self, record: EvaluationRecord) -> Self {
        {
            let mut records = self.records.write().unwrap();
            records.insert(record.match_id.clone(), record);
        }
        self
    }

    /// Direct read access for assertions
    pub fn get(&self, match_id: &MatchId) -> Option<EvaluationRecord> {
        self.records.read().unwrap().get(match_id).cloned()
    }
}

#[async_trait]
impl EvaluationRepository for InMemoryEvaluationRepository {
    async fn create(&self, record: &EvaluationRecord) -> Result<(), DomainError> {
        let mut records = self.records.write().unwrap();
        if records.contains_key(&record.match_id) {
            return Err(DomainError::AlreadyExists(format!(
                "Record for match {}",
                record.match_id
            )));
        }
        records.insert(record.match_id.clone(), record.clone());
        Ok(())
    }

    async fn find_by_match(
        &self,
        match_id: &MatchId,
    ) -> Result<Option<EvaluationRecord>, DomainError> {
        Ok(self.records.read().unwrap().get(match_id).cloned())
    }

    async fn save(&self, record: &EvaluationRecord) -> Result<(), DomainError> {
        let mut records = self.records.write().unwrap();
        records.insert(record.match_id.clone(), record.clone());
        Ok(())
    }

    async fn find_pending_expired(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<EvaluationRecord>, DomainError> {
        Ok(self
            .records
            .read()
            .unwrap()
            .values()
            .filter(|r| r.is_expired_at(now))
            .cloned()
            .collect())
    }

    async fn find_by_status(
        &self,
        status: EvaluationStatus,
    ) -> Result<Vec<EvaluationRecord>, DomainError> {
        Ok(self
            .records
            .read()
            .unwrap()
            .values()
            .filter(|r| r.status == status)
            .cloned()
            .collect())
    }

    async fn find_recent(&self, limit: usize) -> Result<Vec<EvaluationRecord>, DomainError> {
        let mut records: Vec<EvaluationRecord> =
            self.records.read().unwrap().values().cloned().collect();
        records.sort_by(|a, b| b.match_date.cmp(&a.match_date));
        records.truncate(limit);
        Ok(records)
    }
}

// ============================================================================
// In-Memory Player Directory
// ============================================================================

#[derive(Default)]
pub struct InMemoryPlayerDirectory {
    authenticated: Arc<RwLock<HashMap<PlayerId, PlayerProfile>>>,
    group: Arc<RwLock<HashMap<PlayerId, PlayerProfile>>>,
    fail_commits: Arc<RwLock<bool>>,
    commits: Arc<RwLock<usize>>,
}

impl InMemoryPlayerDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate the authenticated user collection
    pub fn with_authenticated(self, profile: PlayerProfile) -> Self {
        {
            let mut authenticated = self.authenticated.write().unwrap();
            authenticated.insert(profile.id.clone(), profile);
        }
        self
    }

    /// Pre-populate the group roster
    pub fn with_group_member(self, profile: PlayerProfile) -> Self {
        {
            let mut group = self.group.write().unwrap();
            group.insert(profile.id.clone(), profile);
        }
        self
    }

    /// Make subsequent `commit_all` calls fail
    pub fn fail_commits(&self, fail: bool) {
        *self.fail_commits.write().unwrap() = fail;
    }

    /// Number of successful batch commits
    pub fn commit_count(&self) -> usize {
        *self.commits.read().unwrap()
    }

    pub fn authenticated_profile(&self, id: &PlayerId) -> Option<PlayerProfile> {
        self.authenticated.read().unwrap().get(id).cloned()
    }

    pub fn group_profile(&self, id: &PlayerId) -> Option<PlayerProfile> {
        self.group.read().unwrap().get(id).cloned()
    }
}

#[async_trait]
impl PlayerDirectory for InMemoryPlayerDirectory {
    async fn find_authenticated(
        &self,
        id: &PlayerId,
    ) -> Result<Option<PlayerProfile>, DomainError> {
        Ok(self.authenticated.read().unwrap().get(id).cloned())
    }

    async fn find_in_group(&self, id: &PlayerId) -> Result<Option<PlayerProfile>, DomainError> {
        Ok(self.group.read().unwrap().get(id).cloned())
    }

    async fn commit_all(&self, updates: &[ProfileUpdate]) -> Result<(), DomainError> {
        if *self.fail_commits.read().unwrap() {
            return Err(DomainError::Database("simulated commit failure".to_string()));
        }

        let mut authenticated = self.authenticated.write().unwrap();
        let mut group = self.group.write().unwrap();

        for update in updates {
            // Same resolution order as lookups: authenticated first
            let profile = authenticated
                .get_mut(&update.player_id)
                .or_else(|| group.get_mut(&update.player_id))
                .ok_or_else(|| {
                    DomainError::NotFound(format!("Profile {}", update.player_id))
                })?;
            profile.ovr = update.new_ovr;
            profile.attributes = update.new_attributes;
            profile.history.push(update.change.clone());
        }

        *self.commits.write().unwrap() += 1;
        Ok(())
    }
}

// ============================================================================
// Recording Notification Sink
// ============================================================================

#[derive(Default)]
pub struct RecordingNotifier {
    notifications: Arc<RwLock<Vec<Notification>>>,
    activity: Arc<RwLock<Vec<(String, String)>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.notifications.read().unwrap().clone()
    }

    pub fn activity(&self) -> Vec<(String, String)> {
        self.activity.read().unwrap().clone()
    }
}

#[async_trait]
impl NotificationSink for RecordingNotifier {
    async fn notify(&self, notification: &Notification) -> Result<(), NotifyError> {
        self.notifications
            .write()
            .unwrap()
            .push(notification.clone());
        Ok(())
    }

    async fn broadcast_activity(&self, kind: &str, message: &str) -> Result<(), NotifyError> {
        self.activity
            .write()
            .unwrap()
            .push((kind.to_string(), message.to_string()));
        Ok(())
    }
}

// ============================================================================
// Recording Trace Sink
// ============================================================================

/// One captured trace call
#[derive(Debug, Clone)]
pub struct RecordedTrace {
    pub player_id: PlayerId,
    pub before: RatingSnapshot,
    pub after: RatingSnapshot,
    pub stats: RatingStats,
    pub context: TraceContext,
}

#[derive(Default)]
pub struct RecordingTraceSink {
    traces: Arc<RwLock<Vec<RecordedTrace>>>,
    fail: Arc<RwLock<bool>>,
}

impl RecordingTraceSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent `log_trace` calls fail
    pub fn fail(&self, fail: bool) {
        *self.fail.write().unwrap() = fail;
    }

    pub fn traces(&self) -> Vec<RecordedTrace> {
        self.traces.read().unwrap().clone()
    }
}

#[async_trait]
impl TraceSink for RecordingTraceSink {
    async fn log_trace(
        &self,
        player_id: &PlayerId,
        before: &RatingSnapshot,
        after: &RatingSnapshot,
        stats: &RatingStats,
        context: &TraceContext,
    ) -> Result<(), DomainError> {
        if *self.fail.read().unwrap() {
            return Err(DomainError::Database("simulated trace failure".to_string()));
        }
        self.traces.write().unwrap().push(RecordedTrace {
            player_id: player_id.clone(),
            before: before.clone(),
            after: after.clone(),
            stats: stats.clone(),
            context: context.clone(),
        });
        Ok(())
    }
}
