//! Evaluation service
//!
//! Drives the full peer-evaluation lifecycle: record initialization after a
//! match, rating submissions, the threshold-triggered profile update, and the
//! expiry sweep. All rating changes flow through this service so the commit
//! ordering and audit trail stay consistent.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::app::aggregation::{aggregate_ratings, rating_delta};
use crate::app::assignment::{generate_assignments, has_enough_players};
use crate::app::evaluation_config::{
    COMPLETED_HISTORY_LIMIT, EVALUATION_WINDOW_HOURS, PARTICIPATION_THRESHOLD,
};
use crate::app::redistribution::{
    apply_attribute_deltas, attribute_deltas, clamp_ovr, intensity,
};
use crate::domain::entities::{
    EvaluationRecord, EvaluationStatus, EvaluationTarget, Fixture, MatchId, PlayerId,
    ProfileUpdate, RatingChange, RatingSubmission, TeamSummary,
};
use crate::domain::ports::{
    resolve_profile, EvaluationRepository, Notification, NotificationKind, NotificationSink,
    PlayerDirectory, RatingSnapshot, RatingStats, TraceContext, TraceSink,
};
use crate::error::DomainError;

/// What a submission did to the record
#[derive(Debug, Clone)]
pub struct SubmissionOutcome {
    pub participation_rate: f64,
    pub ratings_updated: bool,
}

/// One open assignment, as returned by the pending query
#[derive(Debug, Clone, serde::Serialize)]
pub struct PendingEvaluation {
    pub match_id: MatchId,
    pub match_name: String,
    pub match_date: DateTime<Utc>,
    pub deadline: DateTime<Utc>,
    pub targets: Vec<EvaluationTarget>,
    pub participation_rate: f64,
}

/// One finished assignment, as returned by the history query
#[derive(Debug, Clone, serde::Serialize)]
pub struct CompletedEvaluation {
    pub match_id: MatchId,
    pub match_name: String,
    pub match_date: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub ratings: HashMap<PlayerId, RatingSubmission>,
    pub ratings_updated: bool,
}

/// Service orchestrating peer evaluations and rating updates
pub struct EvaluationService<ER, PD, NS, TS>
where
    ER: EvaluationRepository,
    PD: PlayerDirectory,
    NS: NotificationSink,
    TS: TraceSink,
{
    evaluations: Arc<ER>,
    directory: Arc<PD>,
    notifier: Arc<NS>,
    traces: Arc<TS>,
}

impl<ER, PD, NS, TS> EvaluationService<ER, PD, NS, TS>
where
    ER: EvaluationRepository,
    PD: PlayerDirectory,
    NS: NotificationSink,
    TS: TraceSink,
{
    pub fn new(evaluations: Arc<ER>, directory: Arc<PD>, notifier: Arc<NS>, traces: Arc<TS>) -> Self {
        Self {
            evaluations,
            directory,
            notifier,
            traces,
        }
    }

    /// Initialize evaluations for a finalized fixture using an entropy-seeded
    /// RNG. Returns `None` when the roster is too small to evaluate.
    pub async fn initialize(
        &self,
        fixture: &Fixture,
    ) -> Result<Option<EvaluationRecord>, DomainError> {
        let mut rng = StdRng::from_entropy();
        self.initialize_with_rng(fixture, &mut rng).await
    }

    /// Initialize evaluations with a caller-provided RNG.
    pub async fn initialize_with_rng<R: Rng + ?Sized>(
        &self,
        fixture: &Fixture,
        rng: &mut R,
    ) -> Result<Option<EvaluationRecord>, DomainError> {
        if self.evaluations.find_by_match(&fixture.id).await?.is_some() {
            return Err(DomainError::AlreadyExists(format!(
                "Evaluations already initialized for match {}",
                fixture.id
            )));
        }

        if !has_enough_players(fixture) {
            tracing::info!(
                match_id = %fixture.id,
                "Not enough eligible players, skipping evaluations"
            );
            return Ok(None);
        }

        let assignments = generate_assignments(fixture, rng);
        let completed = assignments.keys().map(|id| (id.clone(), false)).collect();
        let now = Utc::now();

        let record = EvaluationRecord {
            match_id: fixture.id.clone(),
            match_kind: fixture.kind,
            match_name: fixture.name.clone(),
            match_date: fixture.date,
            created_at: now,
            deadline: now + Duration::hours(EVALUATION_WINDOW_HOURS),
            assignments,
            completed,
            participation_rate: 0.0,
            update_triggered: false,
            status: EvaluationStatus::Pending,
            team_a: team_summary(&fixture.team_a),
            team_b: team_summary(&fixture.team_b),
            ratings_updated_at: None,
            expired_at: None,
        };

        self.evaluations.create(&record).await?;

        tracing::info!(
            match_id = %record.match_id,
            evaluators = record.assignments.len(),
            "Evaluations initialized"
        );

        self.send_pending_notifications(&record).await;

        Ok(Some(record))
    }

    /// Record one evaluator's ratings and, if participation crosses the
    /// threshold, run the profile update.
    pub async fn submit_evaluation(
        &self,
        match_id: &MatchId,
        evaluator_id: &PlayerId,
        ratings: HashMap<PlayerId, RatingSubmission>,
    ) -> Result<SubmissionOutcome, DomainError> {
        let mut record = self
            .evaluations
            .find_by_match(match_id)
            .await?
            .ok_or_else(|| {
                DomainError::NotFound(format!("No evaluations for match {}", match_id))
            })?;

        // Stragglers may still submit after the update fired; only expiry
        // closes the window.
        if record.status == EvaluationStatus::Expired {
            return Err(DomainError::NoPendingAssignment(format!(
                "Evaluations for match {} have expired",
                match_id
            )));
        }

        {
            let assignment = record.assignments.get(evaluator_id).ok_or_else(|| {
                DomainError::NoPendingAssignment(format!(
                    "Player {} has no assignment for match {}",
                    evaluator_id, match_id
                ))
            })?;
            if assignment.completed {
                return Err(DomainError::NoPendingAssignment(format!(
                    "Player {} already submitted for match {}",
                    evaluator_id, match_id
                )));
            }

            for (target_id, submission) in &ratings {
                if !assignment.targets.iter().any(|t| t.id == *target_id) {
                    return Err(DomainError::Validation(format!(
                        "Player {} is not an assigned target",
                        target_id
                    )));
                }
                if !(1.0..=10.0).contains(&submission.rating) {
                    return Err(DomainError::Validation(format!(
                        "Rating {} for player {} is outside 1-10",
                        submission.rating, target_id
                    )));
                }
            }
        }

        let assignment = record
            .assignments
            .get_mut(evaluator_id)
            .ok_or_else(|| DomainError::Internal("assignment vanished".to_string()))?;
        assignment.ratings = ratings;
        assignment.completed = true;
        assignment.completed_at = Some(Utc::now());
        record.completed.insert(evaluator_id.clone(), true);
        record.recompute_participation();

        self.evaluations.save(&record).await?;

        tracing::info!(
            match_id = %match_id,
            evaluator = %evaluator_id,
            participation = record.participation_rate,
            "Evaluation submitted"
        );

        let mut ratings_updated = false;
        if record.participation_rate >= PARTICIPATION_THRESHOLD && !record.update_triggered {
            self.commit_ratings(&mut record).await?;
            ratings_updated = true;
        }

        Ok(SubmissionOutcome {
            participation_rate: record.participation_rate,
            ratings_updated,
        })
    }

    /// Aggregate the submitted ratings and apply them to player profiles.
    /// The update flag is only persisted once the profile batch has landed,
    /// so a failed batch is retried by the next qualifying submission.
    async fn commit_ratings(&self, record: &mut EvaluationRecord) -> Result<(), DomainError> {
        let aggregates = aggregate_ratings(record);
        let evaluator_count = record.completed.values().filter(|c| **c).count();

        let mut updates = Vec::new();
        let mut trace_entries = Vec::new();

        for (player_id, aggregate) in &aggregates {
            let resolved = match resolve_profile(self.directory.as_ref(), player_id).await? {
                Some(resolved) => resolved,
                None => {
                    tracing::warn!(
                        player = %player_id,
                        match_id = %record.match_id,
                        "No profile found, skipping rating update"
                    );
                    continue;
                }
            };
            let profile = resolved.profile;

            let delta = rating_delta(aggregate.mean);
            let new_ovr = clamp_ovr(profile.ovr + delta);
            let step = intensity(aggregate.mean);
            let deltas = attribute_deltas(profile.position, step);
            let new_attributes = apply_attribute_deltas(&profile.attributes, &deltas);

            let change = RatingChange {
                date: Utc::now(),
                match_id: record.match_id.clone(),
                old_ovr: profile.ovr,
                new_ovr,
                delta: new_ovr - profile.ovr,
                attribute_deltas: named_deltas(&deltas),
            };

            tracing::debug!(
                player = %player_id,
                source = %resolved.source,
                mean = aggregate.mean,
                old_ovr = profile.ovr,
                new_ovr = new_ovr,
                "Computed rating change"
            );

            trace_entries.push((
                player_id.clone(),
                RatingSnapshot {
                    ovr: profile.ovr,
                    attributes: profile.attributes,
                },
                RatingSnapshot {
                    ovr: new_ovr,
                    attributes: new_attributes,
                },
                RatingStats {
                    average_rating: aggregate.mean,
                    total_goals: aggregate.total_goals,
                    unique_tags: aggregate.tags.clone(),
                },
            ));

            updates.push(ProfileUpdate {
                player_id: player_id.clone(),
                new_ovr,
                new_attributes,
                change,
            });
        }

        self.directory.commit_all(&updates).await?;

        record.update_triggered = true;
        record.status = EvaluationStatus::Completed;
        record.ratings_updated_at = Some(Utc::now());
        self.evaluations.save(record).await?;

        tracing::info!(
            match_id = %record.match_id,
            players_updated = updates.len(),
            participation = record.participation_rate,
            "Player ratings committed"
        );

        let context = TraceContext {
            match_id: record.match_id.clone(),
            match_name: record.match_name.clone(),
            participation_rate: record.participation_rate,
            evaluator_count,
        };
        for (player_id, before, after, stats) in &trace_entries {
            if let Err(e) = self
                .traces
                .log_trace(player_id, before, after, stats, &context)
                .await
            {
                tracing::warn!(player = %player_id, error = %e, "Failed to log rating trace");
            }
        }

        for update in &updates {
            let notification = Notification {
                kind: NotificationKind::RatingsUpdated,
                recipient: update.player_id.clone(),
                match_id: record.match_id.clone(),
                title: "Your rating was updated".to_string(),
                body: format!(
                    "Your overall moved from {} to {} after {}",
                    update.change.old_ovr, update.change.new_ovr, record.match_name
                ),
            };
            if let Err(e) = self.notifier.notify(&notification).await {
                tracing::warn!(
                    recipient = %update.player_id,
                    error = %e,
                    "Failed to send rating notification"
                );
            }
        }

        if let Err(e) = self
            .notifier
            .broadcast_activity(
                "ratings_updated",
                &format!("Player ratings updated after {}", record.match_name),
            )
            .await
        {
            tracing::warn!(error = %e, "Failed to broadcast rating update");
        }

        Ok(())
    }

    /// Expire pending records past their deadline. Returns how many records
    /// were expired.
    pub async fn cleanup_expired(&self, now: DateTime<Utc>) -> Result<usize, DomainError> {
        let expired = self.evaluations.find_pending_expired(now).await?;
        let mut count = 0;

        for mut record in expired {
            record.status = EvaluationStatus::Expired;
            record.expired_at = Some(now);
            self.evaluations.save(&record).await?;
            count += 1;
            tracing::info!(
                match_id = %record.match_id,
                participation = record.participation_rate,
                "Evaluation record expired"
            );
        }

        Ok(count)
    }

    /// A player's open assignments across pending records
    pub async fn pending_for(
        &self,
        player_id: &PlayerId,
    ) -> Result<Vec<PendingEvaluation>, DomainError> {
        let records = self
            .evaluations
            .find_by_status(EvaluationStatus::Pending)
            .await?;

        let mut pending: Vec<PendingEvaluation> = records
            .into_iter()
            .filter_map(|record| {
                let assignment = record.assignments.get(player_id)?;
                if assignment.completed {
                    return None;
                }
                Some(PendingEvaluation {
                    match_id: record.match_id.clone(),
                    match_name: record.match_name.clone(),
                    match_date: record.match_date,
                    deadline: record.deadline,
                    targets: assignment.targets.clone(),
                    participation_rate: record.participation_rate,
                })
            })
            .collect();

        pending.sort_by(|a, b| b.match_date.cmp(&a.match_date));
        Ok(pending)
    }

    /// A player's most recent completed assignments, newest first
    pub async fn completed_for(
        &self,
        player_id: &PlayerId,
    ) -> Result<Vec<CompletedEvaluation>, DomainError> {
        let records = self
            .evaluations
            .find_recent(COMPLETED_HISTORY_LIMIT)
            .await?;

        Ok(records
            .into_iter()
            .filter_map(|record| {
                let assignment = record.assignments.get(player_id)?;
                if !assignment.completed {
                    return None;
                }
                Some(CompletedEvaluation {
                    match_id: record.match_id.clone(),
                    match_name: record.match_name.clone(),
                    match_date: record.match_date,
                    completed_at: assignment.completed_at,
                    ratings: assignment.ratings.clone(),
                    ratings_updated: record.update_triggered,
                })
            })
            .take(COMPLETED_HISTORY_LIMIT)
            .collect())
    }

    async fn send_pending_notifications(&self, record: &EvaluationRecord) {
        for (evaluator_id, assignment) in &record.assignments {
            let names: Vec<&str> = assignment.targets.iter().map(|t| t.name.as_str()).collect();
            let notification = Notification {
                kind: NotificationKind::EvaluationPending,
                recipient: evaluator_id.clone(),
                match_id: record.match_id.clone(),
                title: "Rate your teammates".to_string(),
                body: format!(
                    "Rate {} from {}. You have 72 hours.",
                    names.join(" and "),
                    record.match_name
                ),
            };
            if let Err(e) = self.notifier.notify(&notification).await {
                tracing::warn!(
                    recipient = %evaluator_id,
                    error = %e,
                    "Failed to send evaluation notification"
                );
            }
        }

        if let Err(e) = self
            .notifier
            .broadcast_activity(
                "evaluations_started",
                &format!("Evaluations are open for {}", record.match_name),
            )
            .await
        {
            tracing::warn!(error = %e, "Failed to broadcast evaluation start");
        }
    }
}

fn team_summary(team: &crate::domain::entities::TeamSheet) -> TeamSummary {
    TeamSummary {
        name: team.name.clone(),
        players: team
            .players
            .iter()
            .map(|p| EvaluationTarget {
                id: p.id.clone(),
                name: p.name.clone(),
                position: p.position,
                ovr: if p.ovr > 0 {
                    p.ovr
                } else {
                    crate::app::evaluation_config::DEFAULT_OVR
                },
            })
            .collect(),
    }
}

fn named_deltas(deltas: &crate::domain::entities::AttributeSet) -> HashMap<String, i32> {
    let mut map = HashMap::new();
    for (name, value) in [
        ("pac", deltas.pac),
        ("sho", deltas.sho),
        ("pas", deltas.pas),
        ("dri", deltas.dri),
        ("def", deltas.def),
        ("phy", deltas.phy),
    ] {
        if value != 0 {
            map.insert(name.to_string(), value);
        }
    }
    map
}
