//! Service-level integration tests
//!
//! Full evaluation lifecycles run against the in-memory port
//! implementations with a seeded RNG:
//! initialize -> submit -> threshold commit -> cleanup.
//!
//! Run with: cargo test integration_tests

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;

    use chrono::{Duration, Utc};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use crate::app::{EvaluationService, EVALUATION_WINDOW_HOURS};
    use crate::domain::entities::{
        AttributeSet, EvaluationStatus, Fixture, PlayerId, Position,
    };
    use crate::domain::ports::NotificationKind;
    use crate::test_utils::{
        rate, test_fixture_3v3, test_fixture_5v5_with_guests, test_profile,
        InMemoryEvaluationRepository, InMemoryPlayerDirectory, RecordingNotifier,
        RecordingTraceSink,
    };

    type Service = EvaluationService<
        InMemoryEvaluationRepository,
        InMemoryPlayerDirectory,
        RecordingNotifier,
        RecordingTraceSink,
    >;

    struct World {
        service: Service,
        evaluations: Arc<InMemoryEvaluationRepository>,
        directory: Arc<InMemoryPlayerDirectory>,
        notifier: Arc<RecordingNotifier>,
        traces: Arc<RecordingTraceSink>,
    }

    fn world(directory: InMemoryPlayerDirectory) -> World {
        let evaluations = Arc::new(InMemoryEvaluationRepository::new());
        let directory = Arc::new(directory);
        let notifier = Arc::new(RecordingNotifier::new());
        let traces = Arc::new(RecordingTraceSink::new());
        let service = EvaluationService::new(
            evaluations.clone(),
            directory.clone(),
            notifier.clone(),
            traces.clone(),
        );
        World {
            service,
            evaluations,
            directory,
            notifier,
            traces,
        }
    }

    async fn submit_rating(w: &World, fixture: &Fixture, evaluator: &str, value: f64) {
        let evaluator = PlayerId::new(evaluator);
        let record = w.evaluations.get(&fixture.id).unwrap();
        let targets = record.assignments[&evaluator].targets.clone();
        let ratings: HashMap<_, _> = targets
            .iter()
            .map(|t| (t.id.clone(), rate(value)))
            .collect();
        w.service
            .submit_evaluation(&fixture.id, &evaluator, ratings)
            .await
            .unwrap();
    }

    /// Guests play but never evaluate or get evaluated; everyone else gets
    /// two same-team targets.
    #[tokio::test]
    async fn guests_are_invisible_to_assignments() {
        let w = world(InMemoryPlayerDirectory::new());
        let fixture = test_fixture_5v5_with_guests();
        let mut rng = StdRng::seed_from_u64(99);

        let record = w
            .service
            .initialize_with_rng(&fixture, &mut rng)
            .await
            .unwrap()
            .unwrap();

        // 8 real players evaluate, the 2 guests do not
        assert_eq!(record.assignments.len(), 8);
        assert!(!record.assignments.contains_key(&PlayerId::new("guest-a")));
        assert!(!record.assignments.contains_key(&PlayerId::new("guest-b")));

        for (evaluator, assignment) in &record.assignments {
            assert_eq!(assignment.targets.len(), 2);
            assert!(assignment.targets.iter().all(|t| t.id != *evaluator));
            // Guests are never targets either
            assert!(assignment
                .targets
                .iter()
                .all(|t| !t.id.0.starts_with("guest")));
            // Same team as the evaluator
            let team = if evaluator.0.starts_with('a') { 'a' } else { 'b' };
            assert!(assignment.targets.iter().all(|t| t.id.0.starts_with(team)));
        }

        // Team summaries keep the full sheets, guests included
        assert_eq!(record.team_a.players.len(), 5);
        assert_eq!(record.team_b.players.len(), 5);
    }

    /// Participation climbs with each submission and the update fires
    /// exactly once when the threshold is crossed.
    #[tokio::test]
    async fn participation_threshold_triggers_update_once() {
        let mut directory = InMemoryPlayerDirectory::new();
        for id in ["a1", "a2", "a3", "b1", "b2", "b3"] {
            directory = directory.with_group_member(test_profile(id, Position::Midfielder, 70));
        }
        let w = world(directory);
        let fixture = test_fixture_3v3();
        let mut rng = StdRng::seed_from_u64(99);
        w.service
            .initialize_with_rng(&fixture, &mut rng)
            .await
            .unwrap();

        // 4 of 6: 0.667, nothing committed
        for id in ["a1", "a2", "a3", "b1"] {
            submit_rating(&w, &fixture, id, 7.0).await;
        }
        let record = w.evaluations.get(&fixture.id).unwrap();
        assert!((record.participation_rate - 4.0 / 6.0).abs() < 1e-9);
        assert!(!record.update_triggered);
        assert_eq!(w.directory.commit_count(), 0);

        // 5 of 6: 0.833 crosses the threshold
        submit_rating(&w, &fixture, "b2", 7.0).await;
        let record = w.evaluations.get(&fixture.id).unwrap();
        assert!(record.update_triggered);
        assert_eq!(record.status, EvaluationStatus::Completed);
        assert_eq!(w.directory.commit_count(), 1);

        // Last straggler still gets to submit, but no second commit
        submit_rating(&w, &fixture, "b3", 7.0).await;
        assert_eq!(w.directory.commit_count(), 1);
        let record = w.evaluations.get(&fixture.id).unwrap();
        assert_eq!(record.participation_rate, 1.0);
    }

    /// High ratings raise OVR and the position-weighted attributes, and both
    /// clamp at their ceilings.
    #[tokio::test]
    async fn excellent_ratings_clamp_at_ceiling() {
        let mut directory = InMemoryPlayerDirectory::new();
        for id in ["a1", "a2", "a3", "b1", "b2", "b3"] {
            directory = directory.with_group_member(test_profile(id, Position::Midfielder, 70));
        }
        // a1 is already near the ceiling
        let mut star = test_profile("a1", Position::Midfielder, 98);
        star.attributes = AttributeSet::flat(98);
        directory = directory.with_group_member(star);

        let w = world(directory);
        let fixture = test_fixture_3v3();
        let mut rng = StdRng::seed_from_u64(99);
        w.service
            .initialize_with_rng(&fixture, &mut rng)
            .await
            .unwrap();

        for id in ["a1", "a2", "a3", "b1", "b2", "b3"] {
            submit_rating(&w, &fixture, id, 10.0).await;
        }

        // Mean 10.0: delta +10, intensity +2
        let star = w.directory.group_profile(&PlayerId::new("a1")).unwrap();
        assert_eq!(star.ovr, 99);
        assert_eq!(star.attributes.pas, 99);
        assert_eq!(star.attributes.dri, 99);
        assert_eq!(star.history[0].delta, 1);

        let normal = w.directory.group_profile(&PlayerId::new("a2")).unwrap();
        assert_eq!(normal.ovr, 80);
        assert_eq!(normal.attributes.pas, 74);
        assert_eq!(normal.attributes.dri, 72);
        assert_eq!(normal.attributes.pac, 72);
        assert_eq!(normal.attributes.sho, 70);
    }

    /// Low ratings lower OVR and attributes, clamped at their floors.
    #[tokio::test]
    async fn poor_ratings_clamp_at_floor() {
        let mut directory = InMemoryPlayerDirectory::new();
        for id in ["a1", "a2", "a3", "b1", "b2", "b3"] {
            directory = directory.with_group_member(test_profile(id, Position::Defender, 70));
        }
        let mut struggler = test_profile("b1", Position::Defender, 42);
        struggler.attributes = AttributeSet::flat(21);
        directory = directory.with_group_member(struggler);

        let w = world(directory);
        let fixture = test_fixture_3v3();
        let mut rng = StdRng::seed_from_u64(99);
        w.service
            .initialize_with_rng(&fixture, &mut rng)
            .await
            .unwrap();

        for id in ["a1", "a2", "a3", "b1", "b2", "b3"] {
            submit_rating(&w, &fixture, id, 1.0).await;
        }

        // Mean 1.0: delta -8, intensity -2
        let struggler = w.directory.group_profile(&PlayerId::new("b1")).unwrap();
        assert_eq!(struggler.ovr, 40);
        // Defender: def moves -4, clamped from 21 to 20
        assert_eq!(struggler.attributes.def, 20);
        assert_eq!(struggler.attributes.phy, 20);
        assert_eq!(struggler.attributes.pas, 20);

        let normal = w.directory.group_profile(&PlayerId::new("a1")).unwrap();
        assert_eq!(normal.ovr, 62);
        assert_eq!(normal.attributes.def, 66);
        assert_eq!(normal.attributes.phy, 68);
    }

    /// Neutral ratings leave OVR untouched but still complete the record.
    #[tokio::test]
    async fn neutral_ratings_change_nothing() {
        let mut directory = InMemoryPlayerDirectory::new();
        for id in ["a1", "a2", "a3", "b1", "b2", "b3"] {
            directory = directory.with_group_member(test_profile(id, Position::Wing, 70));
        }
        let w = world(directory);
        let fixture = test_fixture_3v3();
        let mut rng = StdRng::seed_from_u64(99);
        w.service
            .initialize_with_rng(&fixture, &mut rng)
            .await
            .unwrap();

        // Mean 5.2: delta rounds to 0 and the intensity band is flat
        for id in ["a1", "a2", "a3", "b1", "b2", "b3"] {
            submit_rating(&w, &fixture, id, 5.2).await;
        }

        let record = w.evaluations.get(&fixture.id).unwrap();
        assert!(record.update_triggered);
        assert_eq!(record.status, EvaluationStatus::Completed);

        let profile = w.directory.group_profile(&PlayerId::new("a2")).unwrap();
        assert_eq!(profile.ovr, 70);
        assert_eq!(profile.attributes, AttributeSet::flat(70));
        // The change is still recorded in history and traced, with delta 0
        assert_eq!(profile.history.len(), 1);
        assert_eq!(profile.history[0].delta, 0);
        assert_eq!(w.traces.traces().len(), 6);
    }

    /// Expiry sweep closes pending records past the deadline and leaves
    /// completed ones alone.
    #[tokio::test]
    async fn cleanup_sweep_full_lifecycle() {
        let mut directory = InMemoryPlayerDirectory::new();
        for id in ["a1", "a2", "a3", "b1", "b2", "b3"] {
            directory = directory.with_group_member(test_profile(id, Position::Forward, 70));
        }
        let w = world(directory);

        // One record runs to completion
        let done = test_fixture_3v3();
        let mut rng = StdRng::seed_from_u64(99);
        w.service
            .initialize_with_rng(&done, &mut rng)
            .await
            .unwrap();
        for id in ["a1", "a2", "a3", "b1", "b2", "b3"] {
            submit_rating(&w, &done, id, 7.0).await;
        }

        // Another stays half-finished
        let mut stale = test_fixture_5v5_with_guests();
        stale.id = crate::domain::entities::MatchId::new("match-stale");
        w.service
            .initialize_with_rng(&stale, &mut rng)
            .await
            .unwrap();
        submit_rating(&w, &stale, "a1", 8.0).await;

        let later = Utc::now() + Duration::hours(EVALUATION_WINDOW_HOURS + 1);
        let expired = w.service.cleanup_expired(later).await.unwrap();
        assert_eq!(expired, 1);

        let stale_record = w.evaluations.get(&stale.id).unwrap();
        assert_eq!(stale_record.status, EvaluationStatus::Expired);
        assert!(stale_record.expired_at.is_some());
        // Submitted ratings are retained on the expired record
        assert!(stale_record.assignments[&PlayerId::new("a1")].completed);

        let done_record = w.evaluations.get(&done.id).unwrap();
        assert_eq!(done_record.status, EvaluationStatus::Completed);
        assert!(done_record.expired_at.is_none());

        // Expired records reject late submissions
        let record = w.evaluations.get(&stale.id).unwrap();
        let evaluator = PlayerId::new("a2");
        let targets = record.assignments[&evaluator].targets.clone();
        let ratings: HashMap<_, _> =
            targets.iter().map(|t| (t.id.clone(), rate(6.0))).collect();
        let err = w
            .service
            .submit_evaluation(&stale.id, &evaluator, ratings)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            crate::error::DomainError::NoPendingAssignment(_)
        ));
    }

    /// Pending notifications name both targets; the rating update posts an
    /// activity event.
    #[tokio::test]
    async fn notifications_flow_through_the_lifecycle() {
        let mut directory = InMemoryPlayerDirectory::new();
        for id in ["a1", "a2", "a3", "b1", "b2", "b3"] {
            directory = directory.with_group_member(test_profile(id, Position::Midfielder, 70));
        }
        let w = world(directory);
        let fixture = test_fixture_3v3();
        let mut rng = StdRng::seed_from_u64(99);
        w.service
            .initialize_with_rng(&fixture, &mut rng)
            .await
            .unwrap();

        let sent = w.notifier.notifications();
        assert_eq!(sent.len(), 6);
        let a1 = sent
            .iter()
            .find(|n| n.recipient == PlayerId::new("a1"))
            .unwrap();
        // a1's two teammates both appear in the body
        assert!(a1.body.contains("Player a2"));
        assert!(a1.body.contains("Player a3"));

        for id in ["a1", "a2", "a3", "b1", "b2", "b3"] {
            submit_rating(&w, &fixture, id, 7.0).await;
        }

        // Every updated player is told about their new rating
        let sent = w.notifier.notifications();
        let updated: Vec<_> = sent
            .iter()
            .filter(|n| n.kind == NotificationKind::RatingsUpdated)
            .collect();
        assert_eq!(updated.len(), 6);
        assert!(updated.iter().all(|n| n.body.contains("70 to 74")));

        let activity = w.notifier.activity();
        assert_eq!(activity.len(), 2);
        assert_eq!(activity[0].0, "evaluations_started");
        assert_eq!(activity[1].0, "ratings_updated");
    }
}
