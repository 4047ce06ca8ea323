//! Assignment generation
//!
//! Builds the evaluator -> targets map for a fixture: every non-guest roster
//! member rates two randomly chosen same-team peers. The RNG is injected so
//! tests can seed it.

use std::collections::HashMap;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::app::evaluation_config::{DEFAULT_OVR, MIN_ELIGIBLE_PLAYERS, TARGETS_PER_EVALUATOR};
use crate::domain::entities::{
    Assignment, EvaluationTarget, Fixture, Participant, PlayerId, TeamSide,
};

/// Non-guest roster members of both teams
pub fn eligible_players(fixture: &Fixture) -> Vec<(&Participant, TeamSide)> {
    fixture
        .all_participants()
        .filter(|(p, _)| !p.guest)
        .collect()
}

/// Whether the fixture has enough eligible players for evaluations at all
pub fn has_enough_players(fixture: &Fixture) -> bool {
    eligible_players(fixture).len() >= MIN_ELIGIBLE_PLAYERS
}

fn target_of(p: &Participant) -> EvaluationTarget {
    EvaluationTarget {
        id: p.id.clone(),
        name: p.name.clone(),
        position: p.position,
        ovr: if p.ovr > 0 { p.ovr } else { DEFAULT_OVR },
    }
}

/// Generate the assignment map. Participants with fewer than two eligible
/// same-team peers are skipped. Iteration is in roster order (team A then
/// team B) so a seeded RNG yields reproducible assignments.
pub fn generate_assignments<R: Rng + ?Sized>(
    fixture: &Fixture,
    rng: &mut R,
) -> HashMap<PlayerId, Assignment> {
    let eligible = eligible_players(fixture);
    let mut assignments = HashMap::new();

    for (evaluator, side) in &eligible {
        let mut peers: Vec<&Participant> = eligible
            .iter()
            .filter(|(p, s)| *s == *side && p.id != evaluator.id)
            .map(|(p, _)| *p)
            .collect();

        if peers.len() < TARGETS_PER_EVALUATOR {
            continue;
        }

        peers.shuffle(rng);
        let targets = peers
            .iter()
            .take(TARGETS_PER_EVALUATOR)
            .map(|p| target_of(p))
            .collect();

        assignments.insert(
            evaluator.id.clone(),
            Assignment {
                evaluator_name: evaluator.name.clone(),
                targets,
                completed: false,
                ratings: HashMap::new(),
                completed_at: None,
            },
        );
    }

    assignments
}
