//! Rating aggregation
//!
//! Collects submitted ratings across completed assignments, grouped by the
//! rated player, and converts the mean into a signed OVR delta.

use std::collections::{BTreeMap, BTreeSet};

use crate::domain::entities::{EvaluationRecord, PlayerId};

/// Everything evaluators said about one player
#[derive(Debug, Clone)]
pub struct PlayerAggregate {
    pub ratings: Vec<f64>,
    pub mean: f64,
    pub total_goals: i32,
    pub tags: Vec<String>,
    pub evaluators: Vec<PlayerId>,
}

/// Round with JS `Math.round` semantics: halves round toward positive
/// infinity, so -0.5 becomes 0 rather than -1.
pub fn round_half_up(x: f64) -> i32 {
    (x + 0.5).floor() as i32
}

/// Convert a mean rating on the 1-10 scale into an OVR delta. 5 is the
/// neutral point; each full point away moves OVR by 2.
pub fn rating_delta(mean: f64) -> i32 {
    round_half_up((mean - 5.0) * 2.0)
}

/// Group submitted ratings by rated player across all completed assignments.
/// Returns a sorted map so downstream iteration is deterministic.
pub fn aggregate_ratings(record: &EvaluationRecord) -> BTreeMap<PlayerId, PlayerAggregate> {
    let mut ratings: BTreeMap<PlayerId, Vec<f64>> = BTreeMap::new();
    let mut goals: BTreeMap<PlayerId, i32> = BTreeMap::new();
    let mut tags: BTreeMap<PlayerId, BTreeSet<String>> = BTreeMap::new();
    let mut evaluators: BTreeMap<PlayerId, Vec<PlayerId>> = BTreeMap::new();

    for (evaluator_id, assignment) in &record.assignments {
        if !assignment.completed {
            continue;
        }
        for (target_id, submission) in &assignment.ratings {
            ratings
                .entry(target_id.clone())
                .or_default()
                .push(submission.rating);
            if let Some(g) = submission.goals {
                *goals.entry(target_id.clone()).or_default() += g;
            }
            tags.entry(target_id.clone())
                .or_default()
                .extend(submission.tags.iter().cloned());
            evaluators
                .entry(target_id.clone())
                .or_default()
                .push(evaluator_id.clone());
        }
    }

    ratings
        .into_iter()
        .map(|(id, rs)| {
            let mean = rs.iter().sum::<f64>() / rs.len() as f64;
            let aggregate = PlayerAggregate {
                mean,
                total_goals: goals.get(&id).copied().unwrap_or(0),
                tags: tags
                    .get(&id)
                    .map(|t| t.iter().cloned().collect())
                    .unwrap_or_default(),
                evaluators: evaluators.get(&id).cloned().unwrap_or_default(),
                ratings: rs,
            };
            (id, aggregate)
        })
        .collect()
}
