//! Test fixtures
//!
//! Factory functions for creating test data with sensible defaults.
//! Each fixture function creates a valid entity that can be customized.

use chrono::Utc;

use crate::domain::entities::{
    AttributeSet, Fixture, MatchId, MatchKind, Participant, PlayerId, PlayerProfile, Position,
    RatingSubmission, TeamSheet,
};

/// Create a roster entry
pub fn test_participant(id: &str, position: Position, guest: bool) -> Participant {
    Participant {
        id: PlayerId::new(id),
        name: format!("Player {}", id),
        position,
        ovr: 70,
        guest,
    }
}

/// Create a profile with a flat attribute sheet
pub fn test_profile(id: &str, position: Position, ovr: i32) -> PlayerProfile {
    PlayerProfile {
        id: PlayerId::new(id),
        name: format!("Player {}", id),
        position,
        ovr,
        attributes: AttributeSet::flat(70),
        history: vec![],
    }
}

/// A plain rating submission with no notes, tags, or goals
pub fn rate(rating: f64) -> RatingSubmission {
    RatingSubmission {
        rating,
        notes: None,
        tags: vec![],
        goals: None,
    }
}

fn fixture(id: &str, team_a: Vec<Participant>, team_b: Vec<Participant>) -> Fixture {
    Fixture {
        id: MatchId::new(id),
        kind: MatchKind::Manual,
        name: "Thursday friendly".to_string(),
        date: Utc::now(),
        team_a: TeamSheet {
            name: "Red".to_string(),
            players: team_a,
        },
        team_b: TeamSheet {
            name: "Blue".to_string(),
            players: team_b,
        },
    }
}

/// 3v3 fixture: every evaluator has exactly two peers, so target selection
/// does not depend on the RNG.
pub fn test_fixture_3v3() -> Fixture {
    fixture(
        "match-3v3",
        vec![
            test_participant("a1", Position::Midfielder, false),
            test_participant("a2", Position::Midfielder, false),
            test_participant("a3", Position::Midfielder, false),
        ],
        vec![
            test_participant("b1", Position::Defender, false),
            test_participant("b2", Position::Defender, false),
            test_participant("b3", Position::Defender, false),
        ],
    )
}

/// 4v4 fixture with eight eligible evaluators
pub fn test_fixture_4v4() -> Fixture {
    fixture(
        "match-4v4",
        vec![
            test_participant("a1", Position::Midfielder, false),
            test_participant("a2", Position::Midfielder, false),
            test_participant("a3", Position::Midfielder, false),
            test_participant("a4", Position::Midfielder, false),
        ],
        vec![
            test_participant("b1", Position::Defender, false),
            test_participant("b2", Position::Defender, false),
            test_participant("b3", Position::Defender, false),
            test_participant("b4", Position::Defender, false),
        ],
    )
}

/// 5v2 fixture: the short side has one peer per player and gets no
/// assignments, leaving exactly five evaluators
pub fn test_fixture_5v2() -> Fixture {
    fixture(
        "match-5v2",
        vec![
            test_participant("a1", Position::Midfielder, false),
            test_participant("a2", Position::Midfielder, false),
            test_participant("a3", Position::Midfielder, false),
            test_participant("a4", Position::Midfielder, false),
            test_participant("a5", Position::Midfielder, false),
        ],
        vec![
            test_participant("b1", Position::Defender, false),
            test_participant("b2", Position::Defender, false),
        ],
    )
}

/// A fixture with too few eligible players for evaluations
pub fn test_fixture_tiny() -> Fixture {
    fixture(
        "match-tiny",
        vec![test_participant("a1", Position::Forward, false)],
        vec![test_participant("b1", Position::Defender, false)],
    )
}

/// 5v5 with one guest per side: guests play but are never assigned or rated
pub fn test_fixture_5v5_with_guests() -> Fixture {
    fixture(
        "match-5v5",
        vec![
            test_participant("a1", Position::Goalkeeper, false),
            test_participant("a2", Position::Defender, false),
            test_participant("a3", Position::Midfielder, false),
            test_participant("a4", Position::Forward, false),
            test_participant("guest-a", Position::Forward, true),
        ],
        vec![
            test_participant("b1", Position::Goalkeeper, false),
            test_participant("b2", Position::Defender, false),
            test_participant("b3", Position::Wing, false),
            test_participant("b4", Position::Forward, false),
            test_participant("guest-b", Position::Midfielder, true),
        ],
    )
}
