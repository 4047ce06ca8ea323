//! Fixture domain entity
//!
//! A finalized football match with its two team sheets. This is the input to
//! evaluation initialization; the evaluation record itself lives in
//! `evaluation.rs`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Unique identifier for a player (roster ids are opaque strings)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(pub String);

impl PlayerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl From<String> for PlayerId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for PlayerId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a match
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MatchId(pub String);

impl MatchId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl From<String> for MatchId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for MatchId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl std::fmt::Display for MatchId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How the match was organized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchKind {
    Manual,
    Collaborative,
}

impl std::fmt::Display for MatchKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchKind::Manual => write!(f, "manual"),
            MatchKind::Collaborative => write!(f, "collaborative"),
        }
    }
}

/// Playing position. Stored positions are free text (often Spanish), so
/// parsing accepts the synonym sets the mobile app uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    Goalkeeper,
    Defender,
    Midfielder,
    Forward,
    Wing,
    Other,
}

impl Position {
    /// Parse a free-text position label. Never fails; unrecognized labels
    /// map to `Other`.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "portero" | "arquero" | "goalkeeper" | "gk" => Position::Goalkeeper,
            "defensor" | "central" | "defensa" | "defender" => Position::Defender,
            "mediocampista" | "medio" | "volante" | "midfielder" => Position::Midfielder,
            "delantero" | "atacante" | "forward" | "striker" => Position::Forward,
            "lateral" | "wing" | "banda" | "winger" => Position::Wing,
            _ => Position::Other,
        }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Position::Goalkeeper => write!(f, "goalkeeper"),
            Position::Defender => write!(f, "defender"),
            Position::Midfielder => write!(f, "midfielder"),
            Position::Forward => write!(f, "forward"),
            Position::Wing => write!(f, "wing"),
            Position::Other => write!(f, "other"),
        }
    }
}

impl std::str::FromStr for Position {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Position::parse(s))
    }
}

/// A player on a team sheet
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Participant {
    pub id: PlayerId,
    pub name: String,
    pub position: Position,
    /// Overall rating snapshot at match time
    pub ovr: i32,
    /// Guests play but neither evaluate nor get evaluated
    #[serde(default)]
    pub guest: bool,
}

/// One side of the fixture
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamSheet {
    pub name: String,
    pub players: Vec<Participant>,
}

/// Which team a participant belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TeamSide {
    A,
    B,
}

/// A finalized match ready for peer evaluation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fixture {
    pub id: MatchId,
    pub kind: MatchKind,
    pub name: String,
    pub date: DateTime<Utc>,
    pub team_a: TeamSheet,
    pub team_b: TeamSheet,
}

impl Fixture {
    /// Both teams' players, each tagged with its side
    pub fn all_participants(&self) -> impl Iterator<Item = (&Participant, TeamSide)> {
        self.team_a
            .players
            .iter()
            .map(|p| (p, TeamSide::A))
            .chain(self.team_b.players.iter().map(|p| (p, TeamSide::B)))
    }

    /// The team sheet a side refers to
    pub fn team(&self, side: TeamSide) -> &TeamSheet {
        match side {
            TeamSide::A => &self.team_a,
            TeamSide::B => &self.team_b,
        }
    }
}
