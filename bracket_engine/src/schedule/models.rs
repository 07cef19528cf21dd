//! Match and participant data models shared by every generator.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use uuid::Uuid;

use super::errors::{ScheduleError, ScheduleResult};

/// Opaque team identifier. Only its position in a seed list carries meaning.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TeamRef(String);

impl TeamRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TeamRef {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for TeamRef {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for TeamRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Match ID type, minted fresh for every generated match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MatchId(Uuid);

impl MatchId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for MatchId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Coordinates of a match inside a playoff bracket
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BracketPosition {
    /// Round number as the owning bracket numbers it
    pub round: u32,
    /// Match index within the round
    pub index: u32,
}

impl BracketPosition {
    pub fn new(round: u32, index: u32) -> Self {
        Self { round, index }
    }
}

impl fmt::Display for BracketPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "r{}-m{}", self.round, self.index)
    }
}

/// One side of a match: a known team or a placeholder resolved later
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "value")]
pub enum Participant {
    /// Resolved team
    Team(TeamRef),
    /// The n-th qualifier (1-indexed) of an earlier stage
    Seed(u32),
    /// Winner of the bracket match at this position
    WinnerOf(BracketPosition),
    /// Loser of the bracket match at this position
    LoserOf(BracketPosition),
    /// The n-th strongest survivor (1-indexed) after re-seeding by original seed
    Reseeded(u32),
}

impl Participant {
    /// Resolved team, if this side is already known
    pub fn team(&self) -> Option<&TeamRef> {
        match self {
            Participant::Team(team) => Some(team),
            _ => None,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        !matches!(self, Participant::Team(_))
    }
}

impl From<TeamRef> for Participant {
    fn from(team: TeamRef) -> Self {
        Participant::Team(team)
    }
}

impl fmt::Display for Participant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Participant::Team(team) => write!(f, "{team}"),
            Participant::Seed(n) => write!(f, "seed-{n}"),
            Participant::WinnerOf(pos) => write!(f, "winner-of-{pos}"),
            Participant::LoserOf(pos) => write!(f, "loser-of-{pos}"),
            Participant::Reseeded(n) => write!(f, "reseed-{n}"),
        }
    }
}

/// Stage a match belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum MatchStage {
    /// League or Swiss round
    League,
    /// Playoff round, numbered the way the generating bracket numbers it
    Playoff { round: u32 },
}

/// A generated fixture
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    pub id: MatchId,
    /// Global 0-based round index within the tournament
    pub round: u32,
    pub home: Participant,
    pub away: Participant,
    pub stage: MatchStage,
    /// Filled in by the external match-editing workflow
    pub home_goals: Option<u32>,
    pub away_goals: Option<u32>,
    /// Calendar date, when a round calendar was applied at creation time
    pub date: Option<NaiveDate>,
}

impl Match {
    pub fn new(round: u32, home: Participant, away: Participant, stage: MatchStage) -> Self {
        Self {
            id: MatchId::new(),
            round,
            home,
            away,
            stage,
            home_goals: None,
            away_goals: None,
            date: None,
        }
    }

    pub fn league(round: u32, home: TeamRef, away: TeamRef) -> Self {
        Self::new(
            round,
            Participant::Team(home),
            Participant::Team(away),
            MatchStage::League,
        )
    }

    /// Record a final score
    pub fn with_score(mut self, home_goals: u32, away_goals: u32) -> Self {
        self.home_goals = Some(home_goals);
        self.away_goals = Some(away_goals);
        self
    }

    pub fn is_playoff(&self) -> bool {
        matches!(self.stage, MatchStage::Playoff { .. })
    }

    pub fn playoff_round(&self) -> Option<u32> {
        match self.stage {
            MatchStage::Playoff { round } => Some(round),
            MatchStage::League => None,
        }
    }

    /// Score as `(home, away)` once both sides are recorded
    pub fn score(&self) -> Option<(u32, u32)> {
        Some((self.home_goals?, self.away_goals?))
    }

    /// Whether this match is between `a` and `b`, in either orientation
    pub fn involves_pair(&self, a: &TeamRef, b: &TeamRef) -> bool {
        match (self.home.team(), self.away.team()) {
            (Some(h), Some(w)) => (h == a && w == b) || (h == b && w == a),
            _ => false,
        }
    }

    /// `(round, home, away)` rendered as text; stable across invocations
    pub fn fixture_key(&self) -> (u32, String, String) {
        (self.round, self.home.to_string(), self.away.to_string())
    }
}

/// Ensure a team list has at least `min` entries and no duplicates
pub(crate) fn validate_team_list(teams: &[TeamRef], min: usize) -> ScheduleResult<()> {
    if teams.len() < min {
        return Err(ScheduleError::invalid(format!(
            "need at least {min} teams, got {}",
            teams.len()
        )));
    }

    let mut seen = HashSet::with_capacity(teams.len());
    for team in teams {
        if !seen.insert(team) {
            return Err(ScheduleError::invalid(format!("duplicate team id: {team}")));
        }
    }

    Ok(())
}
