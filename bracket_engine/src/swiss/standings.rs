//! Standings snapshots and tie-broken ranking.
//!
//! Points tables are computed outside the engine; this module only consumes
//! them and orders teams for pairing and qualification.

use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::HashMap;

use crate::schedule::errors::{ScheduleError, ScheduleResult};
use crate::schedule::models::{Match, TeamRef};

pub const POINTS_FOR_WIN: u32 = 3;
pub const POINTS_FOR_DRAW: u32 = 1;
pub const POINTS_FOR_LOSS: u32 = 0;

/// One team's line in a standings snapshot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandingsEntry {
    pub points: u32,
    pub goals_for: u32,
    pub goals_against: u32,
}

impl StandingsEntry {
    pub fn new(points: u32, goals_for: u32, goals_against: u32) -> Self {
        Self {
            points,
            goals_for,
            goals_against,
        }
    }

    pub fn goal_difference(&self) -> i64 {
        i64::from(self.goals_for) - i64::from(self.goals_against)
    }
}

/// Standings as of the last completed round
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Standings {
    entries: HashMap<TeamRef, StandingsEntry>,
}

impl Standings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everyone on zero
    pub fn zeroed(teams: &[TeamRef]) -> Self {
        Self {
            entries: teams
                .iter()
                .map(|t| (t.clone(), StandingsEntry::default()))
                .collect(),
        }
    }

    pub fn with_entry(mut self, team: TeamRef, entry: StandingsEntry) -> Self {
        self.entries.insert(team, entry);
        self
    }

    pub fn insert(&mut self, team: TeamRef, entry: StandingsEntry) {
        self.entries.insert(team, entry);
    }

    pub fn get(&self, team: &TeamRef) -> Option<&StandingsEntry> {
        self.entries.get(team)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Points a result is worth to the home and away side
fn result_points(home_goals: u32, away_goals: u32) -> (u32, u32) {
    match home_goals.cmp(&away_goals) {
        std::cmp::Ordering::Greater => (POINTS_FOR_WIN, POINTS_FOR_LOSS),
        std::cmp::Ordering::Less => (POINTS_FOR_LOSS, POINTS_FOR_WIN),
        std::cmp::Ordering::Equal => (POINTS_FOR_DRAW, POINTS_FOR_DRAW),
    }
}

/// Order `teams` by standing, strongest first.
///
/// Tie-breaks, in order: points, head-to-head points among the teams level on
/// points, goal difference, original seed (position in `teams`). Only matches
/// in `results` with both scores recorded count towards head-to-head.
pub fn rank_teams(
    teams: &[TeamRef],
    standings: &Standings,
    results: &[Match],
) -> ScheduleResult<Vec<TeamRef>> {
    let mut lines = Vec::with_capacity(teams.len());
    for (seed, team) in teams.iter().enumerate() {
        let entry = standings
            .get(team)
            .ok_or_else(|| ScheduleError::InconsistentStandings { team: team.clone() })?;
        lines.push((seed, team, *entry));
    }

    let points: HashMap<&TeamRef, u32> = lines.iter().map(|(_, t, e)| (*t, e.points)).collect();

    let mut head_to_head: HashMap<&TeamRef, u32> = HashMap::new();
    for m in results {
        let (Some(home), Some(away), Some((hg, ag))) = (m.home.team(), m.away.team(), m.score())
        else {
            continue;
        };
        match (points.get(home), points.get(away)) {
            (Some(hp), Some(ap)) if hp == ap => {
                let (home_pts, away_pts) = result_points(hg, ag);
                *head_to_head.entry(home).or_default() += home_pts;
                *head_to_head.entry(away).or_default() += away_pts;
            }
            _ => {}
        }
    }

    lines.sort_by_key(|(seed, team, entry)| {
        (
            Reverse(entry.points),
            Reverse(head_to_head.get(team).copied().unwrap_or(0)),
            Reverse(entry.goal_difference()),
            *seed,
        )
    });

    Ok(lines.into_iter().map(|(_, team, _)| team.clone()).collect())
}
