//! Round-robin league schedule generation.

use serde::{Deserialize, Serialize};

use super::calendar::RoundCalendar;
use super::errors::{ScheduleError, ScheduleResult};
use super::models::{Match, TeamRef, validate_team_list};
use super::pairing::{round_robin_round, rounds_per_cycle};

/// A team sitting out a league round
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeagueBye {
    pub round: u32,
    pub team: TeamRef,
}

/// Full league schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeagueSchedule {
    /// Matches ordered by round, then circle position
    pub matches: Vec<Match>,
    /// One entry per round when the team count is odd
    pub byes: Vec<LeagueBye>,
    /// Total number of rounds across all repetitions
    pub round_count: u32,
}

impl LeagueSchedule {
    /// Matches of a single global round
    pub fn round(&self, round: u32) -> impl Iterator<Item = &Match> {
        self.matches.iter().filter(move |m| m.round == round)
    }

    pub fn with_calendar(mut self, calendar: &RoundCalendar) -> Self {
        calendar.apply(&mut self.matches);
        self
    }
}

/// Generate a league where every pair of teams meets `repetitions` times.
///
/// Even repetitions replay the base cycle; odd repetitions replay it with home
/// and away swapped. Rounds are numbered globally from 0.
pub fn generate_round_robin(teams: &[TeamRef], repetitions: u32) -> ScheduleResult<LeagueSchedule> {
    validate_team_list(teams, 2)?;
    if repetitions == 0 {
        return Err(ScheduleError::invalid("repetitions must be at least 1"));
    }

    let cycle_len = rounds_per_cycle(teams.len());
    let cycle: Vec<_> = (0..cycle_len)
        .map(|r| round_robin_round(teams, r))
        .collect();

    let mut matches = Vec::with_capacity(repetitions as usize * cycle_len * teams.len() / 2);
    let mut byes = Vec::new();
    let mut round = 0u32;

    for rep in 0..repetitions {
        let swap = rep % 2 == 1;
        for pairings in &cycle {
            for (home, away) in &pairings.pairs {
                let (home, away) = if swap { (away, home) } else { (home, away) };
                matches.push(Match::league(round, home.clone(), away.clone()));
            }
            if let Some(team) = &pairings.bye {
                byes.push(LeagueBye {
                    round,
                    team: team.clone(),
                });
            }
            round += 1;
        }
    }

    log::debug!(
        "Generated round-robin: {} teams, {} repetition(s), {} rounds, {} matches",
        teams.len(),
        repetitions,
        round,
        matches.len()
    );

    Ok(LeagueSchedule {
        matches,
        byes,
        round_count: round,
    })
}
