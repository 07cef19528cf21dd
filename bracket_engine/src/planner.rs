//! Tournament creation: dispatch a [`Format`] to its generator.

use serde::{Deserialize, Serialize};

use crate::bracket::custom_playoff::{CustomPlayoff, generate_custom_playoff};
use crate::bracket::elimination::{EliminationBracket, EliminationBuilder};
use crate::schedule::calendar::RoundCalendar;
use crate::schedule::errors::{ScheduleError, ScheduleResult};
use crate::schedule::format::{Format, FormatMode};
use crate::schedule::models::{Match, Participant, TeamRef};
use crate::schedule::round_robin::{LeagueSchedule, generate_round_robin};
use crate::swiss::generator::{SwissEliminationGenerator, SwissRound};

/// Everything known about a tournament when it is created
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "mode")]
pub enum TournamentPlan {
    League(LeagueSchedule),
    LeaguePlayoff {
        league: LeagueSchedule,
        /// Bracket over `Seed(1..=Q)`, resolved from the final league table
        playoff: EliminationBracket,
    },
    /// Later rounds are paired from standings as results come in
    SwissElimination {
        generator: SwissEliminationGenerator,
        first_round: SwissRound,
    },
    CustomPlayoff(CustomPlayoff),
}

impl TournamentPlan {
    pub fn mode(&self) -> FormatMode {
        match self {
            TournamentPlan::League(_) => FormatMode::League,
            TournamentPlan::LeaguePlayoff { .. } => FormatMode::LeaguePlayoff,
            TournamentPlan::SwissElimination { .. } => FormatMode::SwissElimination,
            TournamentPlan::CustomPlayoff(_) => FormatMode::CustomPlayoff,
        }
    }

    /// Every match generated so far, in round order
    pub fn matches(&self) -> Vec<&Match> {
        match self {
            TournamentPlan::League(league) => league.matches.iter().collect(),
            TournamentPlan::LeaguePlayoff { league, playoff } => {
                league.matches.iter().chain(playoff.matches.iter()).collect()
            }
            TournamentPlan::SwissElimination { first_round, .. } => first_round.matches.iter().collect(),
            TournamentPlan::CustomPlayoff(playoff) => playoff.matches.iter().collect(),
        }
    }

    /// Stamp every generated match with its round's date
    pub fn with_calendar(self, calendar: &RoundCalendar) -> Self {
        match self {
            TournamentPlan::League(league) => TournamentPlan::League(league.with_calendar(calendar)),
            TournamentPlan::LeaguePlayoff { league, playoff } => TournamentPlan::LeaguePlayoff {
                league: league.with_calendar(calendar),
                playoff: playoff.with_calendar(calendar),
            },
            TournamentPlan::SwissElimination {
                generator,
                mut first_round,
            } => {
                calendar.apply(&mut first_round.matches);
                TournamentPlan::SwissElimination {
                    generator,
                    first_round,
                }
            }
            TournamentPlan::CustomPlayoff(playoff) => {
                TournamentPlan::CustomPlayoff(playoff.with_calendar(calendar))
            }
        }
    }
}

/// Validate `format` against `teams` (in seed order) and generate the plan
pub fn plan(format: &Format, teams: &[TeamRef]) -> ScheduleResult<TournamentPlan> {
    format.validate(teams.len())?;

    let plan = match format.mode {
        FormatMode::League => TournamentPlan::League(generate_round_robin(teams, format.rounds)?),
        FormatMode::LeaguePlayoff => {
            let league = generate_round_robin(teams, format.rounds)?;
            let qualifiers = format.playoff_qualifiers.unwrap_or(teams.len());
            let seeds = (1..=qualifiers as u32).map(Participant::Seed).collect();
            let playoff = EliminationBuilder::new(seeds)
                .starting_at_round(league.round_count)
                .build()?;
            TournamentPlan::LeaguePlayoff { league, playoff }
        }
        FormatMode::SwissElimination => {
            let qualifiers = format.playoff_qualifiers.unwrap_or(teams.len());
            let generator = SwissEliminationGenerator::new(teams.to_vec(), format.rounds, qualifiers)?;
            let first_round = generator.first_round()?;
            TournamentPlan::SwissElimination {
                generator,
                first_round,
            }
        }
        FormatMode::CustomPlayoff => {
            let config = format
                .custom_config
                .ok_or_else(|| ScheduleError::invalid("custom_playoff requires custom_config"))?;
            TournamentPlan::CustomPlayoff(generate_custom_playoff(teams, config)?)
        }
    };

    log::info!(
        "Planned {} tournament for {} teams: {} matches generated",
        plan.mode(),
        teams.len(),
        plan.matches().len()
    );

    Ok(plan)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::format::CustomConfig;
    use chrono::NaiveDate;

    fn teams(n: usize) -> Vec<TeamRef> {
        (1..=n).map(|i| TeamRef::new(format!("team-{i}"))).collect()
    }

    #[test]
    fn test_plan_league() {
        let plan = plan(&Format::league(2), &teams(4)).unwrap();
        assert_eq!(plan.mode(), FormatMode::League);
        assert_eq!(plan.matches().len(), 12);
    }

    #[test]
    fn test_plan_league_playoff_starts_after_league() {
        let plan = plan(&Format::league_playoff(1, 4), &teams(6)).unwrap();
        let TournamentPlan::LeaguePlayoff { league, playoff } = &plan else {
            panic!("expected league_playoff plan");
        };

        assert_eq!(league.round_count, 5);
        assert_eq!(playoff.matches.len(), 3);
        assert!(playoff.matches.iter().all(|m| m.round >= 5));
        assert_eq!(playoff.matches[0].home, Participant::Seed(1));
        assert_eq!(playoff.matches[0].away, Participant::Seed(4));
        assert_eq!(plan.matches().len(), 15 + 3);
    }

    #[test]
    fn test_plan_league_playoff_rejects_too_many_qualifiers() {
        let err = plan(&Format::league_playoff(1, 7), &teams(6)).unwrap_err();
        assert!(matches!(err, ScheduleError::InvalidInput(_)));
    }

    #[test]
    fn test_plan_swiss_emits_first_round_only() {
        let plan = plan(&Format::swiss_elimination(3, 4), &teams(8)).unwrap();
        let TournamentPlan::SwissElimination { generator, first_round } = &plan else {
            panic!("expected swiss plan");
        };
        assert_eq!(generator.qualifiers(), 4);
        assert_eq!(first_round.index, 0);
        assert_eq!(plan.matches().len(), 4);
    }

    #[test]
    fn test_plan_custom_playoff() {
        let plan = plan(&Format::custom_playoff(CustomConfig::new(9)), &teams(9)).unwrap();
        assert_eq!(plan.mode(), FormatMode::CustomPlayoff);
        assert!(plan.matches().iter().all(|m| m.is_playoff()));
    }

    #[test]
    fn test_plan_with_calendar() {
        let start = NaiveDate::from_ymd_opt(2026, 3, 7).unwrap();
        let plan = plan(&Format::league(1), &teams(4))
            .unwrap()
            .with_calendar(&RoundCalendar::weekly(start));

        for m in plan.matches() {
            let expected = start + chrono::Days::new(7 * u64::from(m.round));
            assert_eq!(m.date, Some(expected));
        }
    }

    #[test]
    fn test_plan_serializes_with_mode_tag() {
        let plan = plan(&Format::league(1), &teams(2)).unwrap();
        let json = serde_json::to_value(&plan).unwrap();
        assert_eq!(json["mode"], "league");
    }
}
