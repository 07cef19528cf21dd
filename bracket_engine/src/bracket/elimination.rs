//! Single-elimination bracket construction from a seed list.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::models::{
    BracketMatch, BracketRound, BracketSlot, FeedLink, Lane, PlayoffBracket, SlotSide, WinnerRoute,
};
use crate::schedule::calendar::RoundCalendar;
use crate::schedule::errors::{ScheduleError, ScheduleResult};
use crate::schedule::models::{BracketPosition, Match, MatchStage, Participant};
use crate::schedule::pairing::{next_power_of_two, standard_seed_order};

/// A built single-elimination bracket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EliminationBracket {
    pub bracket: PlayoffBracket,
    /// Playable matches in round order; byes are not included
    pub matches: Vec<Match>,
    /// Implicit winner of a one-seed bracket
    pub champion: Option<Participant>,
}

impl EliminationBracket {
    pub fn with_calendar(mut self, calendar: &RoundCalendar) -> Self {
        calendar.apply(&mut self.matches);
        self
    }
}

/// Builder for [`EliminationBracket`]
#[derive(Debug, Clone)]
pub struct EliminationBuilder {
    seeds: Vec<Participant>,
    start_round: u32,
}

impl EliminationBuilder {
    /// Seeds in order, strongest first
    pub fn new(seeds: Vec<Participant>) -> Self {
        Self {
            seeds,
            start_round: 0,
        }
    }

    /// Offset for the global `round` of generated matches
    pub fn starting_at_round(mut self, start_round: u32) -> Self {
        self.start_round = start_round;
        self
    }

    pub fn build(self) -> ScheduleResult<EliminationBracket> {
        let n = self.seeds.len();
        if n == 0 {
            return Err(ScheduleError::invalid("elimination bracket needs at least 1 seed"));
        }

        let mut seen = HashSet::with_capacity(n);
        for seed in &self.seeds {
            if !seen.insert(seed) {
                return Err(ScheduleError::invalid(format!("duplicate seed: {seed}")));
            }
        }

        if n == 1 {
            return Ok(EliminationBracket {
                bracket: PlayoffBracket::default(),
                matches: Vec::new(),
                champion: self.seeds.into_iter().next(),
            });
        }

        let size = next_power_of_two(n);
        let order = standard_seed_order(size)?;
        let total_rounds = size.trailing_zeros();

        let mut bracket = PlayoffBracket::default();
        let mut matches = Vec::with_capacity(n - 1);

        // Round 0: seeds above `n` are phantom and become byes
        let mut round = BracketRound::new(0, round_name(0, total_rounds));
        let mut lanes = Vec::with_capacity(size / 2);
        for (index, pair) in order.chunks(2).enumerate() {
            let position = BracketPosition::new(0, index as u32);
            let home = self.slot_for(pair[0]);
            let away = self.slot_for(pair[1]);

            let (match_id, lane) = match (&home, &away) {
                (BracketSlot::Filled(p), BracketSlot::Bye) | (BracketSlot::Bye, BracketSlot::Filled(p)) => (
                    None,
                    Lane {
                        participant: p.clone(),
                        from: Some(position),
                    },
                ),
                (BracketSlot::Filled(h), BracketSlot::Filled(a)) => {
                    let m = self.playable(0, h.clone(), a.clone());
                    let id = m.id;
                    matches.push(m);
                    (Some(id), Lane::winner_of(position))
                }
                (BracketSlot::Bye, BracketSlot::Bye) => {
                    return Err(ScheduleError::invalid("two byes drawn into one pairing"));
                }
            };

            round.matches.push(BracketMatch {
                position,
                home,
                away,
                match_id,
                winner_to: WinnerRoute::Champion,
                loser_to: None,
            });
            lanes.push(lane);
        }
        bracket.rounds.push(round);

        for round_index in 1..total_rounds {
            let mut round = BracketRound::new(round_index, round_name(round_index, total_rounds));
            let mut next_lanes = Vec::with_capacity(lanes.len() / 2);

            for (index, pair) in lanes.chunks(2).enumerate() {
                let position = BracketPosition::new(round_index, index as u32);
                let (home, away) = (&pair[0], &pair[1]);

                bracket.route_winner(
                    home.from,
                    WinnerRoute::Advance(FeedLink::new(position, SlotSide::Home)),
                );
                bracket.route_winner(
                    away.from,
                    WinnerRoute::Advance(FeedLink::new(position, SlotSide::Away)),
                );

                let m = self.playable(round_index, home.participant.clone(), away.participant.clone());
                round.matches.push(BracketMatch {
                    position,
                    home: home.participant.clone().into(),
                    away: away.participant.clone().into(),
                    match_id: Some(m.id),
                    winner_to: WinnerRoute::Champion,
                    loser_to: None,
                });
                matches.push(m);
                next_lanes.push(Lane::winner_of(position));
            }

            bracket.rounds.push(round);
            lanes = next_lanes;
        }

        log::debug!(
            "Built elimination bracket: {} seeds, {} rounds, {} byes, {} playable matches",
            n,
            total_rounds,
            size - n,
            matches.len()
        );

        Ok(EliminationBracket {
            bracket,
            matches,
            champion: None,
        })
    }

    fn slot_for(&self, seed: u32) -> BracketSlot {
        match self.seeds.get(seed as usize - 1) {
            Some(p) => BracketSlot::Filled(p.clone()),
            None => BracketSlot::Bye,
        }
    }

    fn playable(&self, round_index: u32, home: Participant, away: Participant) -> Match {
        Match::new(
            self.start_round + round_index,
            home,
            away,
            MatchStage::Playoff { round: round_index },
        )
    }
}

/// Build a bracket for `seeds` (strongest first), rounds numbered from 0
pub fn build_elimination_bracket(seeds: &[Participant]) -> ScheduleResult<EliminationBracket> {
    EliminationBuilder::new(seeds.to_vec()).build()
}

/// Name a round by how many entrants it starts with
fn round_name(round_index: u32, total_rounds: u32) -> String {
    let entrants = 1u64 << (total_rounds - round_index);
    match entrants {
        2 => "Final".to_string(),
        4 => "Semifinals".to_string(),
        8 => "Quarterfinals".to_string(),
        n => format!("Round of {n}"),
    }
}
