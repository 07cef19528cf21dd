//! Swiss qualification stage feeding a single-elimination bracket.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::standings::{Standings, rank_teams};
use crate::bracket::elimination::{EliminationBracket, EliminationBuilder};
use crate::schedule::errors::{ScheduleError, ScheduleResult};
use crate::schedule::models::{Match, Participant, TeamRef, validate_team_list};

/// Upper bound on pairing search steps before falling back to forced repeats
const PAIRING_SEARCH_BUDGET: usize = 100_000;

/// One emitted Swiss round
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwissRound {
    /// 0-based Swiss round index, also the global round of its matches
    pub index: u32,
    /// Pairings, higher-ranked team at home; scores are filled in externally
    pub matches: Vec<Match>,
    pub bye: Option<TeamRef>,
}

/// Swiss league matches plus the elimination bracket they qualify for
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwissEliminationOutput {
    pub league_matches: Vec<Match>,
    pub elimination: EliminationBracket,
}

impl SwissEliminationOutput {
    /// Swiss matches followed by elimination matches
    pub fn into_matches(self) -> Vec<Match> {
        let mut matches = self.league_matches;
        matches.extend(self.elimination.matches);
        matches
    }
}

/// Swiss-system generator.
///
/// Rounds are emitted one at a time: pairing round `r` needs the standings and
/// results of rounds `0..r`, which the caller supplies after scoring them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwissEliminationGenerator {
    teams: Vec<TeamRef>,
    swiss_rounds: u32,
    qualifiers: usize,
}

type PairKey = (TeamRef, TeamRef);

fn pair_key(a: &TeamRef, b: &TeamRef) -> PairKey {
    if a <= b {
        (a.clone(), b.clone())
    } else {
        (b.clone(), a.clone())
    }
}

impl SwissEliminationGenerator {
    /// Create a generator for `teams` in seed order.
    ///
    /// A qualifier count above the team count is clamped to it.
    pub fn new(teams: Vec<TeamRef>, swiss_rounds: u32, qualifiers: usize) -> ScheduleResult<Self> {
        validate_team_list(&teams, 2)?;
        if swiss_rounds == 0 {
            return Err(ScheduleError::invalid("swiss stage needs at least 1 round"));
        }
        if qualifiers == 0 {
            return Err(ScheduleError::invalid("swiss stage needs at least 1 qualifier"));
        }

        let clamped = qualifiers.min(teams.len());
        if clamped != qualifiers {
            log::warn!(
                "Clamping swiss qualifiers from {} to team count {}",
                qualifiers,
                clamped
            );
        }

        Ok(Self {
            teams,
            swiss_rounds,
            qualifiers: clamped,
        })
    }

    pub fn teams(&self) -> &[TeamRef] {
        &self.teams
    }

    pub fn swiss_rounds(&self) -> u32 {
        self.swiss_rounds
    }

    /// Teams handed to the elimination stage, `min(Q, N)`
    pub fn qualifiers(&self) -> usize {
        self.qualifiers
    }

    /// Round 0, paired by seed
    pub fn first_round(&self) -> ScheduleResult<SwissRound> {
        self.pair_round(0, &Standings::default(), &[])
    }

    /// Pair Swiss round `round` from the standings after `history`.
    ///
    /// `history` must hold exactly the rounds `0..round` as emitted, with
    /// results recorded. Round 0 accepts an empty standings snapshot.
    pub fn pair_round(
        &self,
        round: u32,
        standings: &Standings,
        history: &[SwissRound],
    ) -> ScheduleResult<SwissRound> {
        if round >= self.swiss_rounds {
            return Err(ScheduleError::invalid(format!(
                "swiss round {round} requested, stage has {} rounds",
                self.swiss_rounds
            )));
        }
        self.check_history(history, round)?;

        let zeroed;
        let standings = if round == 0 && standings.is_empty() {
            zeroed = Standings::zeroed(&self.teams);
            &zeroed
        } else {
            standings
        };

        let results: Vec<Match> = history.iter().flat_map(|r| r.matches.iter().cloned()).collect();
        let mut ranked = rank_teams(&self.teams, standings, &results)?;

        let played: HashSet<PairKey> = results
            .iter()
            .filter_map(|m| Some(pair_key(m.home.team()?, m.away.team()?)))
            .collect();

        let bye = if ranked.len() % 2 == 1 {
            let had_bye: HashSet<&TeamRef> = history.iter().filter_map(|r| r.bye.as_ref()).collect();
            let pick = ranked
                .iter()
                .rposition(|t| !had_bye.contains(t))
                .unwrap_or(ranked.len() - 1);
            Some(ranked.remove(pick))
        } else {
            None
        };

        let pairs = match pair_without_repeats(&ranked, &played) {
            Some(pairs) => pairs,
            None => {
                let pairs = pair_allowing_repeats(&ranked, &played);
                let repeats = pairs
                    .iter()
                    .filter(|(a, b)| played.contains(&pair_key(a, b)))
                    .count();
                log::warn!(
                    "Swiss round {}: no repeat-free pairing exists, {} rematch(es) forced",
                    round,
                    repeats
                );
                pairs
            }
        };

        let matches: Vec<Match> = pairs
            .into_iter()
            .map(|(home, away)| Match::league(round, home, away))
            .collect();

        log::debug!(
            "Paired swiss round {}: {} matches, bye: {:?}",
            round,
            matches.len(),
            bye
        );

        Ok(SwissRound {
            index: round,
            matches,
            bye,
        })
    }

    /// Rank the field after the last Swiss round and build the elimination
    /// bracket from the top qualifiers in standing order.
    pub fn finish(
        &self,
        standings: &Standings,
        history: &[SwissRound],
    ) -> ScheduleResult<SwissEliminationOutput> {
        self.check_history(history, self.swiss_rounds)?;

        let league_matches: Vec<Match> =
            history.iter().flat_map(|r| r.matches.iter().cloned()).collect();
        let ranked = rank_teams(&self.teams, standings, &league_matches)?;

        let seeds: Vec<Participant> = ranked
            .into_iter()
            .take(self.qualifiers)
            .map(Participant::Team)
            .collect();

        let elimination = EliminationBuilder::new(seeds)
            .starting_at_round(self.swiss_rounds)
            .build()?;

        Ok(SwissEliminationOutput {
            league_matches,
            elimination,
        })
    }

    fn check_history(&self, history: &[SwissRound], expected: u32) -> ScheduleResult<()> {
        if history.len() != expected as usize {
            return Err(ScheduleError::invalid(format!(
                "expected {expected} completed swiss round(s), got {}",
                history.len()
            )));
        }
        if let Some((i, r)) = history
            .iter()
            .enumerate()
            .find(|(i, r)| r.index as usize != *i)
        {
            return Err(ScheduleError::invalid(format!(
                "swiss history out of order: position {i} holds round {}",
                r.index
            )));
        }

        let pool: HashSet<&TeamRef> = self.teams.iter().collect();
        for r in history {
            let named = r
                .matches
                .iter()
                .flat_map(|m| [m.home.team(), m.away.team()])
                .flatten()
                .chain(r.bye.as_ref());
            for team in named {
                if !pool.contains(team) {
                    return Err(ScheduleError::invalid(format!(
                        "swiss round {} names {team}, which is not in the stage",
                        r.index
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Pair adjacent ranks without rematches, trying the next-closest rank on
/// conflict and backtracking when a later team is left without an opponent.
fn pair_without_repeats(
    ranked: &[TeamRef],
    played: &HashSet<PairKey>,
) -> Option<Vec<(TeamRef, TeamRef)>> {
    let mut remaining: Vec<usize> = (0..ranked.len()).collect();
    let mut out = Vec::with_capacity(ranked.len() / 2);
    let mut budget = PAIRING_SEARCH_BUDGET;

    if search(&mut remaining, ranked, played, &mut out, &mut budget) {
        Some(
            out.into_iter()
                .map(|(a, b)| (ranked[a].clone(), ranked[b].clone()))
                .collect(),
        )
    } else {
        None
    }
}

fn search(
    remaining: &mut Vec<usize>,
    ranked: &[TeamRef],
    played: &HashSet<PairKey>,
    out: &mut Vec<(usize, usize)>,
    budget: &mut usize,
) -> bool {
    if remaining.is_empty() {
        return true;
    }
    if *budget == 0 {
        return false;
    }
    *budget -= 1;

    let first = remaining.remove(0);
    for k in 0..remaining.len() {
        let candidate = remaining[k];
        if played.contains(&pair_key(&ranked[first], &ranked[candidate])) {
            continue;
        }

        remaining.remove(k);
        out.push((first, candidate));
        if search(remaining, ranked, played, out, budget) {
            return true;
        }
        out.pop();
        remaining.insert(k, candidate);
    }
    remaining.insert(0, first);
    false
}

/// Greedy adjacent pairing that prefers fresh opponents but accepts rematches
fn pair_allowing_repeats(ranked: &[TeamRef], played: &HashSet<PairKey>) -> Vec<(TeamRef, TeamRef)> {
    let mut remaining: Vec<&TeamRef> = ranked.iter().collect();
    let mut pairs = Vec::with_capacity(ranked.len() / 2);

    while remaining.len() >= 2 {
        let first = remaining.remove(0);
        let k = remaining
            .iter()
            .position(|c| !played.contains(&pair_key(first, c)))
            .unwrap_or(0);
        let opponent = remaining.remove(k);
        pairs.push((first.clone(), opponent.clone()));
    }

    pairs
}
