//! Fixed six-round playoff with a double-chance path for the top seeds.
//!
//! The qualifying group (seeds below the top seeds) is cut down on a minor
//! path until `4 - T/2` teams are left for the elimination ladder, where they
//! meet the losers of the major semifinals. The four survivors are re-seeded
//! by original seed for the Preliminary Finals, whose winners meet in the
//! Grand Final.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::models::{
    BracketMatch, BracketRound, BracketSlot, FeedLink, Lane, PlayoffBracket, SlotSide, WinnerRoute,
};
use crate::schedule::calendar::RoundCalendar;
use crate::schedule::errors::{ScheduleError, ScheduleResult};
use crate::schedule::format::CustomConfig;
use crate::schedule::models::{
    BracketPosition, Match, MatchStage, Participant, TeamRef, validate_team_list,
};
use crate::schedule::pairing::fold_pairs;

/// Number of rounds in the custom playoff
pub const CUSTOM_PLAYOFF_ROUNDS: u32 = 6;

/// Teams entering the Preliminary Finals
pub const PRELIMINARY_FINALISTS: usize = 4;

pub const QUALIFYING_ROUND: u32 = 1;
pub const SEMIFINAL_ROUND: u32 = 2;
pub const LADDER_FIRST_ROUND: u32 = 3;
pub const LADDER_SECOND_ROUND: u32 = 4;
pub const PRELIMINARY_FINALS_ROUND: u32 = 5;
pub const GRAND_FINAL_ROUND: u32 = 6;

const ROUND_NAMES: [&str; CUSTOM_PLAYOFF_ROUNDS as usize] = [
    "Qualifying Round",
    "Major & Minor Semifinals",
    "Elimination Ladder I",
    "Elimination Ladder II",
    "Preliminary Finals",
    "Grand Final",
];

fn round_name(round: u32) -> &'static str {
    ROUND_NAMES
        .get(round.saturating_sub(1) as usize)
        .copied()
        .unwrap_or("Playoff Round")
}

/// A generated custom playoff
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomPlayoff {
    /// Rounds 1 to 6; a round with nothing to reduce has no matches
    pub bracket: PlayoffBracket,
    /// Playable matches in round order
    pub matches: Vec<Match>,
    /// Field in seed order
    pub seeds: Vec<TeamRef>,
    /// Placeholders for the teams entering the re-seeding pool
    pub preliminary_pool: Vec<Participant>,
}

impl CustomPlayoff {
    pub fn with_calendar(mut self, calendar: &RoundCalendar) -> Self {
        calendar.apply(&mut self.matches);
        self
    }

    /// Seeds on the double-chance path, two per major semifinal
    pub fn top_seed_count(&self) -> usize {
        self.bracket
            .round(SEMIFINAL_ROUND)
            .map_or(0, |r| r.matches.iter().filter(|m| m.loser_to.is_some()).count() * 2)
    }

    /// 1-based original seed of `team`
    pub fn seed_of(&self, team: &TeamRef) -> Option<u32> {
        self.seeds
            .iter()
            .position(|t| t == team)
            .map(|i| i as u32 + 1)
    }

    /// Resolve the Preliminary Finals for the four teams left in the pool.
    ///
    /// Survivors are ordered by original seed and paired best against worst,
    /// second against third. The returned matches keep the ids generated for
    /// the Round 5 slots.
    pub fn resolve_preliminary_finals(&self, survivors: &[TeamRef]) -> ScheduleResult<Vec<Match>> {
        if survivors.len() != PRELIMINARY_FINALISTS {
            return Err(ScheduleError::invalid(format!(
                "preliminary finals need {PRELIMINARY_FINALISTS} survivors, got {}",
                survivors.len()
            )));
        }

        let mut seen = HashSet::with_capacity(survivors.len());
        let mut ranked = Vec::with_capacity(survivors.len());
        for team in survivors {
            let seed = self
                .seed_of(team)
                .ok_or_else(|| ScheduleError::invalid(format!("{team} is not in this playoff")))?;
            if !seen.insert(team) {
                return Err(ScheduleError::invalid(format!("{team} listed twice among survivors")));
            }
            ranked.push((seed, team));
        }
        ranked.sort_by_key(|(seed, _)| *seed);

        let round = self
            .bracket
            .round(PRELIMINARY_FINALS_ROUND)
            .ok_or_else(|| ScheduleError::invalid("bracket has no preliminary finals"))?;

        let mut resolved = Vec::with_capacity(round.matches.len());
        for (slot, (home, away)) in round.matches.iter().zip(fold_pairs(&ranked)) {
            let scheduled = slot
                .match_id
                .and_then(|id| self.matches.iter().find(|m| m.id == id))
                .ok_or_else(|| {
                    ScheduleError::invalid(format!("no match scheduled for {}", slot.position))
                })?;

            let mut m = scheduled.clone();
            m.home = Participant::Team(home.1.clone());
            m.away = Participant::Team(away.1.clone());
            resolved.push(m);
        }

        log::debug!(
            "Re-seeded preliminary finals: {}",
            resolved
                .iter()
                .map(|m| format!("{} v {}", m.home, m.away))
                .collect::<Vec<_>>()
                .join(", ")
        );

        Ok(resolved)
    }
}

/// Rounds under construction
struct Assembly {
    bracket: PlayoffBracket,
    current: BracketRound,
    matches: Vec<Match>,
}

impl Assembly {
    fn new() -> Self {
        Self {
            bracket: PlayoffBracket::default(),
            current: BracketRound::new(QUALIFYING_ROUND, round_name(QUALIFYING_ROUND)),
            matches: Vec::new(),
        }
    }

    fn open_round(&mut self, round: u32) {
        let done = std::mem::replace(&mut self.current, BracketRound::new(round, round_name(round)));
        self.bracket.rounds.push(done);
    }

    fn next_position(&self) -> BracketPosition {
        BracketPosition::new(self.current.index, self.current.matches.len() as u32)
    }

    /// Add a playable pairing to the current round and return its winner
    fn pairing(
        &mut self,
        home: &Lane,
        away: &Lane,
        winner_to: WinnerRoute,
        loser_to: Option<FeedLink>,
    ) -> Lane {
        let position = self.next_position();
        self.bracket.route_winner(
            home.from,
            WinnerRoute::Advance(FeedLink::new(position, SlotSide::Home)),
        );
        self.bracket.route_winner(
            away.from,
            WinnerRoute::Advance(FeedLink::new(position, SlotSide::Away)),
        );

        let round = self.current.index;
        let m = Match::new(
            round - 1,
            home.participant.clone(),
            away.participant.clone(),
            MatchStage::Playoff { round },
        );
        self.current.matches.push(BracketMatch {
            position,
            home: home.participant.clone().into(),
            away: away.participant.clone().into(),
            match_id: Some(m.id),
            winner_to,
            loser_to,
        });
        self.matches.push(m);

        Lane::winner_of(position)
    }

    /// Record an automatic win for `lane` in the current round
    fn bye(&mut self, lane: &Lane) -> Lane {
        let position = self.next_position();
        self.current.matches.push(BracketMatch {
            position,
            home: lane.participant.clone().into(),
            away: BracketSlot::Bye,
            match_id: None,
            winner_to: WinnerRoute::Reseed,
            loser_to: None,
        });
        Lane {
            participant: lane.participant.clone(),
            from: Some(position),
        }
    }

    /// Play `matches` eliminations among `lanes` (strongest first). The
    /// strongest lanes sit out; the rest are paired best against worst.
    fn reduce(&mut self, lanes: Vec<Lane>, matches: usize) -> ScheduleResult<Vec<Lane>> {
        let idle = lanes.len().checked_sub(2 * matches).ok_or_else(|| {
            ScheduleError::invalid(format!(
                "cannot play {matches} eliminations among {} teams",
                lanes.len()
            ))
        })?;

        let mut next: Vec<Lane> = lanes[..idle].to_vec();
        for (home, away) in fold_pairs(&lanes[idle..]) {
            let winner = self.pairing(&home, &away, WinnerRoute::Reseed, None);
            next.push(winner);
        }
        Ok(next)
    }

    fn finish(mut self) -> (PlayoffBracket, Vec<Match>) {
        let last = std::mem::replace(&mut self.current, BracketRound::new(0, ""));
        self.bracket.rounds.push(last);
        (self.bracket, self.matches)
    }
}

/// Build the custom playoff for `teams` in seed order
pub fn generate_custom_playoff(teams: &[TeamRef], config: CustomConfig) -> ScheduleResult<CustomPlayoff> {
    config.validate()?;
    validate_team_list(teams, 2)?;
    if teams.len() != config.field_size {
        return Err(ScheduleError::invalid(format!(
            "custom playoff field size is {}, got {} teams",
            config.field_size,
            teams.len()
        )));
    }

    let top = config.top_seed_count;
    let major_semis = top / 2;
    let ladder_size = PRELIMINARY_FINALISTS - major_semis;
    let seed = |index: usize| Lane::fresh(Participant::Team(teams[index].clone()));

    let mut assembly = Assembly::new();

    // Round 1: qualifying group, lowest seed takes the bye when the group is odd
    let group: Vec<Lane> = (top..teams.len()).map(seed).collect();
    let (playing, bye) = if group.len() % 2 == 1 {
        (&group[..group.len() - 1], group.last())
    } else {
        (&group[..], None)
    };
    let mut minor: Vec<Lane> = Vec::with_capacity(group.len().div_ceil(2));
    for (home, away) in fold_pairs(playing) {
        let winner = assembly.pairing(&home, &away, WinnerRoute::Reseed, None);
        minor.push(winner);
    }
    if let Some(lane) = bye {
        let through = assembly.bye(lane);
        minor.push(through);
    }

    let reductions = minor.len().checked_sub(ladder_size).ok_or_else(|| {
        ScheduleError::invalid(format!(
            "{} qualifiers cannot fill {ladder_size} ladder places",
            minor.len()
        ))
    })?;
    let semifinal_reductions = reductions.div_ceil(2);
    let ladder_reductions = reductions - semifinal_reductions;

    // Round 2: major semifinals 1 v T, 2 v T-1; losers drop to Round 4
    assembly.open_round(SEMIFINAL_ROUND);
    let mut pool: Vec<Participant> = Vec::with_capacity(PRELIMINARY_FINALISTS);
    let mut major_losers = Vec::with_capacity(major_semis);
    for i in 0..major_semis {
        let second_chance = FeedLink::new(
            BracketPosition::new(LADDER_SECOND_ROUND, i as u32),
            SlotSide::Home,
        );
        let winner = assembly.pairing(
            &seed(i),
            &seed(top - 1 - i),
            WinnerRoute::Reseed,
            Some(second_chance),
        );
        if let Some(from) = winner.from {
            major_losers.push(Lane::fresh(Participant::LoserOf(from)));
        }
        pool.push(winner.participant);
    }
    let minor = assembly.reduce(minor, semifinal_reductions)?;

    // Round 3
    assembly.open_round(LADDER_FIRST_ROUND);
    let minor = assembly.reduce(minor, ladder_reductions)?;

    // Round 4: strongest major loser meets the weakest ladder survivor
    assembly.open_round(LADDER_SECOND_ROUND);
    let (through, contenders) = minor.split_at(minor.len().saturating_sub(major_losers.len()));
    for (loser, survivor) in major_losers.iter().zip(contenders.iter().rev()) {
        let winner = assembly.pairing(loser, survivor, WinnerRoute::Reseed, None);
        pool.push(winner.participant);
    }
    for lane in through {
        assembly.bracket.route_winner(lane.from, WinnerRoute::Reseed);
        pool.push(lane.participant.clone());
    }

    if pool.len() != PRELIMINARY_FINALISTS {
        return Err(ScheduleError::invalid(format!(
            "re-seeding pool holds {} teams, expected {PRELIMINARY_FINALISTS}",
            pool.len()
        )));
    }

    // Round 5: re-seeded 1 v 4, 2 v 3
    assembly.open_round(PRELIMINARY_FINALS_ROUND);
    let reseeded: Vec<Lane> = (1..=PRELIMINARY_FINALISTS as u32)
        .map(|rank| Lane::fresh(Participant::Reseeded(rank)))
        .collect();
    let mut finalists = Vec::with_capacity(2);
    for (home, away) in fold_pairs(&reseeded) {
        finalists.push(assembly.pairing(&home, &away, WinnerRoute::Champion, None));
    }

    // Round 6
    assembly.open_round(GRAND_FINAL_ROUND);
    if let [home, away] = finalists.as_slice() {
        assembly.pairing(home, away, WinnerRoute::Champion, None);
    }

    let (bracket, matches) = assembly.finish();

    log::debug!(
        "Built custom playoff: {} teams, {} top seeds, {} byes, {} playable matches",
        teams.len(),
        top,
        bracket.bye_count(),
        matches.len()
    );

    Ok(CustomPlayoff {
        bracket,
        matches,
        seeds: teams.to_vec(),
        preliminary_pool: pool,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn teams(n: usize) -> Vec<TeamRef> {
        (1..=n).map(|i| TeamRef::new(format!("s{i}"))).collect()
    }

    fn team(i: usize) -> Participant {
        Participant::Team(TeamRef::new(format!("s{i}")))
    }

    fn pos(round: u32, index: u32) -> BracketPosition {
        BracketPosition::new(round, index)
    }

    fn playable_per_round(playoff: &CustomPlayoff) -> Vec<usize> {
        playoff
            .bracket
            .rounds
            .iter()
            .map(|r| r.playable().count())
            .collect()
    }

    #[test]
    fn test_field_of_eight() {
        let playoff = generate_custom_playoff(&teams(8), CustomConfig::new(8)).unwrap();

        assert_eq!(playoff.bracket.round_count(), 6);
        assert_eq!(round_names(&playoff)[0], "Qualifying Round");
        assert_eq!(round_names(&playoff)[5], "Grand Final");
        assert_eq!(playable_per_round(&playoff), vec![2, 2, 0, 2, 2, 1]);
        assert_eq!(playoff.bracket.bye_count(), 0);
        assert_eq!(playoff.matches.len(), 9);

        let r1 = &playoff.bracket.rounds[0];
        assert_eq!(r1.matches[0].home, team(5).into());
        assert_eq!(r1.matches[0].away, team(8).into());
        assert_eq!(r1.matches[1].home, team(6).into());
        assert_eq!(r1.matches[1].away, team(7).into());
    }

    fn round_names(playoff: &CustomPlayoff) -> Vec<&str> {
        playoff.bracket.rounds.iter().map(|r| r.name.as_str()).collect()
    }

    #[test]
    fn test_major_semifinals_and_double_chance() {
        let playoff = generate_custom_playoff(&teams(8), CustomConfig::new(8)).unwrap();
        let semis = playoff.bracket.round(SEMIFINAL_ROUND).unwrap();

        assert_eq!(semis.matches[0].home, team(1).into());
        assert_eq!(semis.matches[0].away, team(4).into());
        assert_eq!(semis.matches[1].home, team(2).into());
        assert_eq!(semis.matches[1].away, team(3).into());

        for (i, m) in semis.matches.iter().enumerate() {
            assert_eq!(m.winner_to, WinnerRoute::Reseed);
            assert_eq!(
                m.loser_to,
                Some(FeedLink::new(pos(4, i as u32), SlotSide::Home))
            );
        }

        let ladder = playoff.bracket.round(LADDER_SECOND_ROUND).unwrap();
        assert_eq!(ladder.matches[0].home, Participant::LoserOf(pos(2, 0)).into());
        assert_eq!(ladder.matches[0].away, Participant::WinnerOf(pos(1, 1)).into());
        assert_eq!(ladder.matches[1].home, Participant::LoserOf(pos(2, 1)).into());
        assert_eq!(ladder.matches[1].away, Participant::WinnerOf(pos(1, 0)).into());
    }

    #[test]
    fn test_field_of_nine_has_one_bye() {
        let playoff = generate_custom_playoff(&teams(9), CustomConfig::new(9)).unwrap();

        assert_eq!(playoff.bracket.round_count(), 6);
        assert_eq!(playoff.bracket.bye_count(), 1);

        let bye = playoff.bracket.rounds[0].byes().next().unwrap();
        assert_eq!(bye.bye_recipient(), Some(&team(9)));
        assert_eq!(
            bye.winner_to,
            WinnerRoute::Advance(FeedLink::new(pos(2, 2), SlotSide::Away))
        );

        assert_eq!(playable_per_round(&playoff), vec![2, 3, 0, 2, 2, 1]);
        assert_eq!(playoff.bracket.final_match().unwrap().position, pos(6, 0));
    }

    #[test]
    fn test_reseeded_preliminary_finals() {
        let playoff = generate_custom_playoff(&teams(10), CustomConfig::new(10)).unwrap();
        let prelim = playoff.bracket.round(PRELIMINARY_FINALS_ROUND).unwrap();

        assert_eq!(prelim.matches[0].home, Participant::Reseeded(1).into());
        assert_eq!(prelim.matches[0].away, Participant::Reseeded(4).into());
        assert_eq!(prelim.matches[1].home, Participant::Reseeded(2).into());
        assert_eq!(prelim.matches[1].away, Participant::Reseeded(3).into());
        assert_eq!(playoff.preliminary_pool.len(), 4);

        let grand_final = playoff.bracket.round(GRAND_FINAL_ROUND).unwrap();
        assert_eq!(grand_final.matches[0].winner_to, WinnerRoute::Champion);
        assert_eq!(
            prelim.matches[1].winner_to,
            WinnerRoute::Advance(FeedLink::new(pos(6, 0), SlotSide::Away))
        );
    }

    #[test]
    fn test_resolve_preliminary_finals() {
        let field = teams(12);
        let playoff = generate_custom_playoff(&field, CustomConfig::new(12)).unwrap();
        let survivors = vec![field[6].clone(), field[1].clone(), field[9].clone(), field[0].clone()];

        let resolved = playoff.resolve_preliminary_finals(&survivors).unwrap();
        assert_eq!(resolved.len(), 2);
        assert_eq!(resolved[0].home, team(1));
        assert_eq!(resolved[0].away, team(10));
        assert_eq!(resolved[1].home, team(2));
        assert_eq!(resolved[1].away, team(7));

        let prelim = playoff.bracket.round(PRELIMINARY_FINALS_ROUND).unwrap();
        assert_eq!(Some(resolved[0].id), prelim.matches[0].match_id);
        assert_eq!(resolved[0].round, 4);
        assert_eq!(resolved[0].playoff_round(), Some(5));
    }

    #[test]
    fn test_resolve_rejects_bad_survivors() {
        let field = teams(8);
        let playoff = generate_custom_playoff(&field, CustomConfig::new(8)).unwrap();

        let dupes = vec![field[0].clone(), field[0].clone(), field[1].clone(), field[2].clone()];
        assert!(playoff.resolve_preliminary_finals(&dupes).is_err());

        let stranger = vec![field[0].clone(), field[1].clone(), field[2].clone(), TeamRef::from("x")];
        assert!(playoff.resolve_preliminary_finals(&stranger).is_err());

        assert!(playoff.resolve_preliminary_finals(&field[..3]).is_err());
    }

    #[test]
    fn test_two_top_seeds() {
        let playoff =
            generate_custom_playoff(&teams(8), CustomConfig::new(8).with_top_seeds(2)).unwrap();

        assert_eq!(playoff.top_seed_count(), 2);
        assert_eq!(playable_per_round(&playoff), vec![3, 1, 0, 1, 2, 1]);
        // two ladder survivors skip Round 4 and go straight to the pool
        assert_eq!(playoff.preliminary_pool.len(), 4);
        assert_eq!(playoff.preliminary_pool[0], Participant::WinnerOf(pos(2, 0)));
    }

    #[test]
    fn test_sixteen_spreads_reductions() {
        let playoff = generate_custom_playoff(&teams(16), CustomConfig::new(16)).unwrap();
        assert_eq!(playable_per_round(&playoff), vec![6, 4, 2, 2, 2, 1]);
        assert_eq!(playoff.matches.len(), 17);
    }

    #[test]
    fn test_global_round_and_stage() {
        let playoff = generate_custom_playoff(&teams(9), CustomConfig::new(9)).unwrap();
        for m in &playoff.matches {
            let stage = m.playoff_round().unwrap();
            assert!((1..=6).contains(&stage));
            assert_eq!(m.round, stage - 1);
        }
    }

    #[test]
    fn test_invalid_configs() {
        assert!(matches!(
            generate_custom_playoff(&teams(11), CustomConfig::new(11)),
            Err(ScheduleError::UnsupportedFieldSize { field_size: 11 })
        ));
        assert!(matches!(
            generate_custom_playoff(&teams(8), CustomConfig::new(9)),
            Err(ScheduleError::InvalidInput(_))
        ));
        assert!(matches!(
            generate_custom_playoff(&teams(9), CustomConfig::new(9).without_bye()),
            Err(ScheduleError::InvalidInput(_))
        ));
    }
}
