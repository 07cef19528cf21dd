//! Playoff bracket data models.

use serde::{Deserialize, Serialize};

use crate::schedule::models::{BracketPosition, MatchId, Participant};

/// Side of a bracket match a feeder fills
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotSide {
    Home,
    Away,
}

/// Declared destination of a team leaving a bracket match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FeedLink {
    pub to: BracketPosition,
    pub side: SlotSide,
}

impl FeedLink {
    pub fn new(to: BracketPosition, side: SlotSide) -> Self {
        Self { to, side }
    }
}

/// Where the winner of a bracket match goes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "link")]
pub enum WinnerRoute {
    /// Fills a fixed slot in a later round
    Advance(FeedLink),
    /// Joins the pool that is re-seeded by original seed before pairing
    Reseed,
    /// Terminal match
    Champion,
}

/// A position in a bracket round
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "participant")]
pub enum BracketSlot {
    Filled(Participant),
    Bye,
}

impl BracketSlot {
    pub fn participant(&self) -> Option<&Participant> {
        match self {
            BracketSlot::Filled(p) => Some(p),
            BracketSlot::Bye => None,
        }
    }

    pub fn is_bye(&self) -> bool {
        matches!(self, BracketSlot::Bye)
    }
}

impl From<Participant> for BracketSlot {
    fn from(p: Participant) -> Self {
        BracketSlot::Filled(p)
    }
}

/// One pairing in a bracket round
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketMatch {
    pub position: BracketPosition,
    pub home: BracketSlot,
    pub away: BracketSlot,
    /// Playable match backing this pairing; `None` for byes
    pub match_id: Option<MatchId>,
    pub winner_to: WinnerRoute,
    /// Loser's second chance; `None` means the loser is eliminated
    pub loser_to: Option<FeedLink>,
}

impl BracketMatch {
    pub fn is_bye(&self) -> bool {
        self.home.is_bye() || self.away.is_bye()
    }

    /// Participant that advances automatically from a bye pairing
    pub fn bye_recipient(&self) -> Option<&Participant> {
        match (&self.home, &self.away) {
            (BracketSlot::Filled(p), BracketSlot::Bye) | (BracketSlot::Bye, BracketSlot::Filled(p)) => {
                Some(p)
            }
            _ => None,
        }
    }
}

/// Entrant carried into a later round: its slot content and the pairing it came from
#[derive(Debug, Clone)]
pub(crate) struct Lane {
    pub participant: Participant,
    pub from: Option<BracketPosition>,
}

impl Lane {
    /// An entrant that has not come through an earlier pairing
    pub fn fresh(participant: Participant) -> Self {
        Self {
            participant,
            from: None,
        }
    }

    /// Winner of the pairing at `position`
    pub fn winner_of(position: BracketPosition) -> Self {
        Self {
            participant: Participant::WinnerOf(position),
            from: Some(position),
        }
    }
}

/// A round of a playoff bracket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketRound {
    pub index: u32,
    pub name: String,
    pub matches: Vec<BracketMatch>,
}

impl BracketRound {
    pub fn new(index: u32, name: impl Into<String>) -> Self {
        Self {
            index,
            name: name.into(),
            matches: Vec::new(),
        }
    }

    pub fn playable(&self) -> impl Iterator<Item = &BracketMatch> {
        self.matches.iter().filter(|m| !m.is_bye())
    }

    pub fn byes(&self) -> impl Iterator<Item = &BracketMatch> {
        self.matches.iter().filter(|m| m.is_bye())
    }
}

/// Ordered rounds with round-to-round feed links
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayoffBracket {
    pub rounds: Vec<BracketRound>,
}

impl PlayoffBracket {
    pub fn round_count(&self) -> usize {
        self.rounds.len()
    }

    pub fn round(&self, index: u32) -> Option<&BracketRound> {
        self.rounds.iter().find(|r| r.index == index)
    }

    pub fn find(&self, position: BracketPosition) -> Option<&BracketMatch> {
        self.round(position.round)?
            .matches
            .get(position.index as usize)
    }

    pub(crate) fn find_mut(&mut self, position: BracketPosition) -> Option<&mut BracketMatch> {
        self.rounds
            .iter_mut()
            .find(|r| r.index == position.round)?
            .matches
            .get_mut(position.index as usize)
    }

    /// Point the winner of the match at `from` to `route`; no-op for `None`
    pub(crate) fn route_winner(&mut self, from: Option<BracketPosition>, route: WinnerRoute) {
        if let Some(m) = from.and_then(|pos| self.find_mut(pos)) {
            m.winner_to = route;
        }
    }

    /// Count of pairings that need a result
    pub fn playable_count(&self) -> usize {
        self.rounds.iter().map(|r| r.playable().count()).sum()
    }

    pub fn bye_count(&self) -> usize {
        self.rounds.iter().map(|r| r.byes().count()).sum()
    }

    /// Bracket matches whose winner or loser feeds `position`
    pub fn feeders_of(&self, position: BracketPosition) -> Vec<&BracketMatch> {
        self.rounds
            .iter()
            .flat_map(|r| r.matches.iter())
            .filter(|m| {
                matches!(m.winner_to, WinnerRoute::Advance(link) if link.to == position)
                    || matches!(m.loser_to, Some(link) if link.to == position)
            })
            .collect()
    }

    /// The terminal match, if the bracket has one
    pub fn final_match(&self) -> Option<&BracketMatch> {
        self.rounds
            .iter()
            .flat_map(|r| r.matches.iter())
            .find(|m| m.winner_to == WinnerRoute::Champion)
    }
}
