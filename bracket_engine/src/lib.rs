//! # Bracket Engine
//!
//! Scheduling and bracket generation for sports tournaments.
//!
//! Given an ordered list of teams (seed order) and a tournament [`Format`],
//! the engine produces the full set of matches known at creation time plus the
//! bracket structure that tells later rounds who plays whom.
//!
//! ## Formats
//!
//! - **League**: round-robin by the circle method, repeated with home and
//!   away swapped on odd repetitions
//! - **League + playoff**: the league followed by a single-elimination bracket
//!   over the top qualifiers
//! - **Swiss + elimination**: standings-driven Swiss rounds emitted one at a
//!   time, then a single-elimination bracket of the top qualifiers
//! - **Custom playoff**: a fixed six-round structure with a double-chance path
//!   for the top seeds and a re-seeded set of Preliminary Finals
//!
//! ## Core Modules
//!
//! - [`schedule`]: shared models, pairing kernel, round-robin, format config
//! - [`bracket`]: single-elimination and custom playoff brackets
//! - [`swiss`]: standings ranking and Swiss pairing
//! - [`planner`]: dispatches a [`Format`] to the right generator
//!
//! ## Example
//!
//! ```
//! use bracket_engine::{Format, TeamRef, plan};
//!
//! let teams: Vec<TeamRef> = ["A", "B", "C", "D", "E", "F"]
//!     .into_iter()
//!     .map(TeamRef::from)
//!     .collect();
//!
//! let tournament = plan(&Format::league_playoff(1, 4), &teams).unwrap();
//! // 15 league matches, then semifinals and a final between placeholders
//! assert_eq!(tournament.matches().len(), 18);
//! ```

/// Shared models, the pairing kernel and league scheduling.
pub mod schedule;
pub use schedule::{
    BracketPosition, CustomConfig, Format, FormatMode, LeagueBye, LeagueSchedule, Match, MatchId,
    MatchStage, Participant, RoundCalendar, ScheduleError, ScheduleResult, TeamRef,
    generate_round_robin,
};

/// Playoff bracket builders.
pub mod bracket;
pub use bracket::{
    BracketMatch, BracketRound, BracketSlot, CustomPlayoff, EliminationBracket, EliminationBuilder,
    FeedLink, PlayoffBracket, SlotSide, WinnerRoute, build_elimination_bracket,
    generate_custom_playoff,
};

/// Swiss-system qualification.
pub mod swiss;
pub use swiss::{
    Standings, StandingsEntry, SwissEliminationGenerator, SwissEliminationOutput, SwissRound,
    rank_teams,
};

pub mod planner;
pub use planner::{TournamentPlan, plan};
