//! Core scheduling types and league generation.
//!
//! This module provides:
//! - Match, team and placeholder models shared by every generator
//! - The pairing kernel (circle method, bracket seeding, byes)
//! - Round-robin league generation
//! - Format configuration and the scheduling error type
//!
//! ## Example
//!
//! ```
//! use bracket_engine::schedule::{TeamRef, generate_round_robin};
//!
//! let teams: Vec<TeamRef> = ["A", "B", "C", "D"].into_iter().map(TeamRef::from).collect();
//! let league = generate_round_robin(&teams, 2).unwrap();
//!
//! assert_eq!(league.matches.len(), 12);
//! ```

pub mod calendar;
pub mod errors;
pub mod format;
pub mod models;
pub mod pairing;
pub mod round_robin;

pub use calendar::RoundCalendar;
pub use errors::{ScheduleError, ScheduleResult};
pub use format::{CustomConfig, Format, FormatMode};
pub use models::{BracketPosition, Match, MatchId, MatchStage, Participant, TeamRef};
pub use round_robin::{LeagueBye, LeagueSchedule, generate_round_robin};
