//! Swiss-system qualification.
//!
//! Rounds are paired one at a time from the standings after the previous
//! round; after the last round the top qualifiers are seeded into a
//! single-elimination bracket.

pub mod generator;
pub mod standings;

pub use generator::{SwissEliminationGenerator, SwissEliminationOutput, SwissRound};
pub use standings::{Standings, StandingsEntry, rank_teams};
