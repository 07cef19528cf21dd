//! Playoff brackets.
//!
//! - [`elimination`]: power-of-two single elimination with byes for the top seeds
//! - [`custom_playoff`]: the six-round double-chance playoff
//!
//! Both produce a [`PlayoffBracket`] whose matches declare where their winner
//! (and, on the double-chance path, their loser) goes next.

pub mod custom_playoff;
pub mod elimination;
pub mod models;

pub use custom_playoff::{CustomPlayoff, generate_custom_playoff};
pub use elimination::{EliminationBracket, EliminationBuilder, build_elimination_bracket};
pub use models::{BracketMatch, BracketRound, BracketSlot, FeedLink, PlayoffBracket, SlotSide, WinnerRoute};
