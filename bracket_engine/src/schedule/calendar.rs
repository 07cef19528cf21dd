//! Calendar dates for generated rounds.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use super::models::Match;

/// Spacing of rounds on the calendar, applied once at creation time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundCalendar {
    /// Date of round 0
    pub start: NaiveDate,
    /// Days between consecutive rounds (0 puts every round on `start`)
    pub days_between_rounds: u32,
}

impl RoundCalendar {
    pub fn new(start: NaiveDate, days_between_rounds: u32) -> Self {
        Self {
            start,
            days_between_rounds,
        }
    }

    /// Weekly rounds starting at `start`
    pub fn weekly(start: NaiveDate) -> Self {
        Self::new(start, 7)
    }

    /// Date of a global round, saturating at the last representable date
    pub fn date_for_round(&self, round: u32) -> NaiveDate {
        let offset = u64::from(round) * u64::from(self.days_between_rounds);
        self.start
            .checked_add_days(Days::new(offset))
            .unwrap_or(NaiveDate::MAX)
    }

    /// Stamp every match with its round's date
    pub fn apply(&self, matches: &mut [Match]) {
        for m in matches {
            m.date = Some(self.date_for_round(m.round));
        }
    }
}
