//! Scheduling error types.

use super::models::TeamRef;
use thiserror::Error;

/// Errors returned by every generator in the engine
#[derive(Debug, Error)]
pub enum ScheduleError {
    /// Team list, seed list or configuration cannot produce a schedule
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Custom playoff requested for a field size it has no structure for
    #[error("Unsupported field size: {field_size} (supported: 8, 9, 10, 12, 16)")]
    UnsupportedFieldSize { field_size: usize },

    /// Standings snapshot does not cover every active team
    #[error("Inconsistent standings: no entry for team {team}")]
    InconsistentStandings { team: TeamRef },

    /// Format could not be decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ScheduleError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        ScheduleError::InvalidInput(reason.into())
    }
}

/// Result type for scheduling operations
pub type ScheduleResult<T> = Result<T, ScheduleError>;
