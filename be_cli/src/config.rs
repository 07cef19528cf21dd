//! CLI configuration management.
//!
//! Consolidates all environment variable reads and provides validated configuration.

use bracket_engine::{CustomConfig, Format, FormatMode, RoundCalendar, TeamRef};
use chrono::NaiveDate;
use std::path::{Path, PathBuf};

/// Date format accepted for `--start-date` / `BE_START_DATE`
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Values given on the command line; each one wins over its environment variable
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub mode: Option<String>,
    pub rounds: Option<u32>,
    pub qualifiers: Option<usize>,
    pub top_seeds: Option<usize>,
    pub no_bye: bool,
    pub start_date: Option<String>,
    pub days_between_rounds: Option<u32>,
    /// JSON `Format`; replaces every format flag and variable
    pub format_file: Option<PathBuf>,
}

/// Complete CLI configuration
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Tournament format
    pub format: Format,
    /// Round dates, when a start date was given
    pub calendar: Option<RoundCalendar>,
}

impl CliConfig {
    /// Load configuration from overrides and environment variables
    ///
    /// `team_count` sizes the custom playoff field when the format is built
    /// from flags.
    ///
    /// # Errors
    ///
    /// Returns error if required variables are missing or invalid
    pub fn from_env(overrides: CliOverrides, team_count: usize) -> Result<Self, ConfigError> {
        let format = match &overrides.format_file {
            Some(path) => load_format_file(path)?,
            None => format_from_env(&overrides, team_count)?,
        };

        let start_date = overrides
            .start_date
            .clone()
            .or_else(|| std::env::var("BE_START_DATE").ok());

        let calendar = match start_date {
            Some(raw) => {
                let start = NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).map_err(|e| {
                    ConfigError::Invalid {
                        var: "BE_START_DATE".to_string(),
                        reason: format!("expected YYYY-MM-DD, got {raw:?}: {e}"),
                    }
                })?;
                let days = overrides
                    .days_between_rounds
                    .unwrap_or_else(|| parse_env_or("BE_DAYS_BETWEEN_ROUNDS", 7));
                Some(RoundCalendar::new(start, days))
            }
            None => None,
        };

        Ok(CliConfig { format, calendar })
    }

    /// Validate configuration against the team list
    pub fn validate(&self, team_count: usize) -> Result<(), ConfigError> {
        self.format
            .validate(team_count)
            .map_err(|e| ConfigError::Invalid {
                var: "format".to_string(),
                reason: e.to_string(),
            })
    }
}

fn load_format_file(path: &Path) -> Result<Format, ConfigError> {
    let invalid = |reason: String| ConfigError::Invalid {
        var: "--format-file".to_string(),
        reason,
    };

    let raw = std::fs::read_to_string(path)
        .map_err(|e| invalid(format!("cannot read {}: {e}", path.display())))?;
    Format::from_json(&raw).map_err(|e| invalid(e.to_string()))
}

fn format_from_env(overrides: &CliOverrides, team_count: usize) -> Result<Format, ConfigError> {
    let raw_mode = overrides
        .mode
        .clone()
        .or_else(|| std::env::var("BE_MODE").ok())
        .ok_or_else(|| ConfigError::MissingRequired {
            var: "BE_MODE".to_string(),
            hint: "Pass --mode or set BE_MODE to league, league_playoff, swiss_elimination or custom_playoff"
                .to_string(),
        })?;

    let mode: FormatMode = raw_mode.parse().map_err(|_| ConfigError::Invalid {
        var: "BE_MODE".to_string(),
        reason: format!("unknown mode {raw_mode:?}"),
    })?;

    let rounds = overrides
        .rounds
        .unwrap_or_else(|| parse_env_or("BE_ROUNDS", 1));
    let qualifiers = overrides
        .qualifiers
        .or_else(|| std::env::var("BE_QUALIFIERS").ok().and_then(|v| v.parse().ok()));

    let format = match mode {
        FormatMode::League => Format::league(rounds),
        FormatMode::LeaguePlayoff => {
            let qualifiers = qualifiers.ok_or_else(|| ConfigError::MissingRequired {
                var: "BE_QUALIFIERS".to_string(),
                hint: "league_playoff needs --qualifiers N".to_string(),
            })?;
            Format::league_playoff(rounds, qualifiers)
        }
        FormatMode::SwissElimination => {
            Format::swiss_elimination(rounds, qualifiers.unwrap_or(team_count))
        }
        FormatMode::CustomPlayoff => {
            let top_seeds = overrides
                .top_seeds
                .unwrap_or_else(|| parse_env_or("BE_TOP_SEEDS", 4));
            let enable_bye = !overrides.no_bye && parse_env_or("BE_ENABLE_BYE", true);

            let mut config = CustomConfig::new(team_count).with_top_seeds(top_seeds);
            if !enable_bye {
                config = config.without_bye();
            }
            Format::custom_playoff(config)
        }
    };

    Ok(format)
}

/// Team ids from a comma list or a file with one id per line.
///
/// Blank entries and `#` comment lines are skipped; order is seed order.
pub fn parse_team_list(raw: &str) -> Vec<TeamRef> {
    raw.split([',', '\n'])
        .map(str::trim)
        .filter(|id| !id.is_empty() && !id.starts_with('#'))
        .map(TeamRef::from)
        .collect()
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required configuration: {var}\nHint: {hint}")]
    MissingRequired { var: String, hint: String },

    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },
}

/// Helper to parse environment variable with default fallback
fn parse_env_or<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
