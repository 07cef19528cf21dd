//! Tournament format configuration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::errors::{ScheduleError, ScheduleResult};

/// Field sizes the custom playoff has a structure for
pub const SUPPORTED_FIELD_SIZES: [usize; 5] = [8, 9, 10, 12, 16];

/// Top-seed counts the custom playoff supports
pub const SUPPORTED_TOP_SEED_COUNTS: [usize; 2] = [2, 4];

/// Default number of double-chance seeds
pub const DEFAULT_TOP_SEED_COUNT: usize = 4;

/// Which generator a tournament uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormatMode {
    League,
    LeaguePlayoff,
    SwissElimination,
    CustomPlayoff,
}

impl fmt::Display for FormatMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatMode::League => write!(f, "league"),
            FormatMode::LeaguePlayoff => write!(f, "league_playoff"),
            FormatMode::SwissElimination => write!(f, "swiss_elimination"),
            FormatMode::CustomPlayoff => write!(f, "custom_playoff"),
        }
    }
}

impl FromStr for FormatMode {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "league" => Ok(FormatMode::League),
            "league_playoff" => Ok(FormatMode::LeaguePlayoff),
            "swiss_elimination" | "swiss" => Ok(FormatMode::SwissElimination),
            "custom_playoff" | "custom" => Ok(FormatMode::CustomPlayoff),
            other => Err(ScheduleError::invalid(format!("unknown format mode: {other}"))),
        }
    }
}

/// Custom playoff settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomConfig {
    /// Number of teams in the playoff
    pub field_size: usize,
    /// Seeds with a double-chance path (default: 4)
    #[serde(default = "default_top_seed_count")]
    pub top_seed_count: usize,
    /// Allow a Round 1 bye when the non-top-seed group is odd (default: true)
    #[serde(default = "default_enable_bye")]
    pub enable_bye: bool,
}

fn default_top_seed_count() -> usize {
    DEFAULT_TOP_SEED_COUNT
}

fn default_enable_bye() -> bool {
    true
}

impl CustomConfig {
    pub fn new(field_size: usize) -> Self {
        Self {
            field_size,
            top_seed_count: DEFAULT_TOP_SEED_COUNT,
            enable_bye: true,
        }
    }

    pub fn with_top_seeds(mut self, top_seed_count: usize) -> Self {
        self.top_seed_count = top_seed_count;
        self
    }

    pub fn without_bye(mut self) -> Self {
        self.enable_bye = false;
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> ScheduleResult<()> {
        if !SUPPORTED_FIELD_SIZES.contains(&self.field_size) {
            return Err(ScheduleError::UnsupportedFieldSize {
                field_size: self.field_size,
            });
        }

        if !SUPPORTED_TOP_SEED_COUNTS.contains(&self.top_seed_count) {
            return Err(ScheduleError::invalid(format!(
                "top seed count must be 2 or 4, got {}",
                self.top_seed_count
            )));
        }

        let qualifying_group = self.field_size - self.top_seed_count;
        if qualifying_group % 2 == 1 && !self.enable_bye {
            return Err(ScheduleError::invalid(format!(
                "field of {} leaves {} qualifying teams; an odd group needs the bye lane",
                self.field_size, qualifying_group
            )));
        }

        Ok(())
    }
}

/// Tournament format, immutable once a tournament is created
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Format {
    /// League repetitions, or Swiss round count for `swiss_elimination`
    pub rounds: u32,
    pub mode: FormatMode,
    /// Teams advancing to the elimination stage
    #[serde(default)]
    pub playoff_qualifiers: Option<usize>,
    #[serde(default)]
    pub custom_config: Option<CustomConfig>,
}

impl Format {
    /// Single round-robin league
    pub fn league(rounds: u32) -> Self {
        Self {
            rounds,
            mode: FormatMode::League,
            playoff_qualifiers: None,
            custom_config: None,
        }
    }

    /// League followed by an elimination bracket of the top `qualifiers`
    pub fn league_playoff(rounds: u32, qualifiers: usize) -> Self {
        Self {
            rounds,
            mode: FormatMode::LeaguePlayoff,
            playoff_qualifiers: Some(qualifiers),
            custom_config: None,
        }
    }

    /// Swiss stage of `rounds` rounds feeding an elimination bracket
    pub fn swiss_elimination(rounds: u32, qualifiers: usize) -> Self {
        Self {
            rounds,
            mode: FormatMode::SwissElimination,
            playoff_qualifiers: Some(qualifiers),
            custom_config: None,
        }
    }

    /// Fixed six-round custom playoff
    pub fn custom_playoff(config: CustomConfig) -> Self {
        Self {
            rounds: 1,
            mode: FormatMode::CustomPlayoff,
            playoff_qualifiers: None,
            custom_config: Some(config),
        }
    }

    /// Decode a format from JSON
    pub fn from_json(json: &str) -> ScheduleResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Validate configuration against the number of participating teams
    pub fn validate(&self, team_count: usize) -> ScheduleResult<()> {
        if self.rounds == 0 {
            return Err(ScheduleError::invalid("rounds must be at least 1"));
        }

        match self.mode {
            FormatMode::League => Ok(()),
            FormatMode::LeaguePlayoff => {
                let qualifiers = self.playoff_qualifiers.ok_or_else(|| {
                    ScheduleError::invalid("league_playoff requires playoff_qualifiers")
                })?;
                if qualifiers == 0 {
                    return Err(ScheduleError::invalid("playoff_qualifiers must be at least 1"));
                }
                if qualifiers > team_count {
                    return Err(ScheduleError::invalid(format!(
                        "playoff_qualifiers ({qualifiers}) exceeds team count ({team_count})"
                    )));
                }
                Ok(())
            }
            // Swiss clamps its qualifier count instead of failing
            FormatMode::SwissElimination => match self.playoff_qualifiers {
                Some(0) => Err(ScheduleError::invalid("playoff_qualifiers must be at least 1")),
                _ => Ok(()),
            },
            FormatMode::CustomPlayoff => {
                let config = self.custom_config.ok_or_else(|| {
                    ScheduleError::invalid("custom_playoff requires custom_config")
                })?;
                config.validate()?;
                if config.field_size != team_count {
                    return Err(ScheduleError::invalid(format!(
                        "custom playoff field size is {}, got {team_count} teams",
                        config.field_size
                    )));
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_parse_and_display() {
        for mode in [
            FormatMode::League,
            FormatMode::LeaguePlayoff,
            FormatMode::SwissElimination,
            FormatMode::CustomPlayoff,
        ] {
            assert_eq!(mode.to_string().parse::<FormatMode>().unwrap(), mode);
        }
        assert_eq!("swiss".parse::<FormatMode>().unwrap(), FormatMode::SwissElimination);
        assert!("knockout".parse::<FormatMode>().is_err());
    }

    #[test]
    fn test_format_from_json_defaults() {
        let format = Format::from_json(
            r#"{"rounds":1,"mode":"custom_playoff","custom_config":{"field_size":9}}"#,
        )
        .unwrap();
        assert_eq!(format.mode, FormatMode::CustomPlayoff);
        assert_eq!(format.playoff_qualifiers, None);
        let config = format.custom_config.unwrap();
        assert_eq!(config.top_seed_count, 4);
        assert!(config.enable_bye);
    }

    #[test]
    fn test_format_from_bad_json() {
        let err = Format::from_json(r#"{"rounds":1,"mode":"bogus"}"#).unwrap_err();
        assert!(matches!(err, ScheduleError::Serialization(_)));
    }

    #[test]
    fn test_league_playoff_qualifiers_exceed_teams() {
        let format = Format::league_playoff(1, 9);
        assert!(matches!(
            format.validate(8),
            Err(ScheduleError::InvalidInput(_))
        ));
        assert!(format.validate(9).is_ok());
    }

    #[test]
    fn test_league_playoff_requires_qualifiers() {
        let mut format = Format::league_playoff(1, 4);
        format.playoff_qualifiers = None;
        assert!(format.validate(8).is_err());
    }

    #[test]
    fn test_swiss_qualifiers_may_exceed_teams() {
        assert!(Format::swiss_elimination(3, 16).validate(8).is_ok());
        assert!(Format::swiss_elimination(3, 0).validate(8).is_err());
    }

    #[test]
    fn test_zero_rounds_rejected() {
        assert!(Format::league(0).validate(4).is_err());
    }

    #[test]
    fn test_custom_config_validation() {
        assert!(CustomConfig::new(9).validate().is_ok());
        assert!(matches!(
            CustomConfig::new(11).validate(),
            Err(ScheduleError::UnsupportedFieldSize { field_size: 11 })
        ));
        assert!(CustomConfig::new(8).with_top_seeds(3).validate().is_err());
        assert!(CustomConfig::new(9).without_bye().validate().is_err());
        assert!(CustomConfig::new(8).without_bye().validate().is_ok());
    }

    #[test]
    fn test_custom_field_must_match_team_count() {
        let format = Format::custom_playoff(CustomConfig::new(8));
        assert!(format.validate(8).is_ok());
        assert!(matches!(
            format.validate(9),
            Err(ScheduleError::InvalidInput(_))
        ));
    }
}
