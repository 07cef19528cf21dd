//! Command-line driver for the bracket engine.
//!
//! Reads a seeded team list and a tournament format, then prints the generated
//! plan as JSON. Swiss stages are advanced one round at a time by passing the
//! scored history back in with `--swiss-state`.

mod config;

use std::path::{Path, PathBuf};

use anyhow::{Context, Error, bail};
use bracket_engine::{FormatMode, Standings, SwissEliminationGenerator, SwissRound, TeamRef, plan};
use log::info;
use pico_args::Arguments;
use serde::Deserialize;

use config::{CliConfig, CliOverrides, parse_team_list};

const HELP: &str = "\
Generate tournament schedules and playoff brackets

USAGE:
  be_cli [OPTIONS] (--teams A,B,C | --teams-file PATH)

OPTIONS:
  --teams         LIST     Comma-separated team ids in seed order
  --teams-file    PATH     File with one team id per line, in seed order
  --mode          MODE     league | league_playoff | swiss_elimination | custom_playoff  [default: env BE_MODE]
  --rounds        N        League repetitions or Swiss rounds  [default: env BE_ROUNDS or 1]
  --qualifiers    N        Teams entering the elimination stage  [default: env BE_QUALIFIERS]
  --top-seeds     N        Custom playoff double-chance seeds (2 or 4)  [default: env BE_TOP_SEEDS or 4]
  --start-date    DATE     Date of round 0 (YYYY-MM-DD)  [default: env BE_START_DATE]
  --days-between  N        Days between rounds  [default: env BE_DAYS_BETWEEN_ROUNDS or 7]
  --format-file   PATH     JSON format; replaces the format options above
  --swiss-state   PATH     JSON {\"standings\": …, \"history\": […]} of a running Swiss stage

FLAGS:
  --no-bye                 Disable the custom playoff bye lane
  -h, --help               Print help information

ENVIRONMENT:
  BE_MODE, BE_ROUNDS, BE_QUALIFIERS, BE_TOP_SEEDS, BE_ENABLE_BYE,
  BE_START_DATE, BE_DAYS_BETWEEN_ROUNDS
  RUST_LOG                 Log filter (logs go to stderr)
  (A .env file in the working directory is loaded if present)
";

/// Scored state of a Swiss stage in progress
#[derive(Debug, Deserialize)]
struct SwissState {
    standings: Standings,
    #[serde(default)]
    history: Vec<SwissRound>,
}

struct Args {
    teams: Option<String>,
    teams_file: Option<PathBuf>,
    swiss_state: Option<PathBuf>,
    overrides: CliOverrides,
}

fn main() -> Result<(), Error> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let args = Args {
        teams: pargs.opt_value_from_str("--teams")?,
        teams_file: pargs.opt_value_from_str("--teams-file")?,
        swiss_state: pargs.opt_value_from_str("--swiss-state")?,
        overrides: CliOverrides {
            mode: pargs.opt_value_from_str("--mode")?,
            rounds: pargs.opt_value_from_str("--rounds")?,
            qualifiers: pargs.opt_value_from_str("--qualifiers")?,
            top_seeds: pargs.opt_value_from_str("--top-seeds")?,
            no_bye: pargs.contains("--no-bye"),
            start_date: pargs.opt_value_from_str("--start-date")?,
            days_between_rounds: pargs.opt_value_from_str("--days-between")?,
            format_file: pargs.opt_value_from_str("--format-file")?,
        },
    };

    let unknown = pargs.finish();
    if !unknown.is_empty() {
        bail!("unexpected arguments: {unknown:?}");
    }

    env_logger::builder().format_target(false).init();

    let teams = read_teams(&args)?;
    let config = CliConfig::from_env(args.overrides, teams.len())?;
    config.validate(teams.len())?;

    info!("Scheduling {} teams as {}", teams.len(), config.format.mode);

    let output = match args.swiss_state {
        Some(path) => advance_swiss(&config, &teams, &path)?,
        None => {
            let mut tournament = plan(&config.format, &teams)?;
            if let Some(calendar) = &config.calendar {
                tournament = tournament.with_calendar(calendar);
            }
            serde_json::to_value(&tournament)?
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn read_teams(args: &Args) -> Result<Vec<TeamRef>, Error> {
    let raw = match (&args.teams, &args.teams_file) {
        (Some(list), None) => list.clone(),
        (None, Some(path)) => std::fs::read_to_string(path)
            .with_context(|| format!("reading team file {}", path.display()))?,
        (Some(_), Some(_)) => bail!("pass either --teams or --teams-file, not both"),
        (None, None) => bail!("no teams given; pass --teams or --teams-file (see --help)"),
    };

    let teams = parse_team_list(&raw);
    if teams.is_empty() {
        bail!("team list is empty");
    }
    Ok(teams)
}

/// Emit the next Swiss round, or the elimination bracket once every round is in
fn advance_swiss(
    config: &CliConfig,
    teams: &[TeamRef],
    state_path: &Path,
) -> Result<serde_json::Value, Error> {
    let format = &config.format;
    if format.mode != FormatMode::SwissElimination {
        bail!("--swiss-state only applies to swiss_elimination, format is {}", format.mode);
    }

    let raw = std::fs::read_to_string(state_path)
        .with_context(|| format!("reading swiss state {}", state_path.display()))?;
    let state: SwissState = serde_json::from_str(&raw).context("parsing swiss state")?;

    let generator = SwissEliminationGenerator::new(
        teams.to_vec(),
        format.rounds,
        format.playoff_qualifiers.unwrap_or(teams.len()),
    )?;

    let completed = state.history.len() as u32;
    if completed < generator.swiss_rounds() {
        info!("Pairing swiss round {} of {}", completed + 1, generator.swiss_rounds());
        let mut round = generator.pair_round(completed, &state.standings, &state.history)?;
        if let Some(calendar) = &config.calendar {
            calendar.apply(&mut round.matches);
        }
        return Ok(serde_json::to_value(&round)?);
    }

    info!("Swiss stage complete, seeding {} qualifiers", generator.qualifiers());
    let mut output = generator.finish(&state.standings, &state.history)?;
    if let Some(calendar) = &config.calendar {
        output.elimination = output.elimination.with_calendar(calendar);
    }
    Ok(serde_json::to_value(&output)?)
}
