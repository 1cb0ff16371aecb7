use crate::cli::{actions::Action, commands, dispatch, telemetry};
use anyhow::Result;
use clap::{ArgMatches, parser::ValueSource};
use tracing::Level;

/// Map verbosity to a tracing level.
///
/// `LESSEE_LOG_LEVEL` names the level directly, starting at ERROR. Each `-v`
/// raises the WARN default one step.
const fn get_verbosity_level(verbosity: u8, from_env: bool) -> Level {
    let step = if from_env {
        verbosity
    } else {
        verbosity.saturating_add(1)
    };

    match step {
        0 => Level::ERROR,
        1 => Level::WARN,
        2 => Level::INFO,
        3 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

// `-v` is global, so it may have been given after the subcommand.
fn verbosity(matches: &ArgMatches) -> (u8, bool) {
    let matches = matches.subcommand().map_or(matches, |(_, sub_m)| sub_m);
    let count = matches
        .get_one::<u8>(commands::logging::ARG_VERBOSITY)
        .copied()
        .unwrap_or(0);
    let from_env = matches.value_source(commands::logging::ARG_VERBOSITY)
        == Some(ValueSource::EnvVariable);

    (count, from_env)
}

/// Main entry point for the CLI - builds and returns the Action
///
/// # Errors
///
/// Returns an error if telemetry initialization or action dispatch fails
pub fn start() -> Result<Action> {
    let matches = commands::new().get_matches();

    let (count, from_env) = verbosity(&matches);
    telemetry::init(Some(get_verbosity_level(count, from_env)))?;

    dispatch::handler(&matches)
}
