use clap::{Arg, ArgAction, Command, builder::ValueParser};

pub const ARG_VERBOSITY: &str = "verbosity";

/// Level names accepted by `CRONPOST_LOG_LEVEL`, indexed by verbosity.
const LEVEL_NAMES: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

/// Accepts a verbosity count (0-5) or a level name.
#[must_use]
pub fn validator_log_level() -> ValueParser {
    ValueParser::from(|level: &str| -> Result<u8, String> {
        if let Ok(count) = level.parse::<u8>() {
            if count <= 5 {
                return Ok(count);
            }
        }

        let level = level.to_lowercase();
        LEVEL_NAMES
            .iter()
            .position(|name| *name == level)
            .and_then(|index| u8::try_from(index).ok())
            .ok_or_else(|| format!("invalid log level: {level}"))
    })
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command.arg(
        Arg::new(ARG_VERBOSITY)
            .short('v')
            .long("verbose")
            .help("Log verbosity, repeat for more: -v WARN, -vv INFO, -vvv DEBUG, -vvvv TRACE (default: ERROR)")
            .env("CRONPOST_LOG_LEVEL")
            .global(true)
            .action(ArgAction::Count)
            .value_parser(validator_log_level()),
    )
}
