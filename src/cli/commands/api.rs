use clap::{Arg, Command};

pub const ARG_API_URL: &str = "api-url";
pub const ARG_TOKEN: &str = "token";
pub const ARG_PIN: &str = "pin";
pub const ARG_TIMEOUT: &str = "timeout";

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_API_URL)
                .long("api-url")
                .help("CronPost base URL, example: https://cronpost.example")
                .env("CRONPOST_API_URL")
                .required(true),
        )
        .arg(
            Arg::new(ARG_TOKEN)
                .long("token")
                .help("Access token used as bearer credential")
                .env("CRONPOST_TOKEN")
                .hide_env_values(true)
                .required(true),
        )
        .arg(
            Arg::new(ARG_PIN)
                .long("pin")
                .help("4-digit PIN to use instead of prompting; never retried once rejected")
                .env("CRONPOST_PIN")
                .hide_env_values(true)
        )
        .arg(
            Arg::new(ARG_TIMEOUT)
                .long("timeout")
                .help("Request timeout in seconds (default: none)")
                .env("CRONPOST_TIMEOUT")
                .value_parser(clap::value_parser!(u64).range(1..)),
        )
}
