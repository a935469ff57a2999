use clap::{Arg, ArgAction, Command};

pub const CMD_STATUS: &str = "status";
pub const CMD_CHECK_IN: &str = "check-in";
pub const CMD_STOP_FNS: &str = "stop-fns";
pub const CMD_VERIFY_PIN: &str = "verify-pin";
pub const CMD_REMOVE_PIN: &str = "remove-pin";
pub const CMD_SECURITY_OPTIONS: &str = "security-options";

pub const ARG_USE_PIN_FOR_ALL_ACTIONS: &str = "use-pin-for-all-actions";
pub const ARG_CHECKIN_ON_SIGNIN: &str = "checkin-on-signin";

fn toggle(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name)
        .long(name)
        .help(help)
        .required(true)
        .action(ArgAction::Set)
        .value_parser(clap::value_parser!(bool))
}

#[must_use]
pub fn with_subcommands(command: Command) -> Command {
    command
        .subcommand(Command::new(CMD_STATUS).about("Show account status and security options"))
        .subcommand(
            Command::new(CMD_CHECK_IN)
                .about("Check in; asks for the PIN when the account requires it for every action"),
        )
        .subcommand(Command::new(CMD_STOP_FNS).about("Stop the Frozen and Send (FNS) state"))
        .subcommand(
            Command::new(CMD_VERIFY_PIN).about("Verify the PIN for the current session"),
        )
        .subcommand(Command::new(CMD_REMOVE_PIN).about("Remove the account PIN"))
        .subcommand(
            Command::new(CMD_SECURITY_OPTIONS)
                .about("Update security options")
                .arg(toggle(
                    ARG_USE_PIN_FOR_ALL_ACTIONS,
                    "Require the PIN for every sensitive action",
                ))
                .arg(toggle(
                    ARG_CHECKIN_ON_SIGNIN,
                    "Check in automatically on sign-in",
                )),
        )
}
