use clap::{Arg, ArgAction, Command};

pub const CMD_ADMIN: &str = "admin";
pub const CMD_VERIFY: &str = "verify";
pub const CMD_SETTINGS: &str = "settings";
pub const CMD_SET_SETTING: &str = "set-setting";
pub const CMD_UPGRADE: &str = "upgrade";
pub const CMD_DOWNGRADE: &str = "downgrade";
pub const CMD_DELETE_USER: &str = "delete-user";
pub const CMD_RESET_PIN: &str = "reset-pin";

pub const ARG_KEY: &str = "key";
pub const ARG_VALUE: &str = "value";
pub const ARG_USER_ID: &str = "user-id";
pub const ARG_EMAIL: &str = "email";
pub const ARG_YES: &str = "yes";

fn user_command(name: &'static str, about: &'static str) -> Command {
    Command::new(name)
        .about(about)
        .arg(
            Arg::new(ARG_USER_ID)
                .help("Target user id")
                .required(true),
        )
        .arg(
            Arg::new(ARG_EMAIL)
                .long("email")
                .help("Email shown in the confirmation prompt (default: user id)"),
        )
}

fn destructive(command: Command) -> Command {
    command.arg(
        Arg::new(ARG_YES)
            .long("yes")
            .help("Confirm the action; it cannot be undone")
            .action(ArgAction::SetTrue),
    )
}

#[must_use]
pub fn with_subcommands(command: Command) -> Command {
    command.subcommand(
        Command::new(CMD_ADMIN)
            .about("Admin dashboard actions, confirmed with the Admin PIN")
            .subcommand_required(true)
            .arg_required_else_help(true)
            .subcommand(Command::new(CMD_VERIFY).about("Verify the Admin PIN"))
            .subcommand(Command::new(CMD_SETTINGS).about("List system settings"))
            .subcommand(
                Command::new(CMD_SET_SETTING)
                    .about("Update a system setting")
                    .arg(Arg::new(ARG_KEY).help("Setting key").required(true))
                    .arg(Arg::new(ARG_VALUE).help("New value").required(true)),
            )
            .subcommand(user_command(CMD_UPGRADE, "Upgrade a user to Premium"))
            .subcommand(user_command(CMD_DOWNGRADE, "Downgrade a user to Free"))
            .subcommand(destructive(user_command(
                CMD_DELETE_USER,
                "Permanently delete a user account",
            )))
            .subcommand(destructive(user_command(
                CMD_RESET_PIN,
                "Remove a user's PIN",
            ))),
    )
}
