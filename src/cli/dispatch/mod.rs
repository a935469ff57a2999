use crate::{
    api::types::SecurityOptions,
    cli::{
        actions::{Action, account, admin},
        commands::{
            account as account_cmd, admin as admin_cmd,
            api::{ARG_API_URL, ARG_PIN, ARG_TIMEOUT, ARG_TOKEN},
        },
        globals::GlobalArgs,
    },
    cronpost::UserAction,
};
use anyhow::{Context, Result, anyhow};
use clap::ArgMatches;
use secrecy::SecretString;
use std::time::Duration;
use url::Url;

/// # Errors
/// Returns an error if required arguments are missing or invalid.
pub fn handler(matches: &ArgMatches) -> Result<Action> {
    let globals = globals(matches)?;

    let operation = match matches.subcommand() {
        Some((account_cmd::CMD_STATUS, _)) => account::Operation::Status,
        Some((account_cmd::CMD_CHECK_IN, _)) => account::Operation::CheckIn,
        Some((account_cmd::CMD_STOP_FNS, _)) => account::Operation::StopFns,
        Some((account_cmd::CMD_VERIFY_PIN, _)) => account::Operation::VerifyPin,
        Some((account_cmd::CMD_REMOVE_PIN, _)) => account::Operation::RemovePin,
        Some((account_cmd::CMD_SECURITY_OPTIONS, sub)) => {
            account::Operation::SecurityOptions(security_options(sub)?)
        }
        Some((admin_cmd::CMD_ADMIN, sub)) => {
            return Ok(Action::Admin(admin::Args {
                globals,
                operation: admin_operation(sub)?,
            }));
        }
        Some((name, _)) => return Err(anyhow!("unknown command: {name}")),
        None => return Err(anyhow!("missing command")),
    };

    Ok(Action::Account(account::Args { globals, operation }))
}

fn globals(matches: &ArgMatches) -> Result<GlobalArgs> {
    let api_url = matches
        .get_one::<String>(ARG_API_URL)
        .context("missing required argument: --api-url")?;
    let api_url = Url::parse(api_url).context("invalid CRONPOST_API_URL")?;

    let token = matches
        .get_one::<String>(ARG_TOKEN)
        .cloned()
        .context("missing required argument: --token")?;

    let mut globals = GlobalArgs::new(api_url, SecretString::from(token));

    if let Some(pin) = matches.get_one::<String>(ARG_PIN) {
        globals.set_pin(SecretString::from(pin.clone()));
    }

    if let Some(seconds) = matches.get_one::<u64>(ARG_TIMEOUT) {
        globals.set_timeout(Duration::from_secs(*seconds));
    }

    Ok(globals)
}

fn security_options(matches: &ArgMatches) -> Result<SecurityOptions> {
    let flag = |name: &str| {
        matches
            .get_one::<bool>(name)
            .copied()
            .with_context(|| format!("missing required argument: --{name}"))
    };

    Ok(SecurityOptions {
        use_pin_for_all_actions: flag(account_cmd::ARG_USE_PIN_FOR_ALL_ACTIONS)?,
        checkin_on_signin: flag(account_cmd::ARG_CHECKIN_ON_SIGNIN)?,
    })
}

fn admin_operation(matches: &ArgMatches) -> Result<admin::Operation> {
    let (name, sub) = matches.subcommand().context("missing admin command")?;

    let action = match name {
        admin_cmd::CMD_VERIFY => return Ok(admin::Operation::Verify),
        admin_cmd::CMD_SETTINGS => return Ok(admin::Operation::Settings),
        admin_cmd::CMD_SET_SETTING => {
            let key = sub
                .get_one::<String>(admin_cmd::ARG_KEY)
                .cloned()
                .context("missing required argument: <key>")?;
            let value = sub
                .get_one::<String>(admin_cmd::ARG_VALUE)
                .cloned()
                .context("missing required argument: <value>")?;
            return Ok(admin::Operation::SetSetting { key, value });
        }
        admin_cmd::CMD_UPGRADE => UserAction::Upgrade,
        admin_cmd::CMD_DOWNGRADE => UserAction::Downgrade,
        admin_cmd::CMD_DELETE_USER => UserAction::Delete,
        admin_cmd::CMD_RESET_PIN => UserAction::ResetPin,
        other => return Err(anyhow!("unknown admin command: {other}")),
    };

    let user_id = sub
        .get_one::<String>(admin_cmd::ARG_USER_ID)
        .cloned()
        .context("missing required argument: <user-id>")?;
    let label = sub
        .get_one::<String>(admin_cmd::ARG_EMAIL)
        .cloned()
        .unwrap_or_else(|| user_id.clone());
    // Only destructive commands define --yes.
    let confirmed = sub
        .try_get_one::<bool>(admin_cmd::ARG_YES)
        .ok()
        .flatten()
        .copied()
        .unwrap_or(false);

    Ok(admin::Operation::User {
        action,
        user_id,
        label,
        confirmed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands;
    use secrecy::ExposeSecret;

    fn dispatch(extra: &[&str]) -> Result<Action> {
        let mut argv = vec![
            "cronpost",
            "--api-url",
            "https://cronpost.example",
            "--token",
            "token",
        ];
        argv.extend_from_slice(extra);
        let matches = commands::new().try_get_matches_from(argv)?;
        handler(&matches)
    }

    #[test]
    fn test_account_commands() {
        temp_env::with_vars_unset(["CRONPOST_PIN", "CRONPOST_TIMEOUT"], || {
            let Action::Account(args) = dispatch(&["check-in"]).unwrap() else {
                panic!("expected account action");
            };
            assert_eq!(args.operation, account::Operation::CheckIn);
            assert_eq!(args.globals.api_url.as_str(), "https://cronpost.example/");
            assert_eq!(args.globals.token.expose_secret(), "token");
            assert!(args.globals.pin.is_none());
            assert!(args.globals.timeout.is_none());

            let Action::Account(args) = dispatch(&[
                "security-options",
                "--use-pin-for-all-actions",
                "false",
                "--checkin-on-signin",
                "true",
            ])
            .unwrap() else {
                panic!("expected account action");
            };
            assert_eq!(
                args.operation,
                account::Operation::SecurityOptions(SecurityOptions {
                    use_pin_for_all_actions: false,
                    checkin_on_signin: true,
                })
            );
        });
    }

    #[test]
    fn test_globals() {
        temp_env::with_vars_unset(["CRONPOST_PIN", "CRONPOST_TIMEOUT"], || {
            let matches = commands::new().get_matches_from(vec![
                "cronpost",
                "--api-url",
                "https://cronpost.example/app/",
                "--token",
                "token",
                "--pin",
                "0042",
                "--timeout",
                "12",
                "status",
            ]);
            let globals = globals(&matches).unwrap();
            assert_eq!(globals.api_url.as_str(), "https://cronpost.example/app/");
            assert_eq!(
                globals.pin.as_ref().map(|pin| pin.expose_secret()),
                Some("0042")
            );
            assert_eq!(globals.timeout, Some(Duration::from_secs(12)));
        });
    }

    #[test]
    fn test_invalid_api_url() {
        let matches = commands::new().get_matches_from(vec![
            "cronpost",
            "--api-url",
            "not a url",
            "--token",
            "token",
            "status",
        ]);
        let err = handler(&matches).unwrap_err();
        assert_eq!(err.to_string(), "invalid CRONPOST_API_URL");
    }

    #[test]
    fn test_admin_commands() {
        let Action::Admin(args) = dispatch(&["admin", "set-setting", "max_files", "10"]).unwrap()
        else {
            panic!("expected admin action");
        };
        assert_eq!(
            args.operation,
            admin::Operation::SetSetting {
                key: "max_files".to_string(),
                value: "10".to_string(),
            }
        );

        let Action::Admin(args) = dispatch(&["admin", "upgrade", "5b0c"]).unwrap() else {
            panic!("expected admin action");
        };
        assert_eq!(
            args.operation,
            admin::Operation::User {
                action: UserAction::Upgrade,
                user_id: "5b0c".to_string(),
                label: "5b0c".to_string(),
                confirmed: false,
            }
        );

        let Action::Admin(args) = dispatch(&[
            "admin",
            "reset-pin",
            "5b0c",
            "--email",
            "ada@example.com",
            "--yes",
        ])
        .unwrap() else {
            panic!("expected admin action");
        };
        assert_eq!(
            args.operation,
            admin::Operation::User {
                action: UserAction::ResetPin,
                user_id: "5b0c".to_string(),
                label: "ada@example.com".to_string(),
                confirmed: true,
            }
        );
    }

    #[test]
    fn test_upgrade_has_no_yes_flag() {
        assert!(dispatch(&["admin", "upgrade", "5b0c", "--yes"]).is_err());
    }
}
