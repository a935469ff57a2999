use crate::{
    api::types::SystemSetting,
    cli::{
        actions::session::{self, settle},
        globals::GlobalArgs,
    },
    cronpost::UserAction,
};
use anyhow::{Result, bail};
use std::fmt::Write as _;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    Verify,
    Settings,
    SetSetting {
        key: String,
        value: String,
    },
    User {
        action: UserAction,
        user_id: String,
        label: String,
        /// Set by `--yes`; destructive actions refuse to run without it.
        confirmed: bool,
    },
}

#[derive(Debug)]
pub struct Args {
    pub globals: GlobalArgs,
    pub operation: Operation,
}

/// Execute an admin command.
/// # Errors
/// Returns an error if a destructive action is not confirmed, a request
/// fails, the configured PIN is rejected, or the account gets locked.
pub async fn execute(args: Args) -> Result<()> {
    if let Operation::User {
        action,
        label,
        confirmed: false,
        ..
    } = &args.operation
    {
        if let Some(question) = action.confirmation(label) {
            bail!("{question} Re-run with --yes to confirm.");
        }
    }

    let mut session = session::connect(&args.globals)?;
    debug!(operation = ?args.operation, "running admin command");

    match args.operation {
        Operation::Verify => {
            let result = session.admin_verify().await;
            if let Some(response) = settle(&session, result)? {
                println!("{}", response.message);
            }
        }
        Operation::Settings => {
            let settings = session.list_settings().await?;
            print!("{}", render_settings(&settings));
        }
        Operation::SetSetting { key, value } => {
            let result = session.save_setting(&key, &value).await;
            if let Some(response) = settle(&session, result)? {
                println!("{}", response.message);
            }
        }
        Operation::User {
            action,
            user_id,
            label,
            ..
        } => {
            let result = session.admin_user_action(action, &user_id, &label).await;
            if let Some(report) = settle(&session, result)? {
                println!("{}", report.message);
                if let Some(user) = report.user {
                    println!(
                        "{}: {} ({})",
                        user.email, user.membership_type, user.account_status
                    );
                }
            }
        }
    }

    Ok(())
}

fn render_settings(settings: &[SystemSetting]) -> String {
    let mut out = String::new();
    for setting in settings {
        let _ = write!(
            out,
            "{} = {}",
            setting.setting_key,
            setting.setting_value.as_deref().unwrap_or("")
        );
        if let Some(description) = &setting.description {
            let _ = write!(out, "  # {description}");
        }
        out.push('\n');
    }
    out
}
