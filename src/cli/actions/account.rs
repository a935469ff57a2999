use crate::{
    api::types::{ActionResponse, SecurityOptions, UserProfile},
    cli::{
        actions::session::{self, settle},
        globals::GlobalArgs,
    },
};
use anyhow::Result;
use std::fmt::Write as _;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Status,
    CheckIn,
    StopFns,
    VerifyPin,
    RemovePin,
    SecurityOptions(SecurityOptions),
}

#[derive(Debug)]
pub struct Args {
    pub globals: GlobalArgs,
    pub operation: Operation,
}

/// Execute an account command.
/// # Errors
/// Returns an error if a request fails, the configured PIN is rejected, or the
/// account gets locked.
pub async fn execute(args: Args) -> Result<()> {
    let mut session = session::connect(&args.globals)?;
    debug!(operation = ?args.operation, "running account command");

    match args.operation {
        Operation::Status => {
            let profile = session.profile().await?;
            print!("{}", render_profile(&profile));
        }
        Operation::CheckIn => {
            let profile = session.profile().await?;
            let result = session.check_in(profile.use_pin_for_all_actions).await;
            if let Some(response) = settle(&session, result)? {
                print!("{}", render_action(&response));
            }
        }
        Operation::StopFns => {
            let result = session.stop_fns().await;
            if let Some(response) = settle(&session, result)? {
                print!("{}", render_action(&response));
            }
        }
        Operation::VerifyPin => {
            let result = session.verify_pin_session().await;
            if let Some(response) = settle(&session, result)? {
                println!("{}", response.message);
            }
        }
        Operation::RemovePin => {
            let profile = session.profile().await?;
            let result = session.remove_pin(profile.has_pin).await;
            if let Some(response) = settle(&session, result)? {
                println!("{}", response.message);
            }
        }
        Operation::SecurityOptions(options) => {
            let profile = session.profile().await?;
            let result = session
                .update_security_options(options, profile.has_pin)
                .await;
            if let Some(response) = settle(&session, result)? {
                println!("{}", response.message);
            }
        }
    }

    Ok(())
}

fn on_off(flag: bool) -> &'static str {
    if flag { "on" } else { "off" }
}

fn render_profile(profile: &UserProfile) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Email:               {}", profile.email);
    if let Some(name) = &profile.user_name {
        let _ = writeln!(out, "Name:                {name}");
    }
    let _ = writeln!(out, "Status:              {}", profile.account_status);
    if let Some(membership) = profile.membership_type {
        let _ = writeln!(out, "Membership:          {membership}");
    }
    if let Some(at) = &profile.next_clc_prompt_at {
        let _ = writeln!(out, "Next check-in:       {at}");
    }
    if let Some(at) = &profile.wct_active_ends_at {
        let _ = writeln!(out, "Check-in window end: {at}");
    }
    let _ = writeln!(
        out,
        "PIN:                 {}",
        if profile.has_pin { "set" } else { "not set" }
    );
    let _ = writeln!(
        out,
        "PIN for all actions: {}",
        on_off(profile.use_pin_for_all_actions)
    );
    let _ = writeln!(
        out,
        "Check-in on sign-in: {}",
        on_off(profile.checkin_on_signin)
    );
    if profile.is_admin {
        let _ = writeln!(out, "Role:                admin");
    }
    out
}

fn render_action(response: &ActionResponse) -> String {
    let mut out = format!("{}\nStatus: {}\n", response.message, response.account_status);
    if let Some(at) = &response.next_clc_prompt_at {
        let _ = writeln!(out, "Next check-in: {at}");
    }
    if let Some(at) = &response.wct_active_ends_at {
        let _ = writeln!(out, "Check-in window ends: {at}");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_render_profile() {
        let profile: UserProfile = serde_json::from_value(json!({
            "email": "ada@example.com",
            "user_name": "Ada",
            "account_status": "ANS_CLC",
            "membership_type": "premium",
            "next_clc_prompt_at": "2026-10-19T08:00:00Z",
            "has_pin": true,
            "use_pin_for_all_actions": true
        }))
        .unwrap();

        let rendered = render_profile(&profile);
        assert!(rendered.contains("Email:               ada@example.com\n"));
        assert!(rendered.contains("Status:              awaiting check-in\n"));
        assert!(rendered.contains("Membership:          premium\n"));
        assert!(rendered.contains("PIN:                 set\n"));
        assert!(rendered.contains("PIN for all actions: on\n"));
        assert!(rendered.contains("Check-in on sign-in: off\n"));
        assert!(!rendered.contains("Role:"));
    }

    #[test]
    fn test_render_action() {
        let response: ActionResponse = serde_json::from_value(json!({
            "message": "FNS stopped.",
            "account_status": "INS"
        }))
        .unwrap();
        assert_eq!(render_action(&response), "FNS stopped.\nStatus: inactive\n");
    }
}
