use super::{ActionError, CronPost};
use crate::{
    api::{
        decode,
        types::{
            ADMIN_SETTINGS_PATH, ADMIN_VERIFY_PIN_PATH, AdminPinRequest, MessageResponse,
            SettingUpdateRequest, SystemSetting, UserAdminView, admin_setting_path,
            admin_user_path,
        },
    },
    pin::{Navigator, PinPrompt},
};
use reqwest::Method;
use serde_json::Value;
use std::fmt;
use tracing::{info, instrument};

pub const ADMIN_GATE_PROMPT: &str = "Please enter your Admin PIN to access the dashboard.";

/// Account operations an admin runs on another user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserAction {
    Upgrade,
    Downgrade,
    Delete,
    ResetPin,
}

impl UserAction {
    /// Verb used in the confirmation prompt.
    #[must_use]
    pub fn verb(self) -> &'static str {
        match self {
            Self::Upgrade => "upgrade",
            Self::Downgrade => "downgrade",
            Self::Delete => "delete",
            Self::ResetPin => "reset pin for",
        }
    }

    #[must_use]
    pub fn method(self) -> Method {
        match self {
            Self::Upgrade | Self::Downgrade => Method::PUT,
            Self::Delete => Method::DELETE,
            Self::ResetPin => Method::POST,
        }
    }

    #[must_use]
    pub fn path(self, user_id: &str) -> String {
        let base = admin_user_path(user_id);
        match self {
            Self::Upgrade => format!("{base}/upgrade"),
            Self::Downgrade => format!("{base}/downgrade"),
            Self::Delete => base,
            Self::ResetPin => format!("{base}/reset-pin"),
        }
    }

    /// Question to confirm before a destructive action; `None` for the
    /// reversible ones.
    #[must_use]
    pub fn confirmation(self, label: &str) -> Option<String> {
        match self {
            Self::Upgrade | Self::Downgrade => None,
            Self::Delete => Some(format!(
                "Are you sure you want to PERMANENTLY DELETE user '{label}'? This action cannot be undone."
            )),
            Self::ResetPin => Some(format!(
                "Are you sure you want to reset the PIN for '{label}'? This will remove their current PIN."
            )),
        }
    }

    #[must_use]
    pub fn prompt(self, label: &str) -> String {
        format!(
            "To {} user '{label}', please confirm your Admin PIN:",
            self.verb()
        )
    }
}

impl fmt::Display for UserAction {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.verb())
    }
}

/// What the server said about a completed user action.
#[derive(Debug, Clone)]
pub struct UserActionReport {
    pub message: String,
    /// Updated row, returned by upgrade and downgrade.
    pub user: Option<UserAdminView>,
}

impl UserActionReport {
    fn from_body(body: Value, label: &str) -> Self {
        let message = body
            .get("message")
            .and_then(Value::as_str)
            .map_or_else(|| format!("Action on {label} was successful."), str::to_string);
        let user = decode::<UserAdminView>(body).ok();
        Self { message, user }
    }
}

#[must_use]
pub fn setting_prompt(key: &str) -> String {
    format!("To save changes for '{key}', please confirm your Admin PIN:")
}

impl<P: PinPrompt, N: Navigator> CronPost<P, N> {
    /// Unlocks the admin dashboard.
    ///
    /// # Errors
    /// Returns the errors of the PIN loop and the request.
    #[instrument(skip(self))]
    pub async fn admin_verify(&mut self) -> Result<MessageResponse, ActionError> {
        self.verified(
            ADMIN_GATE_PROMPT,
            Method::POST,
            ADMIN_VERIFY_PIN_PATH,
            |pin| AdminPinRequest { admin_pin: pin },
        )
        .await
    }

    /// Lists the system settings. Not PIN-gated.
    ///
    /// # Errors
    /// Returns `ActionError::Api` if the request fails.
    #[instrument(skip(self))]
    pub async fn list_settings(&self) -> Result<Vec<SystemSetting>, ActionError> {
        Ok(self.api.get_json(ADMIN_SETTINGS_PATH).await?)
    }

    /// Stores a new value for one system setting.
    ///
    /// # Errors
    /// Returns the errors of the PIN loop and the request.
    #[instrument(skip(self, value))]
    pub async fn save_setting(
        &mut self,
        key: &str,
        value: &str,
    ) -> Result<MessageResponse, ActionError> {
        let response: MessageResponse = self
            .verified(
                &setting_prompt(key),
                Method::PUT,
                &admin_setting_path(key),
                |pin| SettingUpdateRequest {
                    value: value.to_string(),
                    admin_pin: pin,
                },
            )
            .await?;

        info!(key, "setting saved");
        Ok(response)
    }

    /// Runs `action` on the user `user_id`. `label` names the user in the
    /// prompt, usually the email address.
    ///
    /// # Errors
    /// Returns the errors of the PIN loop and the request.
    #[instrument(skip(self))]
    pub async fn admin_user_action(
        &mut self,
        action: UserAction,
        user_id: &str,
        label: &str,
    ) -> Result<UserActionReport, ActionError> {
        let body: Value = self
            .verified(
                &action.prompt(label),
                action.method(),
                &action.path(user_id),
                |pin| AdminPinRequest { admin_pin: pin },
            )
            .await?;

        info!(%action, user_id, "admin action completed");
        Ok(UserActionReport::from_body(body, label))
    }
}
