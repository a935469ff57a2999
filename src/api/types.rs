//! Request and response payloads for the CronPost API.

use crate::pin::PinCode;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const PROFILE_PATH: &str = "/api/users/me";
pub const CHECK_IN_PATH: &str = "/api/users/check-in";
pub const STOP_FNS_PATH: &str = "/api/users/stop-fns";
pub const SECURITY_OPTIONS_PATH: &str = "/api/users/security-options";
pub const VERIFY_PIN_SESSION_PATH: &str = "/api/users/verify-pin-session";
pub const REMOVE_PIN_PATH: &str = "/api/users/pin";
pub const ADMIN_VERIFY_PIN_PATH: &str = "/api/admin/verify-pin";
pub const ADMIN_SETTINGS_PATH: &str = "/api/admin/system-settings";

#[must_use]
pub fn admin_setting_path(key: &str) -> String {
    format!("{ADMIN_SETTINGS_PATH}/{key}")
}

#[must_use]
pub fn admin_user_path(user_id: &str) -> String {
    format!("/api/admin/users/{user_id}")
}

/// Account lifecycle states reported by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccountStatus {
    /// Inactive: no check-in schedule running.
    #[serde(rename = "INS")]
    Inactive,
    /// Active, waiting for the next check-in.
    #[serde(rename = "ANS_CLC")]
    AwaitingCheckIn,
    /// Active, check-in window open.
    #[serde(rename = "ANS_WCT")]
    CheckInWindow,
    /// "Frozen and Send": scheduled messages are going out.
    #[serde(rename = "FNS")]
    FrozenAndSend,
    #[serde(other)]
    Unknown,
}

impl fmt::Display for AccountStatus {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Inactive => "inactive",
            Self::AwaitingCheckIn => "awaiting check-in",
            Self::CheckInWindow => "check-in window open",
            Self::FrozenAndSend => "frozen and sending",
            Self::Unknown => "unknown",
        };
        formatter.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MembershipType {
    Free,
    Premium,
    #[serde(other)]
    Unknown,
}

impl fmt::Display for MembershipType {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Free => "free",
            Self::Premium => "premium",
            Self::Unknown => "unknown",
        };
        formatter.write_str(label)
    }
}

/// Subset of `GET /api/users/me` the client acts on.
#[derive(Debug, Clone, Deserialize)]
pub struct UserProfile {
    pub email: String,
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub is_admin: bool,
    pub account_status: AccountStatus,
    #[serde(default)]
    pub membership_type: Option<MembershipType>,
    #[serde(default)]
    pub next_clc_prompt_at: Option<String>,
    #[serde(default)]
    pub wct_active_ends_at: Option<String>,
    #[serde(default)]
    pub use_pin_for_all_actions: bool,
    #[serde(default)]
    pub checkin_on_signin: bool,
    #[serde(default)]
    pub has_pin: bool,
}

impl UserProfile {
    /// Whether every page visit has to be unlocked with the PIN first.
    #[must_use]
    pub fn requires_session_pin(&self) -> bool {
        self.use_pin_for_all_actions && self.has_pin
    }
}

/// Body for check-in. `pin_code` is sent as `null` when the account does
/// not require a PIN for every action.
#[derive(Debug, Serialize)]
pub struct CheckInRequest {
    pub pin_code: Option<PinCode>,
}

/// Body for actions that take only the user's PIN.
#[derive(Debug, Serialize)]
pub struct PinRequest {
    pub pin_code: PinCode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SecurityOptions {
    pub use_pin_for_all_actions: bool,
    pub checkin_on_signin: bool,
}

#[derive(Debug, Serialize)]
pub struct SecurityOptionsRequest {
    pub use_pin_for_all_actions: bool,
    pub checkin_on_signin: bool,
    pub pin_code: Option<PinCode>,
}

impl SecurityOptionsRequest {
    #[must_use]
    pub fn new(options: SecurityOptions, pin_code: Option<PinCode>) -> Self {
        Self {
            use_pin_for_all_actions: options.use_pin_for_all_actions,
            checkin_on_signin: options.checkin_on_signin,
            pin_code,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AdminPinRequest {
    pub admin_pin: PinCode,
}

#[derive(Debug, Serialize)]
pub struct SettingUpdateRequest {
    pub value: String,
    pub admin_pin: PinCode,
}

/// Result of check-in and stop-FNS.
#[derive(Debug, Clone, Deserialize)]
pub struct ActionResponse {
    pub message: String,
    pub account_status: AccountStatus,
    #[serde(default)]
    pub next_clc_prompt_at: Option<String>,
    #[serde(default)]
    pub wct_active_ends_at: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SystemSetting {
    pub setting_key: String,
    #[serde(default)]
    pub setting_value: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// User row returned by admin upgrade/downgrade.
#[derive(Debug, Clone, Deserialize)]
pub struct UserAdminView {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub user_name: Option<String>,
    pub membership_type: MembershipType,
    pub account_status: AccountStatus,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_check_in_request_serializes_null_pin() {
        let body = serde_json::to_value(CheckInRequest { pin_code: None }).unwrap();
        assert_eq!(body, json!({"pin_code": null}));

        let body = serde_json::to_value(CheckInRequest {
            pin_code: Some(PinCode::parse("1234").unwrap()),
        })
        .unwrap();
        assert_eq!(body, json!({"pin_code": "1234"}));
    }

    #[test]
    fn test_admin_bodies() {
        let pin = PinCode::parse("9090").unwrap();
        let body = serde_json::to_value(SettingUpdateRequest {
            value: "15".to_string(),
            admin_pin: pin.clone(),
        })
        .unwrap();
        assert_eq!(body, json!({"value": "15", "admin_pin": "9090"}));

        let body = serde_json::to_value(AdminPinRequest { admin_pin: pin }).unwrap();
        assert_eq!(body, json!({"admin_pin": "9090"}));
    }

    #[test]
    fn test_security_options_request() {
        let options = SecurityOptions {
            use_pin_for_all_actions: true,
            checkin_on_signin: false,
        };
        let body = serde_json::to_value(SecurityOptionsRequest::new(options, None)).unwrap();
        assert_eq!(
            body,
            json!({"use_pin_for_all_actions": true, "checkin_on_signin": false, "pin_code": null})
        );
    }

    #[test]
    fn test_action_response() {
        let response: ActionResponse = serde_json::from_value(json!({
            "message": "Check-in successful.",
            "account_status": "ANS_CLC",
            "next_clc_prompt_at": "2026-10-19T08:00:00Z",
            "wct_active_ends_at": null
        }))
        .unwrap();
        assert_eq!(response.account_status, AccountStatus::AwaitingCheckIn);
        assert_eq!(
            response.next_clc_prompt_at.as_deref(),
            Some("2026-10-19T08:00:00Z")
        );
        assert!(response.wct_active_ends_at.is_none());
    }

    #[test]
    fn test_unknown_status() {
        let status: AccountStatus = serde_json::from_value(json!("PAUSED")).unwrap();
        assert_eq!(status, AccountStatus::Unknown);
        assert_eq!(AccountStatus::FrozenAndSend.to_string(), "frozen and sending");
    }

    #[test]
    fn test_profile_defaults() {
        let profile: UserProfile = serde_json::from_value(json!({
            "email": "ada@example.com",
            "account_status": "INS",
            "timezone": "UTC"
        }))
        .unwrap();
        assert!(!profile.has_pin);
        assert!(!profile.requires_session_pin());

        let profile: UserProfile = serde_json::from_value(json!({
            "email": "ada@example.com",
            "account_status": "ANS_WCT",
            "membership_type": "premium",
            "use_pin_for_all_actions": true,
            "has_pin": true
        }))
        .unwrap();
        assert!(profile.requires_session_pin());
        assert_eq!(profile.membership_type, Some(MembershipType::Premium));
    }

    #[test]
    fn test_paths() {
        assert_eq!(
            admin_setting_path("pin_lockout_duration_minutes"),
            "/api/admin/system-settings/pin_lockout_duration_minutes"
        );
        assert_eq!(admin_user_path("42"), "/api/admin/users/42");
    }
}
