use super::{ActionError, CronPost};
use crate::{
    api::types::{
        ActionResponse, CHECK_IN_PATH, CheckInRequest, PROFILE_PATH, PinRequest, STOP_FNS_PATH,
        UserProfile,
    },
    pin::{Navigator, PinPrompt},
};
use reqwest::Method;
use tracing::{info, instrument};

pub const CHECK_IN_PROMPT: &str = "Please enter your 4-digit PIN to check-in:";
pub const STOP_FNS_PROMPT: &str = "To stop FNS, please enter your 4-digit PIN:";

impl<P: PinPrompt, N: Navigator> CronPost<P, N> {
    /// Fetches the signed-in user's profile.
    ///
    /// # Errors
    /// Returns `ActionError::Api` if the request fails.
    #[instrument(skip(self))]
    pub async fn profile(&self) -> Result<UserProfile, ActionError> {
        Ok(self.api.get_json(PROFILE_PATH).await?)
    }

    /// Confirms the user is still around.
    ///
    /// Only accounts with `use_pin_for_all_actions` are asked for a PIN; the
    /// others send `pin_code: null`.
    ///
    /// # Errors
    /// Returns `ActionError::Cancelled` or `ActionError::Redirecting` from
    /// the PIN loop, and `ActionError::Api` if the request fails.
    #[instrument(skip(self))]
    pub async fn check_in(&mut self, require_pin: bool) -> Result<ActionResponse, ActionError> {
        let response: ActionResponse = if require_pin {
            self.verified(CHECK_IN_PROMPT, Method::POST, CHECK_IN_PATH, |pin| {
                CheckInRequest {
                    pin_code: Some(pin),
                }
            })
            .await?
        } else {
            self.api
                .request_json(
                    Method::POST,
                    CHECK_IN_PATH,
                    &CheckInRequest { pin_code: None },
                )
                .await?
        };

        info!(status = %response.account_status, "checked in");
        Ok(response)
    }

    /// Leaves the "Frozen and Send" state. Always PIN-gated.
    ///
    /// # Errors
    /// Same as [`CronPost::check_in`].
    #[instrument(skip(self))]
    pub async fn stop_fns(&mut self) -> Result<ActionResponse, ActionError> {
        let response: ActionResponse = self
            .verified(STOP_FNS_PROMPT, Method::POST, STOP_FNS_PATH, |pin| {
                PinRequest { pin_code: pin }
            })
            .await?;

        info!(status = %response.account_status, "stopped FNS");
        Ok(response)
    }
}
