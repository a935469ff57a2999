use super::{ActionError, CronPost};
use crate::{
    api::types::{
        MessageResponse, PinRequest, REMOVE_PIN_PATH, SECURITY_OPTIONS_PATH, SecurityOptions,
        SecurityOptionsRequest, VERIFY_PIN_SESSION_PATH,
    },
    pin::{Navigator, PinPrompt},
};
use reqwest::Method;
use tracing::{info, instrument};

pub const SECURITY_OPTIONS_PROMPT: &str =
    "Please enter your 4-digit PIN to confirm these changes:";
pub const PIN_SESSION_PROMPT: &str = "For your security, please verify your PIN to continue.";
pub const REMOVE_PIN_PROMPT: &str =
    "To remove your PIN, please enter your current 4-digit PIN for confirmation:";

pub const PIN_REQUIRED_FOR_OPTIONS: &str =
    "You must create a PIN before you can enable these options.";
pub const NO_PIN_SET: &str = "You have not set a PIN yet.";

impl<P: PinPrompt, N: Navigator> CronPost<P, N> {
    /// Saves the security toggles.
    ///
    /// Accounts with a PIN confirm the change with it. Accounts without one
    /// may only turn both options off, which is sent with `pin_code: null`.
    ///
    /// # Errors
    /// Returns `ActionError::Precondition` when an option is enabled without
    /// a PIN, otherwise the errors of the PIN loop and the request.
    #[instrument(skip(self))]
    pub async fn update_security_options(
        &mut self,
        options: SecurityOptions,
        has_pin: bool,
    ) -> Result<MessageResponse, ActionError> {
        let enables_any = options.use_pin_for_all_actions || options.checkin_on_signin;
        if enables_any && !has_pin {
            return Err(ActionError::Precondition(PIN_REQUIRED_FOR_OPTIONS.to_string()));
        }

        let response: MessageResponse = if has_pin {
            self.verified(
                SECURITY_OPTIONS_PROMPT,
                Method::PUT,
                SECURITY_OPTIONS_PATH,
                |pin| SecurityOptionsRequest::new(options, Some(pin)),
            )
            .await?
        } else {
            self.api
                .request_json(
                    Method::PUT,
                    SECURITY_OPTIONS_PATH,
                    &SecurityOptionsRequest::new(options, None),
                )
                .await?
        };

        info!("security options saved");
        Ok(response)
    }

    /// Unlocks the session for accounts that require a PIN for every action.
    ///
    /// # Errors
    /// Returns the errors of the PIN loop and the request.
    #[instrument(skip(self))]
    pub async fn verify_pin_session(&mut self) -> Result<MessageResponse, ActionError> {
        self.verified(
            PIN_SESSION_PROMPT,
            Method::POST,
            VERIFY_PIN_SESSION_PATH,
            |pin| PinRequest { pin_code: pin },
        )
        .await
    }

    /// Removes the user's PIN after confirming the current one.
    ///
    /// # Errors
    /// Returns `ActionError::Precondition` when no PIN is set, otherwise the
    /// errors of the PIN loop and the request.
    #[instrument(skip(self))]
    pub async fn remove_pin(&mut self, has_pin: bool) -> Result<MessageResponse, ActionError> {
        if !has_pin {
            return Err(ActionError::Precondition(NO_PIN_SET.to_string()));
        }

        let response: MessageResponse = self
            .verified(REMOVE_PIN_PROMPT, Method::DELETE, REMOVE_PIN_PATH, |pin| {
                PinRequest { pin_code: pin }
            })
            .await?;

        info!("PIN removed");
        Ok(response)
    }
}
