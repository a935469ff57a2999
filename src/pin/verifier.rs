//! Verify-then-act loop shared by every PIN-gated action.
//!
//! Flow Overview:
//! 1) Ask the prompt for a code, passing the error from the previous attempt.
//! 2) Run the caller's request with that code.
//! 3) A success with a JSON body returns it; a lockout alerts, navigates to
//!    the dashboard and ends the loop; any other outcome, including a body
//!    that is not JSON, is shown on the next prompt.
//!
//! There is no retry limit. The server ends runaway attempts with a lockout.

use crate::{
    DASHBOARD_PATH,
    api::UNKNOWN_ERROR,
    pin::{
        code::PinCode,
        lockout::LockoutInfo,
        navigator::{Navigator, Redirect},
        outcome::ActionOutcome,
        prompt::{Cancelled, PinPrompt},
        response::ResponseLike,
    },
};
use serde_json::Value;
use std::{fmt::Display, future::Future};
use tracing::{debug, error, instrument, warn};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VerificationError {
    #[error("PIN verification cancelled")]
    Cancelled,
    /// The account is locked; the navigator has already been sent away.
    #[error("{0}")]
    Redirecting(Redirect),
}

impl From<Cancelled> for VerificationError {
    fn from(_: Cancelled) -> Self {
        Self::Cancelled
    }
}

/// Runs PIN-gated actions against one prompt surface.
pub struct PinVerifier<P, N> {
    prompt: P,
    navigator: N,
    redirect_path: String,
}

impl<P: PinPrompt, N: Navigator> PinVerifier<P, N> {
    pub fn new(prompt: P, navigator: N) -> Self {
        Self {
            prompt,
            navigator,
            redirect_path: DASHBOARD_PATH.to_string(),
        }
    }

    #[must_use]
    pub fn with_redirect_path(mut self, path: impl Into<String>) -> Self {
        self.redirect_path = path.into();
        self
    }

    pub fn prompt(&self) -> &P {
        &self.prompt
    }

    pub fn navigator(&self) -> &N {
        &self.navigator
    }

    pub fn into_parts(self) -> (P, N) {
        (self.prompt, self.navigator)
    }

    /// Prompts for a PIN and runs `perform_call` with it until the call
    /// succeeds, the user cancels, or the server locks the account.
    ///
    /// `perform_call` must issue exactly one request per invocation. A
    /// transport error is treated like a rejected PIN and shown on the next
    /// prompt, and so is any response whose body is not JSON.
    ///
    /// # Errors
    /// Returns `VerificationError::Cancelled` when the prompt is dismissed and
    /// `VerificationError::Redirecting` after a lockout.
    #[instrument(skip(self, perform_call))]
    pub async fn run_with_verification<F, Fut, R, E>(
        &mut self,
        prompt_text: &str,
        mut perform_call: F,
    ) -> Result<Value, VerificationError>
    where
        F: FnMut(PinCode) -> Fut,
        Fut: Future<Output = Result<R, E>>,
        R: ResponseLike,
        E: Display,
    {
        let mut last_error: Option<String> = None;
        let mut attempt: u32 = 0;

        loop {
            attempt += 1;
            let outcome = match self
                .prompt
                .request_code(prompt_text, last_error.as_deref())
                .await
            {
                Ok(code) => attempt_call(&mut perform_call, code).await,
                Err(Cancelled) => ActionOutcome::Cancelled,
            };

            match outcome {
                ActionOutcome::Success(body) => {
                    debug!(attempt, "PIN verified");
                    return Ok(body);
                }
                ActionOutcome::Cancelled => {
                    debug!(attempt, "PIN verification cancelled");
                    return Err(VerificationError::Cancelled);
                }
                ActionOutcome::Locked(info) => {
                    return Err(VerificationError::Redirecting(self.redirect(&info)));
                }
                ActionOutcome::Retryable(message) => {
                    warn!(attempt, "PIN attempt rejected: {message}");
                    last_error = Some(message);
                }
            }
        }
    }

    // One-way exit: alert, navigate once, hand the caller a terminal signal.
    fn redirect(&mut self, info: &LockoutInfo) -> Redirect {
        let message = info.redirect_message();
        error!("PIN attempts locked: {}", info.message);

        self.navigator.alert(&message);
        let location = self.navigator.navigate(&self.redirect_path);

        Redirect { message, location }
    }
}

async fn attempt_call<F, Fut, R, E>(perform_call: &mut F, code: PinCode) -> ActionOutcome<Value>
where
    F: FnMut(PinCode) -> Fut,
    Fut: Future<Output = Result<R, E>>,
    R: ResponseLike,
    E: Display,
{
    let response = match perform_call(code).await {
        Ok(response) => response,
        Err(err) => return ActionOutcome::Retryable(err.to_string()),
    };

    if !response.ok() {
        let body = response.read_json().await.ok();
        return ActionOutcome::from_error_body(body.as_ref());
    }

    match response.read_json().await {
        Ok(body) => ActionOutcome::Success(body),
        Err(err) => {
            debug!("success response without JSON body: {err}");
            ActionOutcome::Retryable(UNKNOWN_ERROR.to_string())
        }
    }
}
