//! PIN-gated account and admin actions.
//!
//! [`CronPost`] pairs an [`ApiClient`] with a [`PinVerifier`]. Every action
//! that needs a PIN builds its request body from the code the verifier hands
//! out, so the PIN never outlives a single attempt.

pub mod admin;
pub mod dashboard;
pub mod security;

pub use self::admin::{UserAction, UserActionReport};

use crate::{
    api::{ApiClient, ApiError, decode},
    pin::{Navigator, PinCode, PinPrompt, PinVerifier, Redirect, VerificationError},
};
use reqwest::Method;
use serde::{Serialize, de::DeserializeOwned};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ActionError {
    #[error("Action cancelled.")]
    Cancelled,
    #[error("{0}")]
    Redirecting(Redirect),
    #[error(transparent)]
    Api(#[from] ApiError),
    /// Refused locally before any request was sent.
    #[error("{0}")]
    Precondition(String),
}

impl From<VerificationError> for ActionError {
    fn from(err: VerificationError) -> Self {
        match err {
            VerificationError::Cancelled => Self::Cancelled,
            VerificationError::Redirecting(redirect) => Self::Redirecting(redirect),
        }
    }
}

pub struct CronPost<P, N> {
    api: ApiClient,
    verifier: PinVerifier<P, N>,
}

impl<P: PinPrompt, N: Navigator> CronPost<P, N> {
    pub fn new(api: ApiClient, verifier: PinVerifier<P, N>) -> Self {
        Self { api, verifier }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn verifier(&self) -> &PinVerifier<P, N> {
        &self.verifier
    }

    pub fn into_verifier(self) -> PinVerifier<P, N> {
        self.verifier
    }

    /// Runs one PIN-gated request through the verifier and decodes the
    /// successful body.
    async fn verified<B, T, F>(
        &mut self,
        prompt_text: &str,
        method: Method,
        path: &str,
        make_body: F,
    ) -> Result<T, ActionError>
    where
        B: Serialize,
        T: DeserializeOwned,
        F: Fn(PinCode) -> B,
    {
        let api = &self.api;
        let body = self
            .verifier
            .run_with_verification(prompt_text, |pin| {
                let body = make_body(pin);
                let method = method.clone();
                async move { api.send_json(method, path, Some(&body)).await }
            })
            .await?;

        Ok(decode(body)?)
    }
}

/// Client aimed at a closed local port; precondition tests must never
/// reach it.
#[cfg(test)]
pub(crate) fn offline() -> CronPost<crate::pin::StaticPin, crate::pin::TerminalNavigator<Vec<u8>>> {
    use crate::{api::ClientConfig, pin::{StaticPin, TerminalNavigator}};

    let base = url::Url::parse("http://127.0.0.1:9").unwrap();
    let api = ApiClient::new(ClientConfig::new(base.clone())).unwrap();
    let prompt = StaticPin::new(PinCode::parse("1234").unwrap());
    CronPost::new(
        api,
        PinVerifier::new(prompt, TerminalNavigator::new(base, Vec::new())),
    )
}
