use crate::{
    api::ApiClient,
    cli::globals::GlobalArgs,
    cronpost::{ActionError, CronPost},
    pin::{Cancelled, PinCode, PinPrompt, PinVerifier, StaticPin, TerminalNavigator, TerminalPrompt},
};
use anyhow::{Context, Result, anyhow};
use std::io::{BufReader, Stderr, Stdin};
use tracing::debug;

/// Where the CLI gets PINs from: the terminal, or `--pin`/`CRONPOST_PIN`.
pub enum CliPrompt {
    Terminal(TerminalPrompt<BufReader<Stdin>, Stderr>),
    Static(StaticPin),
}

impl CliPrompt {
    /// # Errors
    /// Returns an error if the configured PIN is not four digits.
    pub fn from_globals(globals: &GlobalArgs) -> Result<Self> {
        match &globals.pin {
            Some(pin) => {
                let prompt = StaticPin::from_secret(pin).context("invalid CRONPOST_PIN")?;
                debug!("using configured PIN");
                Ok(Self::Static(prompt))
            }
            None => Ok(Self::Terminal(TerminalPrompt::stdio())),
        }
    }

    /// Server message that rejected the configured PIN.
    #[must_use]
    pub fn rejection(&self) -> Option<&str> {
        match self {
            Self::Terminal(_) => None,
            Self::Static(prompt) => prompt.rejection(),
        }
    }
}

impl PinPrompt for CliPrompt {
    async fn request_code(
        &mut self,
        prompt_text: &str,
        initial_error: Option<&str>,
    ) -> Result<PinCode, Cancelled> {
        match self {
            Self::Terminal(prompt) => prompt.request_code(prompt_text, initial_error).await,
            Self::Static(prompt) => prompt.request_code(prompt_text, initial_error).await,
        }
    }
}

pub type Session = CronPost<CliPrompt, TerminalNavigator>;

/// Builds the API client and PIN verifier for one command.
///
/// # Errors
/// Returns an error if the PIN is malformed or the HTTP client cannot be built.
pub fn connect(globals: &GlobalArgs) -> Result<Session> {
    let prompt = CliPrompt::from_globals(globals)?;
    let api = ApiClient::new(globals.client_config()).context("could not create API client")?;
    let navigator = TerminalNavigator::stderr(globals.api_url.clone());

    Ok(CronPost::new(api, PinVerifier::new(prompt, navigator)))
}

/// Turns a caller-site result into the command result.
///
/// Cancellation is not a failure: it prints `Action cancelled.` and yields
/// `None`. A configured PIN the server rejected is reported as an error.
///
/// # Errors
/// Returns every other `ActionError`, including the lockout redirect.
pub fn settle<T>(session: &Session, result: Result<T, ActionError>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(ActionError::Cancelled) => match session.verifier().prompt().rejection() {
            Some(rejection) => Err(anyhow!("Configured PIN was rejected: {rejection}")),
            None => {
                println!("{}", ActionError::Cancelled);
                Ok(None)
            }
        },
        Err(err) => Err(err.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pin::Redirect;
    use secrecy::SecretString;
    use url::Url;

    fn globals(pin: Option<&str>) -> GlobalArgs {
        let url = Url::parse("http://127.0.0.1:9").unwrap();
        let mut globals = GlobalArgs::new(url, SecretString::from("token".to_string()));
        if let Some(pin) = pin {
            globals.set_pin(SecretString::from(pin.to_string()));
        }
        globals
    }

    #[test]
    fn test_configured_pin_must_be_valid() {
        assert!(matches!(
            CliPrompt::from_globals(&globals(Some("1234"))),
            Ok(CliPrompt::Static(_))
        ));
        assert!(CliPrompt::from_globals(&globals(Some("12a4"))).is_err());
    }

    fn session_with(prompt: CliPrompt) -> Session {
        let url = Url::parse("http://127.0.0.1:9").unwrap();
        let api = ApiClient::new(globals(None).client_config()).unwrap();
        CronPost::new(api, PinVerifier::new(prompt, TerminalNavigator::stderr(url)))
    }

    #[test]
    fn test_settle() {
        let session = connect(&globals(Some("1234"))).unwrap();

        assert_eq!(settle(&session, Ok(7)).unwrap(), Some(7));
        assert_eq!(
            settle::<()>(&session, Err(ActionError::Cancelled)).unwrap(),
            None
        );

        let redirect = Redirect {
            message: "Locked.".to_string(),
            location: "http://127.0.0.1:9/dashboard".to_string(),
        };
        let err = settle::<()>(&session, Err(ActionError::Redirecting(redirect))).unwrap_err();
        assert!(
            err.to_string()
                .contains("redirecting to http://127.0.0.1:9/dashboard")
        );
    }

    #[tokio::test]
    async fn test_settle_reports_rejected_pin() {
        let mut prompt = CliPrompt::from_globals(&globals(Some("1234"))).unwrap();
        prompt.request_code("Enter PIN", None).await.unwrap();
        assert_eq!(
            prompt
                .request_code("Enter PIN", Some("Invalid PIN code."))
                .await,
            Err(Cancelled)
        );
        assert_eq!(prompt.rejection(), Some("Invalid PIN code."));

        let session = session_with(prompt);
        let err = settle::<()>(&session, Err(ActionError::Cancelled)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Configured PIN was rejected: Invalid PIN code."
        );
    }
}
