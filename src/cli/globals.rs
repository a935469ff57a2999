use crate::api::ClientConfig;
use secrecy::SecretString;
use std::time::Duration;
use url::Url;

/// Connection settings shared by every command.
#[derive(Debug, Clone)]
pub struct GlobalArgs {
    pub api_url: Url,
    pub token: SecretString,
    /// Pre-configured PIN; when absent the PIN is read from the terminal.
    pub pin: Option<SecretString>,
    pub timeout: Option<Duration>,
}

impl GlobalArgs {
    #[must_use]
    pub fn new(api_url: Url, token: SecretString) -> Self {
        Self {
            api_url,
            token,
            pin: None,
            timeout: None,
        }
    }

    pub fn set_pin(&mut self, pin: SecretString) {
        self.pin = Some(pin);
    }

    pub fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = Some(timeout);
    }

    #[must_use]
    pub fn client_config(&self) -> ClientConfig {
        let config = ClientConfig::new(self.api_url.clone()).with_token(self.token.clone());
        match self.timeout {
            Some(timeout) => config.with_timeout(timeout),
            None => config,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_global_args() {
        let url = Url::parse("https://cronpost.example").unwrap();
        let mut args = GlobalArgs::new(url, SecretString::from("token".to_string()));
        assert!(args.pin.is_none());

        args.set_pin(SecretString::from("1234".to_string()));
        args.set_timeout(Duration::from_secs(10));

        let config = args.client_config();
        assert_eq!(config.base_url.as_str(), "https://cronpost.example/");
        assert_eq!(config.timeout, Some(Duration::from_secs(10)));
        assert_eq!(
            config.token.as_ref().map(|token| token.expose_secret()),
            Some("token")
        );
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let url = Url::parse("https://cronpost.example").unwrap();
        let mut args = GlobalArgs::new(url, SecretString::from("token-value".to_string()));
        args.set_pin(SecretString::from("1234".to_string()));

        let debug = format!("{args:?}");
        assert!(!debug.contains("token-value"));
        assert!(!debug.contains("1234"));
    }
}
