use once_cell::sync::Lazy;
use regex::Regex;
use secrecy::{ExposeSecret, SecretString};
use serde::{Serialize, Serializer};
use std::fmt;

static PIN_FORMAT: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"^[0-9]{4}$").ok());

/// Message shown when the entered text is not a 4-digit code.
pub const PIN_FORMAT_MESSAGE: &str = "Please enter a valid 4-digit PIN.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Please enter a valid 4-digit PIN.")]
pub struct PinFormatError;

/// A syntactically valid 4-digit PIN.
///
/// Only the format is checked here; whether the PIN is correct is decided by
/// the server. The digits stay wrapped in a [`SecretString`] and `Debug`
/// output is redacted.
#[derive(Clone)]
pub struct PinCode(SecretString);

impl PinCode {
    /// Parses `input` as a PIN, rejecting anything that is not exactly four
    /// ASCII digits. Unicode digits from other scripts are rejected too.
    ///
    /// # Errors
    /// Returns `PinFormatError` when the input is not four ASCII digits.
    pub fn parse(input: &str) -> Result<Self, PinFormatError> {
        if is_valid_pin(input) {
            Ok(Self(SecretString::from(input.to_string())))
        } else {
            Err(PinFormatError)
        }
    }

    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

/// Checks the client-side PIN format.
#[must_use]
pub fn is_valid_pin(input: &str) -> bool {
    PIN_FORMAT
        .as_ref()
        .is_some_and(|re| re.is_match(input))
}

impl fmt::Debug for PinCode {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("PinCode([REDACTED])")
    }
}

impl PartialEq for PinCode {
    fn eq(&self, other: &Self) -> bool {
        self.expose() == other.expose()
    }
}

impl Eq for PinCode {}

// Request bodies are the only place the digits leave the process.
impl Serialize for PinCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.expose())
    }
}
