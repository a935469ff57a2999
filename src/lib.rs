//! # CronPost client
//!
//! Library and command-line client for the CronPost scheduled messaging
//! service ("dead man's switch"). Sensitive account actions (check-in,
//! stopping message sending, security settings, admin user management) are
//! gated behind a 4-digit PIN that the server verifies on every request.
//!
//! ## PIN re-verification
//!
//! [`pin::PinVerifier`] drives the challenge/response loop:
//! 1. Ask the [`pin::PinPrompt`] for a code, showing the previous error.
//! 2. Perform exactly one authenticated request carrying the code.
//! 3. Return the JSON body on success, re-prompt on a retryable failure, or
//!    stop with [`pin::VerificationError::Redirecting`] once the server
//!    reports an account lockout.
//!
//! Cancellation is a typed signal ([`pin::Cancelled`]); it never travels as
//! an error string.
//!
//! Caller sites live in [`cronpost`] and the terminal front-end in [`cli`].

pub mod api;
pub mod cli;
pub mod cronpost;
pub mod pin;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);

/// Route the browser client sends users to after a PIN lockout.
pub const DASHBOARD_PATH: &str = "/dashboard";
