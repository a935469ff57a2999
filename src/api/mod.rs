//! JSON client for the CronPost REST API.
//!
//! Requests carry the bearer token supplied by the caller; the client never
//! stores or logs PINs, it only serializes them into request bodies.

pub mod client;
pub mod errors;
pub mod types;

pub use self::client::{ApiClient, ClientConfig, decode, expect_json};
pub use self::errors::{ApiError, UNKNOWN_ERROR, describe_error, error_detail, sanitize_body};
