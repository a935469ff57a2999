use crate::api::{describe_error, error_detail};
use crate::pin::lockout::LockoutInfo;
use serde_json::Value;

/// Classification of one verification attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionOutcome<T> {
    Success(T),
    Cancelled,
    Locked(LockoutInfo),
    Retryable(String),
}

impl<T> ActionOutcome<T> {
    /// Classifies the body of a failed response. `None` means the body was
    /// missing or not JSON.
    #[must_use]
    pub fn from_error_body(body: Option<&Value>) -> Self {
        if let Some(info) = body.and_then(|body| LockoutInfo::from_detail(error_detail(body))) {
            return Self::Locked(info);
        }
        Self::Retryable(describe_error(body))
    }
}
