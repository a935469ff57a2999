use crate::api::ApiError;
use serde_json::Value;
use std::future::Future;

/// The part of an HTTP response the verifier needs: whether the call
/// succeeded and its JSON body.
pub trait ResponseLike {
    fn ok(&self) -> bool;

    /// Consumes the response and parses its body as JSON.
    fn read_json(self) -> impl Future<Output = Result<Value, ApiError>>;
}

impl ResponseLike for reqwest::Response {
    fn ok(&self) -> bool {
        self.status().is_success()
    }

    async fn read_json(self) -> Result<Value, ApiError> {
        let text = self
            .text()
            .await
            .map_err(|err| ApiError::Parse(format!("Failed to read response: {err}")))?;
        parse_body(&text)
    }
}

/// Parses a raw response body.
///
/// # Errors
/// Returns `ApiError::Parse` if the body is not valid JSON, empty included.
pub fn parse_body(text: &str) -> Result<Value, ApiError> {
    serde_json::from_str(text)
        .map_err(|err| ApiError::Parse(format!("Failed to decode response: {err}")))
}
