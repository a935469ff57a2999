use crate::{
    APP_USER_AGENT,
    api::errors::{ApiError, describe_error},
    pin::ResponseLike,
};
use reqwest::{Client, Method, Response, header::CONTENT_TYPE};
use secrecy::{ExposeSecret, SecretString};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

/// Connection settings for [`ApiClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: Url,
    pub token: Option<SecretString>,
    /// Per-request timeout. `None` leaves requests unbounded.
    pub timeout: Option<Duration>,
}

impl ClientConfig {
    #[must_use]
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            token: None,
            timeout: None,
        }
    }

    #[must_use]
    pub fn with_token(mut self, token: SecretString) -> Self {
        self.token = Some(token);
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
    token: Option<SecretString>,
}

impl ApiClient {
    /// Builds a client from `config`.
    ///
    /// # Errors
    /// Returns `ApiError::Config` if the HTTP client cannot be created.
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        let mut builder = Client::builder().user_agent(APP_USER_AGENT);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        let http = builder
            .build()
            .map_err(|err| ApiError::Config(format!("Failed to build HTTP client: {err}")))?;

        Ok(Self {
            http,
            base_url: config.base_url,
            token: config.token,
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Builds a URL from the configured base URL and the provided path.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        build_url_with_base(self.base_url.as_str(), path)
    }

    /// Sends one request with an optional JSON body and returns the raw
    /// response, whatever its status.
    ///
    /// # Errors
    /// Returns `ApiError::Serialization` if the body cannot be encoded and
    /// `ApiError::Network`/`ApiError::Timeout` if the request fails.
    #[instrument(skip(self, body))]
    pub async fn send_json<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<Response, ApiError> {
        let url = self.url(path);
        let mut request = self.http.request(method, &url);

        if let Some(token) = &self.token {
            request = request.bearer_auth(token.expose_secret());
        }

        if let Some(body) = body {
            let payload = serde_json::to_vec(body)
                .map_err(|err| ApiError::Serialization(format!("Failed to encode request: {err}")))?;
            request = request.header(CONTENT_TYPE, "application/json").body(payload);
        }

        let response = request.send().await.map_err(map_request_error)?;
        debug!(status = response.status().as_u16(), "response received");

        Ok(response)
    }

    /// Fetches JSON with the bearer token.
    ///
    /// # Errors
    /// Returns an `ApiError` if the request fails, the server answers with a
    /// non-success status, or the body does not decode into `T`.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.send_json::<()>(Method::GET, path, None).await?;
        expect_json(response).await
    }

    /// Sends a JSON body and decodes the JSON answer.
    ///
    /// # Errors
    /// Same as [`ApiClient::get_json`], plus `ApiError::Serialization` for
    /// bodies that cannot be encoded.
    pub async fn request_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = self.send_json(method, path, Some(body)).await?;
        expect_json(response).await
    }
}

/// Parses a JSON response and surfaces HTTP errors with a readable message.
///
/// # Errors
/// Returns `ApiError::Http` for non-success statuses and `ApiError::Parse`
/// when the body does not decode into `T`.
pub async fn expect_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let status = response.status();
    let body = response.read_json().await;

    if status.is_success() {
        decode(body?)
    } else {
        Err(ApiError::Http {
            status: status.as_u16(),
            message: describe_error(body.ok().as_ref()),
        })
    }
}

/// Decodes an already parsed JSON body.
///
/// # Errors
/// Returns `ApiError::Parse` if `value` does not match `T`.
pub fn decode<T: DeserializeOwned>(value: Value) -> Result<T, ApiError> {
    serde_json::from_value(value)
        .map_err(|err| ApiError::Parse(format!("Failed to decode response: {err}")))
}

/// Builds a URL from an explicit base URL and the provided path.
fn build_url_with_base(base_url: &str, path: &str) -> String {
    let base = base_url.trim().trim_end_matches('/');
    let path = path.trim();

    if base.is_empty() {
        path.to_string()
    } else {
        format!("{}/{}", base, path.trim_start_matches('/'))
    }
}

/// Maps transport errors into `ApiError` variants with timeout detection.
fn map_request_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        ApiError::Timeout("Request timed out. Please try again.".to_string())
    } else {
        ApiError::Network(format!("Unable to reach the server: {err}"))
    }
}
