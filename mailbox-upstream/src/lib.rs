//! # Mailbox Upstream
//!
//! `reqwest` adapter for the upstream mail service API.
//!
//! Every call carries the minted service credential as a bearer token. Calls
//! are bounded by the client timeout and are never retried.

use std::time::Duration;

use mailbox_types::{MailApi, MailboxRequest, ServiceCredential, UpstreamBody, UpstreamError};
use reqwest::{Client, Method, Url};
use serde_json::value::RawValue;

/// Default upstream timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Error type for client construction.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Upstream mail API client.
pub struct HttpMailApi {
    base_url: Url,
    api_key: Option<String>,
    http: Client,
}

impl HttpMailApi {
    /// Creates a new client with a request timeout.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let base_url = Url::parse(base_url.trim_end_matches('/'))
            .map_err(|e| ClientError::InvalidBaseUrl(format!("{}: {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidBaseUrl(base_url.to_string()));
        }

        let http = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            base_url,
            api_key: None,
            http,
        })
    }

    /// Sets the API key sent as `X-API-Key`.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Full URL for a request; identifiers are percent-encoded as single segments.
    pub fn endpoint(&self, request: &MailboxRequest) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(request.path_segments());
        }
        url
    }

    async fn handle_response(resp: reqwest::Response) -> Result<UpstreamBody, UpstreamError> {
        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| UpstreamError::Transport(e.to_string()))?;

        if !status.is_success() {
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                body,
            });
        }

        RawValue::from_string(body).map_err(|e| UpstreamError::Decode(e.to_string()))
    }
}

#[async_trait::async_trait]
impl MailApi for HttpMailApi {
    async fn send(
        &self,
        request: &MailboxRequest,
        credential: &ServiceCredential,
    ) -> Result<UpstreamBody, UpstreamError> {
        let method = if request.is_delete() {
            Method::DELETE
        } else {
            Method::GET
        };
        let url = self.endpoint(request);
        tracing::debug!(%method, %url, "Calling upstream mail API");

        let mut req = self
            .http
            .request(method, url)
            .header("Authorization", credential.bearer());
        if let Some(key) = &self.api_key {
            req = req.header("X-API-Key", key);
        }

        let resp = req
            .send()
            .await
            .map_err(|e| UpstreamError::Transport(e.to_string()))?;
        Self::handle_response(resp).await
    }
}
