//! HTTP client for the assistant endpoint.

use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use super::AssistantEndpoint;
use super::protocol::{AssistantReply, AssistantRequest};
use crate::config::AssistantConfig;
use crate::error::{AssistantError, ConfigError};

/// Longest error body kept from a failed response.
const MAX_ERROR_BODY: usize = 512;

/// POSTs queries as JSON to a single URL.
pub struct HttpAssistant {
    client: reqwest::Client,
    url: String,
    api_token: Option<SecretString>,
    timeout: Option<Duration>,
}

impl HttpAssistant {
    /// Client for `url` with reqwest defaults (no timeout, no auth).
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
            api_token: None,
            timeout: None,
        }
    }

    pub fn from_config(config: &AssistantConfig) -> Result<Self, ConfigError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;

        Ok(Self {
            client,
            url: config.endpoint_url(),
            api_token: config.api_token.clone(),
            timeout: config.timeout,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    fn transport_error(&self, e: reqwest::Error) -> AssistantError {
        match self.timeout {
            Some(timeout) if e.is_timeout() => AssistantError::Timeout {
                url: self.url.clone(),
                timeout,
            },
            _ => AssistantError::Transport {
                url: self.url.clone(),
                reason: e.to_string(),
            },
        }
    }
}

#[async_trait]
impl AssistantEndpoint for HttpAssistant {
    async fn query(&self, request: &AssistantRequest<'_>) -> Result<AssistantReply, AssistantError> {
        debug!(url = %self.url, cases = request.cases.len(), "Posting assistant query");

        let mut builder = self.client.post(&self.url).json(request);
        if let Some(token) = &self.api_token {
            builder = builder.bearer_auth(token.expose_secret());
        }

        let resp = builder.send().await.map_err(|e| self.transport_error(e))?;

        let status = resp.status();
        if !status.is_success() {
            let mut body = resp.text().await.unwrap_or_default();
            if body.len() > MAX_ERROR_BODY {
                let cut = (0..=MAX_ERROR_BODY)
                    .rev()
                    .find(|&i| body.is_char_boundary(i))
                    .unwrap_or(0);
                body.truncate(cut);
            }
            return Err(AssistantError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = resp.bytes().await.map_err(|e| self.transport_error(e))?;
        serde_json::from_slice(&bytes).map_err(|e| AssistantError::InvalidResponse {
            reason: e.to_string(),
        })
    }
}
