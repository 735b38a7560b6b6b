//! HTTP transport over reqwest.

use super::Transport;
use crate::config::{HttpTransportConfig, ProtocolConfig};
use crate::{LpfcpError, Result};
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use tracing::debug;
use url::Url;

/// POSTs each request to a fixed endpoint and returns the response body.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    endpoint: Url,
    config: HttpTransportConfig,
}

impl HttpTransport {
    /// Create a transport for `endpoint` with default timeouts.
    pub fn new(endpoint: &str) -> Result<Self> {
        Self::with_config(endpoint, HttpTransportConfig::default())
    }

    /// Create a transport with custom timeouts.
    pub fn with_config(endpoint: &str, config: HttpTransportConfig) -> Result<Self> {
        let endpoint = Url::parse(endpoint).map_err(|e| LpfcpError::Config {
            message: format!("Invalid endpoint {}: {}", endpoint, e),
        })?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(LpfcpError::Config {
                message: format!(
                    "Endpoint {} must use http or https, not {}",
                    endpoint,
                    endpoint.scheme()
                ),
            });
        }

        let client = Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| LpfcpError::Transport {
                message: format!("Failed to create HTTP client: {}", e),
                cause: None,
            })?;

        Ok(Self {
            client,
            endpoint,
            config,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: Bytes) -> Result<Bytes> {
        debug!("POST {} ({} bytes)", self.endpoint, request.len());

        let response = self
            .client
            .post(self.endpoint.clone())
            .header(CONTENT_TYPE, ProtocolConfig::CONTENT_TYPE)
            .body(request)
            .send()
            .await
            .map_err(|e| self.map_error(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LpfcpError::HttpStatus {
                status: status.as_u16(),
                endpoint: self.endpoint.to_string(),
            });
        }

        response.bytes().await.map_err(|e| self.map_error(e))
    }

    fn destination(&self) -> String {
        self.endpoint.to_string()
    }
}

impl HttpTransport {
    fn map_error(&self, err: reqwest::Error) -> LpfcpError {
        if err.is_timeout() {
            LpfcpError::Timeout(self.config.request_timeout)
        } else {
            LpfcpError::Transport {
                message: format!("POST {} failed: {}", self.endpoint, err),
                cause: std::error::Error::source(&err).map(|s| s.to_string()),
            }
        }
    }
}
