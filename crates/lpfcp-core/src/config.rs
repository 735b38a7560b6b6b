//! Centralized configuration for LPFCP.
//!
//! Protocol constants, network defaults for the HTTP transport, and the
//! tunable options of the request processor.

use std::time::Duration;

/// Protocol-level constants shared by clients and servers.
pub struct ProtocolConfig;

impl ProtocolConfig {
    pub const PROTOCOL_NAME: &'static str = "LPFCP";
    pub const DEFAULT_PATH: &'static str = "/lpfcp";
    pub const DEFAULT_PORT: u16 = 8080;
    pub const CONTENT_TYPE: &'static str = "application/json";
    pub const MAX_REQUEST_BODY_BYTES: usize = 4 * 1024 * 1024; // 4MB
}

/// Network-related configuration.
pub struct NetworkConfig;

impl NetworkConfig {
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
    pub const USER_AGENT: &'static str = "LPFCP-Client/0.3";
}

/// Configuration for [`HttpTransport`](crate::transport::HttpTransport).
#[derive(Debug, Clone)]
pub struct HttpTransportConfig {
    /// Total time allowed for one call, including reading the response body.
    pub request_timeout: Duration,
    /// Time allowed to establish the connection.
    pub connect_timeout: Duration,
    /// User-Agent header sent with every call.
    pub user_agent: String,
}

impl Default for HttpTransportConfig {
    fn default() -> Self {
        Self {
            request_timeout: NetworkConfig::REQUEST_TIMEOUT,
            connect_timeout: NetworkConfig::CONNECT_TIMEOUT,
            user_agent: NetworkConfig::USER_AGENT.to_string(),
        }
    }
}

/// Options for [`Processor`](crate::processor::Processor).
#[derive(Debug, Clone, Copy)]
pub struct ProcessorOptions {
    /// Report declared-but-unexposed methods as `NotExposed`.
    /// When false they are indistinguishable from absent methods (`MethodNotFound`).
    pub reveal_unexposed: bool,
}

impl Default for ProcessorOptions {
    fn default() -> Self {
        Self {
            reveal_unexposed: true,
        }
    }
}
