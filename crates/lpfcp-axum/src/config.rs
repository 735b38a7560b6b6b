//! Server configuration.

use lpfcp::{LpfcpError, ProtocolConfig, Result};

/// Default cap on calls executing at the same time.
const DEFAULT_MAX_CONCURRENT_CALLS: usize = 256;

/// Where and how an [`LpfcpServer`](crate::LpfcpServer) listens.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// IP address to bind.
    pub host: String,
    /// Port to bind. `0` picks a free port; read it back from `LpfcpServer::addr`.
    pub port: u16,
    /// Route the processor is mounted on.
    pub path: String,
    /// Requests with a larger body are rejected with 413.
    pub max_body_bytes: usize,
    /// Calls beyond this limit wait for a free slot.
    pub max_concurrent_calls: usize,
    /// Allow cross-origin calls from any origin.
    pub permissive_cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: ProtocolConfig::DEFAULT_PORT,
            path: ProtocolConfig::DEFAULT_PATH.to_string(),
            max_body_bytes: ProtocolConfig::MAX_REQUEST_BODY_BYTES,
            max_concurrent_calls: DEFAULT_MAX_CONCURRENT_CALLS,
            permissive_cors: false,
        }
    }
}

impl ServerConfig {
    /// Same settings on another port.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Same settings on another path.
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if !self.path.starts_with('/') {
            return Err(LpfcpError::Config {
                message: format!("Server path must start with '/', got {:?}", self.path),
            });
        }
        if self.path == "/health" {
            return Err(LpfcpError::Config {
                message: "Server path /health is reserved for the health check".to_string(),
            });
        }
        if self.max_concurrent_calls == 0 {
            return Err(LpfcpError::Config {
                message: "max_concurrent_calls must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}
