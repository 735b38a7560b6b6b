//! Error types for LPFCP.
//!
//! Two families of errors reach a caller and they must never be confused:
//!
//! - **Transport errors** (`Transport`, `Timeout`, `HttpStatus`, `MalformedResponse`):
//!   the request never produced a readable envelope.
//! - **Remote failures** (`Remote`): the processor answered with a `Failure` envelope,
//!   for example because the method is not exposed or because it returned an error.
//!
//! The remaining variants are local mistakes (bad request shape, duplicate exposure,
//! invalid configuration) detected before anything is sent.

use crate::descriptor::MethodSignature;
use crate::envelope::{Failure, FailureKind};
use std::time::Duration;
use thiserror::Error;

/// Main error type for LPFCP operations.
#[derive(Debug, Error)]
pub enum LpfcpError {
    // Transport errors
    #[error("Transport error: {message}")]
    Transport {
        message: String,
        /// Optional cause description
        cause: Option<String>,
    },

    #[error("Request timeout after {0:?}")]
    Timeout(Duration),

    #[error("Unexpected HTTP status {status} from {endpoint}")]
    HttpStatus { status: u16, endpoint: String },

    #[error("Malformed response: {message}")]
    MalformedResponse {
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    // Application failures carried by an envelope
    #[error("Remote call failed: {}", .0.describe())]
    Remote(Failure),

    // Local errors
    #[error("Malformed request: {message}")]
    MalformedRequest { message: String },

    #[error("Method {0} is already exposed")]
    DuplicateExposure(MethodSignature),

    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    #[error("IO error: {message}")]
    Io {
        message: String,
        #[source]
        source: Option<std::io::Error>,
    },

    #[error("Configuration error: {message}")]
    Config { message: String },
}

/// Result type alias for LPFCP operations.
pub type Result<T> = std::result::Result<T, LpfcpError>;

impl From<std::io::Error> for LpfcpError {
    fn from(err: std::io::Error) -> Self {
        LpfcpError::Io {
            message: err.to_string(),
            source: Some(err),
        }
    }
}

impl From<serde_json::Error> for LpfcpError {
    fn from(err: serde_json::Error) -> Self {
        LpfcpError::Json {
            message: err.to_string(),
            source: Some(err),
        }
    }
}

impl From<Failure> for LpfcpError {
    fn from(failure: Failure) -> Self {
        LpfcpError::Remote(failure)
    }
}

impl LpfcpError {
    /// Create a malformed-response error without an underlying JSON error.
    pub fn malformed_response(message: impl Into<String>) -> Self {
        LpfcpError::MalformedResponse {
            message: message.into(),
            source: None,
        }
    }

    /// Create a malformed-request error.
    pub fn malformed_request(message: impl Into<String>) -> Self {
        LpfcpError::MalformedRequest {
            message: message.into(),
        }
    }

    /// Whether the error came from the transport boundary rather than from the
    /// remote method or the processor.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            LpfcpError::Transport { .. }
                | LpfcpError::Timeout(_)
                | LpfcpError::HttpStatus { .. }
                | LpfcpError::MalformedResponse { .. }
        )
    }

    /// The failure carried by a `Failure` envelope, if this is a remote failure.
    pub fn failure(&self) -> Option<&Failure> {
        match self {
            LpfcpError::Remote(failure) => Some(failure),
            _ => None,
        }
    }

    /// Whether the processor could not find an exposed method for the call.
    ///
    /// `NotExposed` counts as not found: callers should not rely on telling the two apart.
    pub fn is_method_not_found(&self) -> bool {
        self.failure().is_some_and(|f| {
            f.is_kind(FailureKind::MethodNotFound) || f.is_kind(FailureKind::NotExposed)
        })
    }

    /// Whether the remote method itself failed while executing.
    pub fn is_invocation_failure(&self) -> bool {
        self.failure()
            .is_some_and(|f| f.is_kind(FailureKind::InvocationFailure))
    }
}
