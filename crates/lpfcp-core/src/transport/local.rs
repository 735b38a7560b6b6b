//! In-process transport.

use super::Transport;
use crate::processor::Dispatch;
use crate::{LpfcpError, Result};
use async_trait::async_trait;
use bytes::Bytes;
use std::sync::Arc;

/// Hands request bytes straight to a processor in the same process.
///
/// The bytes still go through the full encode/decode path, so behavior matches
/// a remote call exactly. Dispatch runs on the blocking pool because exposed
/// methods are synchronous.
#[derive(Clone)]
pub struct LocalTransport {
    dispatcher: Arc<dyn Dispatch>,
}

impl LocalTransport {
    pub fn new(dispatcher: Arc<dyn Dispatch>) -> Self {
        Self { dispatcher }
    }
}

#[async_trait]
impl Transport for LocalTransport {
    async fn send(&self, request: Bytes) -> Result<Bytes> {
        let dispatcher = Arc::clone(&self.dispatcher);
        let envelope = tokio::task::spawn_blocking(move || dispatcher.dispatch(&request))
            .await
            .map_err(|e| LpfcpError::Transport {
                message: "local dispatch task did not complete".to_string(),
                cause: Some(e.to_string()),
            })?;
        Ok(Bytes::from(envelope.to_vec()?))
    }

    fn destination(&self) -> String {
        "local".to_string()
    }
}

impl std::fmt::Debug for LocalTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalTransport").finish_non_exhaustive()
    }
}
