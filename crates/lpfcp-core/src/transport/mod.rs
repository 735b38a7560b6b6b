//! Transports.
//!
//! A transport moves opaque request bytes to a processor and brings the
//! envelope bytes back. It never interprets either. Anything that goes wrong
//! on the way (connection refused, timeout, non-2xx status) is reported as a
//! transport error, never as a failure envelope.

mod local;

#[cfg(feature = "http-client")]
mod http;

pub use local::LocalTransport;

#[cfg(feature = "http-client")]
pub use http::HttpTransport;

use crate::Result;
use async_trait::async_trait;
use bytes::Bytes;
use std::sync::Arc;

/// Request/response byte exchange with a processor.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Deliver one serialized request and return the serialized envelope.
    async fn send(&self, request: Bytes) -> Result<Bytes>;

    /// Short human-readable destination, used in logs.
    fn destination(&self) -> String;
}

#[async_trait]
impl<X: Transport + ?Sized> Transport for Arc<X> {
    async fn send(&self, request: Bytes) -> Result<Bytes> {
        (**self).send(request).await
    }

    fn destination(&self) -> String {
        (**self).destination()
    }
}
