//! Calling side.
//!
//! A [`Proxy`] turns a typed call into a request, sends it through a transport,
//! and unwraps the envelope that comes back. Generated interface stubs
//! (see [`interface!`](crate::interface!)) are thin wrappers around
//! [`Proxy::invoke`].

use crate::descriptor::Arguments;
use crate::envelope::{Envelope, Outcome};
use crate::processor::Dispatch;
use crate::request::CallRequest;
use crate::transport::{LocalTransport, Transport};
use crate::Result;
use bytes::Bytes;
use serde::de::DeserializeOwned;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Shared handle for issuing calls. Cheap to clone; safe to use from many tasks.
#[derive(Clone)]
pub struct Proxy {
    transport: Arc<dyn Transport>,
}

impl Proxy {
    pub fn new(transport: impl Transport + 'static) -> Self {
        Self {
            transport: Arc::new(transport),
        }
    }

    /// Proxy sharing an existing transport.
    pub fn from_shared(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Proxy calling a processor in the same process.
    pub fn local(dispatcher: Arc<dyn Dispatch>) -> Self {
        Self::new(LocalTransport::new(dispatcher))
    }

    /// Proxy posting to an HTTP endpoint, e.g. `http://127.0.0.1:8080/lpfcp`.
    #[cfg(feature = "http-client")]
    pub fn http(endpoint: &str) -> Result<Self> {
        Ok(Self::new(crate::transport::HttpTransport::new(endpoint)?))
    }

    /// Call `method_name` with `arguments` and return the decoded success value.
    ///
    /// A failure envelope becomes [`LpfcpError::Remote`](crate::LpfcpError::Remote);
    /// anything that prevented reading an envelope is a transport error.
    pub async fn invoke<A, R>(&self, method_name: &str, arguments: A) -> Result<R>
    where
        A: Arguments,
        R: DeserializeOwned,
    {
        self.invoke_outcome(method_name, arguments)
            .await
            .and_then(crate::envelope::unwrap_outcome)
    }

    /// Like [`invoke`](Self::invoke), but keeps a failure envelope as data.
    pub async fn invoke_outcome<A, R>(&self, method_name: &str, arguments: A) -> Result<Outcome<R>>
    where
        A: Arguments,
        R: DeserializeOwned,
    {
        let request = CallRequest::from_arguments(method_name, &arguments)?;
        let body = Bytes::from(request.to_vec()?);
        debug!(
            "Calling {} via {}",
            request.signature(),
            self.transport.destination()
        );

        let response = self.transport.send(body).await?;
        Envelope::decode(&response)?.into_outcome()
    }

    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }
}

impl fmt::Debug for Proxy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Proxy")
            .field("destination", &self.transport.destination())
            .finish()
    }
}
