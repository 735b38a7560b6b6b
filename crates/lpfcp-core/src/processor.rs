//! Request processor.
//!
//! Binds one target to its exposure registry and turns request bytes into an
//! envelope. Processing never fails: every problem (unparseable body, unknown
//! overload, bad arguments, a method error or panic) comes back as a `Failure`
//! envelope so the serving side always has something to answer with.

use crate::config::ProcessorOptions;
use crate::envelope::{Envelope, Failure, FailureKind};
use crate::registry::ExposureRegistry;
use crate::request::CallRequest;
use crate::resolver::resolve;
use crate::LpfcpError;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use tracing::{debug, warn};

/// Anything that can answer request bytes with an envelope.
///
/// Implemented by [`Processor`]; transports and server bindings hold it as
/// `Arc<dyn Dispatch>` so they do not depend on the target type.
pub trait Dispatch: Send + Sync {
    fn dispatch(&self, body: &[u8]) -> Envelope;
}

/// Serves calls against one target.
pub struct Processor<T> {
    target: T,
    registry: Arc<ExposureRegistry<T>>,
    options: ProcessorOptions,
}

impl<T> Processor<T> {
    pub fn new(target: T, registry: ExposureRegistry<T>) -> Self {
        Self::with_shared_registry(target, Arc::new(registry))
    }

    /// Build a processor reusing a registry shared with other processors.
    pub fn with_shared_registry(target: T, registry: Arc<ExposureRegistry<T>>) -> Self {
        Self {
            target,
            registry,
            options: ProcessorOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ProcessorOptions) -> Self {
        self.options = options;
        self
    }

    pub fn target(&self) -> &T {
        &self.target
    }

    pub fn registry(&self) -> &ExposureRegistry<T> {
        &self.registry
    }

    /// Execute one parsed request.
    pub fn process(&self, request: CallRequest) -> Envelope {
        let signature = request.signature();

        let method = match resolve(&*self.registry, &signature) {
            Ok(method) => method,
            Err(err) => {
                debug!("Rejected call to {}: {}", signature, err);
                let err = if self.options.reveal_unexposed {
                    err
                } else {
                    err.conceal()
                };
                return Envelope::failure(err.into());
            }
        };

        let (_, _, arguments) = request.into_parts();
        let outcome = catch_unwind(AssertUnwindSafe(|| method.invoke(&self.target, arguments)));

        match outcome {
            Ok(Ok(value)) => {
                debug!("Call to {} succeeded", signature);
                Envelope::Success(value)
            }
            Ok(Err(failure)) => {
                warn!("Call to {} failed: {}", signature, failure);
                Envelope::failure(failure)
            }
            Err(payload) => {
                let cause = Failure::from_panic(payload.as_ref());
                warn!("Exposed method {} panicked: {}", signature, cause.message);
                Envelope::failure(
                    Failure::new(
                        FailureKind::InvocationFailure,
                        format!("Exposed method {} panicked", signature),
                    )
                    .caused_by(cause),
                )
            }
        }
    }

    /// Parse request bytes and execute them.
    pub fn process_slice(&self, body: &[u8]) -> Envelope {
        match CallRequest::from_slice(body) {
            Ok(request) => self.process(request),
            Err(err) => {
                debug!("Malformed request: {}", err);
                let message = match err {
                    LpfcpError::MalformedRequest { message } => message,
                    other => other.to_string(),
                };
                Envelope::failure(Failure::new(FailureKind::MalformedRequest, message))
            }
        }
    }
}

impl<T: Send + Sync> Dispatch for Processor<T> {
    fn dispatch(&self, body: &[u8]) -> Envelope {
        self.process_slice(body)
    }
}

impl<T> std::fmt::Debug for Processor<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Processor")
            .field("target", &std::any::type_name::<T>())
            .field("registry", &self.registry)
            .field("options", &self.options)
            .finish()
    }
}
