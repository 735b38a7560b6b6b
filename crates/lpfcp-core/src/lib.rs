//! LPFCP - Lightweight remote function call protocol.
//!
//! A caller invokes a method on a remote object through a typed interface; the
//! call is serialized into a request (method name, parameter type descriptors,
//! arguments), carried by a transport, executed by a processor against a target,
//! and answered with a success/failure envelope that is unwrapped at one point
//! on the calling side.
//!
//! Only methods explicitly registered in an [`ExposureRegistry`] are callable.
//! Overloads sharing a name are told apart by their parameter descriptors.
//!
//! The HTTP server binding lives in the `lpfcp-axum` crate.
//!
//! # Example
//!
//! ```rust
//! use lpfcp::{ExposureRegistry, Processor, Proxy};
//! use std::sync::Arc;
//!
//! lpfcp::interface! {
//!     pub interface Calculator => CalculatorClient {
//!         fn add(a: i32, b: i32) -> i32;
//!         fn multiply(a: i32, b: i32) -> i32;
//!     }
//! }
//!
//! struct CalculatorImpl;
//!
//! #[tokio::main]
//! async fn main() -> lpfcp::Result<()> {
//!     let registry = ExposureRegistry::new()
//!         .declare::<Calculator>()
//!         .expose("add", |_: &CalculatorImpl, (a, b): (i32, i32)| a + b)?;
//!
//!     let processor = Arc::new(Processor::new(CalculatorImpl, registry));
//!     let client = CalculatorClient::new(Proxy::local(processor));
//!
//!     assert_eq!(client.add(3, 5).await?, 8);
//!     assert!(client.multiply(2, 3).await.unwrap_err().is_method_not_found());
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod descriptor;
pub mod encoding;
pub mod envelope;
pub mod error;
pub mod interface;
pub mod processor;
pub mod proxy;
pub mod registry;
pub mod request;
pub mod resolver;
pub mod transport;

// Re-export commonly used types
pub use config::{HttpTransportConfig, NetworkConfig, ProcessorOptions, ProtocolConfig};
pub use descriptor::{Arguments, Describe, MethodSignature, TypeDescriptor};
pub use encoding::{decode_value, encode_value};
pub use envelope::{unwrap_outcome, Envelope, Failure, FailureKind, Outcome, UnknownFailureKind};
pub use error::{LpfcpError, Result};
pub use interface::Interface;
pub use processor::{Dispatch, Processor};
pub use proxy::Proxy;
pub use registry::{ExposedMethod, ExposureRegistry};
pub use request::CallRequest;
pub use resolver::{resolve, ResolveError};
pub use transport::{LocalTransport, Transport};

#[cfg(feature = "http-client")]
pub use transport::HttpTransport;
