//! Axum server binding for LPFCP.
//!
//! Serves any [`Dispatch`](lpfcp::Dispatch) implementation (normally an
//! [`lpfcp::Processor`]) over HTTP: the request body is handed to the processor
//! unchanged and the envelope it produces is returned with status 200. Only
//! problems outside the protocol (wrong path, oversized body) produce other
//! status codes.
//!
//! # Example
//!
//! ```rust,no_run
//! use lpfcp::{ExposureRegistry, Processor};
//! use lpfcp_axum::{LpfcpServer, ServerConfig};
//! use std::sync::Arc;
//!
//! struct Greeter;
//!
//! #[tokio::main]
//! async fn main() -> lpfcp::Result<()> {
//!     let registry = ExposureRegistry::new()
//!         .expose("hello", |_: &Greeter, ()| "Hello, World!".to_string())?;
//!     let processor = Arc::new(Processor::new(Greeter, registry));
//!
//!     let server = LpfcpServer::start(processor, ServerConfig::default()).await?;
//!     println!("serving on {}", server.endpoint());
//!     server.join().await;
//!     Ok(())
//! }
//! ```

mod config;
mod handler;
mod server;

pub use config::ServerConfig;
pub use handler::{handle_call, handle_health};
pub use server::{router, LpfcpServer};
