//! HTTP server implementation using Axum.

use crate::config::ServerConfig;
use crate::handler::{handle_call, handle_health};
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use lpfcp::{Dispatch, LpfcpError, Result};
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

/// Build the router serving `dispatcher` on `config.path`, plus `GET /health`.
pub fn router(dispatcher: Arc<dyn Dispatch>, config: &ServerConfig) -> Router {
    let mut app = Router::new()
        .route(&config.path, post(handle_call))
        .layer(ConcurrencyLimitLayer::new(config.max_concurrent_calls))
        .layer(DefaultBodyLimit::max(config.max_body_bytes))
        .route("/health", get(handle_health))
        .layer(TraceLayer::new_for_http());

    if config.permissive_cors {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
        app = app.layer(cors);
    }

    app.with_state(dispatcher)
}

fn listen_addr(config: &ServerConfig) -> Result<SocketAddr> {
    let ip: IpAddr = config.host.parse().map_err(|e| LpfcpError::Config {
        message: format!("Invalid listen host {}: {}", config.host, e),
    })?;
    Ok(SocketAddr::new(ip, config.port))
}

/// Handle to a running server.
///
/// Dropping the handle stops the server immediately, cancelling in-flight
/// calls. Use [`shutdown_with_timeout`](Self::shutdown_with_timeout), or
/// [`shutdown`](Self::shutdown) followed by [`join`](Self::join), to let them finish.
pub struct LpfcpServer {
    addr: SocketAddr,
    path: String,
    shutdown_tx: Option<oneshot::Sender<()>>,
    task_handle: Option<tokio::task::JoinHandle<()>>,
}

impl LpfcpServer {
    /// Bind and start serving in the background.
    ///
    /// Returns once the listener is bound, so [`addr`](Self::addr) reports the
    /// real port when `config.port` is 0.
    pub async fn start(dispatcher: Arc<dyn Dispatch>, config: ServerConfig) -> Result<Self> {
        config.validate()?;

        let addr = listen_addr(&config)?;
        let listener = tokio::net::TcpListener::bind(addr).await?;
        let actual_addr = listener.local_addr()?;
        let app = router(dispatcher, &config);

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let task_handle = tokio::spawn(async move {
            let shutdown = async {
                let _ = shutdown_rx.await;
            };
            if let Err(e) = axum::serve(listener, app)
                .with_graceful_shutdown(shutdown)
                .await
            {
                error!("LPFCP server error: {}", e);
            }
            info!("LPFCP server on {} stopped", actual_addr);
        });

        info!(
            "LPFCP server listening on http://{}{}",
            actual_addr, config.path
        );

        Ok(Self {
            addr: actual_addr,
            path: config.path,
            shutdown_tx: Some(shutdown_tx),
            task_handle: Some(task_handle),
        })
    }

    /// The address the server is listening on.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Full URL of the call route, e.g. `http://127.0.0.1:8080/lpfcp`.
    pub fn endpoint(&self) -> String {
        format!("http://{}{}", self.addr, self.path)
    }

    /// Stop accepting connections. In-flight calls are allowed to finish as long
    /// as the handle is kept until [`join`](Self::join) returns.
    pub fn shutdown(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }

    /// Wait until the server task exits.
    pub async fn join(mut self) {
        if let Some(handle) = self.task_handle.take() {
            if let Err(e) = handle.await {
                error!("LPFCP server task failed: {}", e);
            }
        }
    }

    /// Stop gracefully, waiting at most `grace` for in-flight calls.
    ///
    /// Returns `false` if the grace period ran out and the server was aborted.
    pub async fn shutdown_with_timeout(mut self, grace: Duration) -> bool {
        self.shutdown();
        let Some(mut handle) = self.task_handle.take() else {
            return true;
        };
        match tokio::time::timeout(grace, &mut handle).await {
            Ok(Ok(())) => true,
            Ok(Err(e)) => {
                error!("LPFCP server task failed: {}", e);
                true
            }
            Err(_) => {
                warn!(
                    "LPFCP server on {} did not stop within {:?}, aborting",
                    self.addr, grace
                );
                handle.abort();
                false
            }
        }
    }
}

impl Drop for LpfcpServer {
    fn drop(&mut self) {
        self.shutdown();
        if let Some(handle) = self.task_handle.take() {
            handle.abort();
        }
    }
}

impl std::fmt::Debug for LpfcpServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LpfcpServer")
            .field("addr", &self.addr)
            .field("path", &self.path)
            .field("running", &self.shutdown_tx.is_some())
            .finish()
    }
}
