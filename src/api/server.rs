use std::net::SocketAddr;
use axum::Router;
use tokio::signal;
use tracing::{info, error, debug};

use crate::error::Error;
use crate::config::Config;

/// API server runtime
///
/// Binds the configured address and serves the router until CTRL+C or
/// SIGTERM, letting in-flight requests finish.
pub struct ApiServer {
    /// Listening address
    address: SocketAddr,
    /// Router
    router: Router,
}

impl ApiServer {
    /// Create a server for `router` on the configured listen address
    pub fn new(config: &Config, router: Router) -> Result<Self, Error> {
        let address = config.api_address().parse::<SocketAddr>()
            .map_err(|e| Error::Config(format!("Invalid API address: {}", e)))?;

        Ok(Self { address, router })
    }

    /// Start the API server with graceful shutdown handling
    pub async fn start_with_shutdown(self) -> Result<(), Error> {
        info!("Starting API server on {}", self.address);

        let server = axum::Server::try_bind(&self.address)
            .map_err(|e| Error::Config(format!("Cannot bind {}: {}", self.address, e)))?
            .serve(self.router.into_make_service())
            .with_graceful_shutdown(shutdown_signal());

        if let Err(e) = server.await {
            error!("API server error: {}", e);
            return Err(Error::Internal(format!("API server error: {}", e)));
        }

        info!("API server shut down gracefully");
        Ok(())
    }

    /// The socket address the server listens on
    pub fn address(&self) -> &SocketAddr {
        &self.address
    }
}

/// Wait for CTRL+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => debug!("Received Ctrl+C signal"),
            Err(e) => {
                error!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
                debug!("Received SIGTERM signal");
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown");
}
