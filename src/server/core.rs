use axum::Router;
use log::{error, info, warn};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

use crate::config::ServerConfig;
use crate::error::ServerError;
use crate::server::routes::router;
use crate::service::ResourceService;
use crate::storage::ResourceKind;

pub struct Server {
    listener: TcpListener,
    router: Router,
}

impl Server {
    /// Bind the listener and build the router around `service`
    pub async fn bind(
        config: &ServerConfig,
        service: Arc<ResourceService>,
    ) -> Result<Self, ServerError> {
        let addr = config.listen_addr();
        let listener = match TcpListener::bind(&addr).await {
            Ok(listener) => {
                info!("Server bound to {}", addr);
                listener
            }
            Err(e) => {
                error!("Failed to bind to {}: {}", addr, e);
                return Err(ServerError::Io(e));
            }
        };

        Ok(Self {
            listener,
            router: router(service, config.max_body_bytes),
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, ServerError> {
        Ok(self.listener.local_addr()?)
    }

    /// Serve requests until Ctrl-C
    pub async fn start(self) -> Result<(), ServerError> {
        info!("Starting document store on {}", self.local_addr()?);

        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("Server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

/// Check the data directory and create the per-kind and log subdirectories.
///
/// The data directory itself must already exist.
pub fn prepare_data_dirs(config: &ServerConfig) -> Result<(), ServerError> {
    let data_dir = config.data_dir_path();
    if !data_dir.is_dir() {
        return Err(ServerError::DataDirMissing(data_dir));
    }

    for kind in ResourceKind::ALL {
        std::fs::create_dir_all(config.resource_dir(kind))?;
    }
    std::fs::create_dir_all(config.log_dir())?;
    Ok(())
}
