//! Document store server - Entry Point
//!
//! Serves JSON and text documents stored as files under a data directory.

use log::{error, info};
use std::process::ExitCode;
use std::sync::Arc;

use docstore_server::config::ServerConfig;
use docstore_server::error::ServerError;
use docstore_server::logging::{RollingFileLogger, setup_logging};
use docstore_server::server::prepare_data_dirs;
use docstore_server::storage::ResourceStore;
use docstore_server::{ResourceService, Server};

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), ServerError> {
    let config = ServerConfig::load()?;
    prepare_data_dirs(&config)?;

    let file_logger = Arc::new(RollingFileLogger::new(
        config.log_dir(),
        &config.log_base_name,
        config.log_retention,
    ));
    setup_logging(&config.log_level, Arc::clone(&file_logger))?;

    info!("Launching document store server...");
    info!("Data directory: {}", config.data_dir);

    let store = ResourceStore::with_stripes(config.data_dir_path(), config.lock_stripes);
    let service = Arc::new(ResourceService::new(store, file_logger));

    let server = Server::bind(&config, service).await?;
    server.start().await
}
