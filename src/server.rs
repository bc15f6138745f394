use crate::core_network::network;
use crate::Config;
use anyhow::Result;
use log::{error, info};
use std::sync::Arc;

/// Runs the FTP server with the provided configuration.
///
/// Returns only when binding fails or the accept loop stops on an error.
pub async fn run(config: Config) -> Result<()> {
    info!("Starting server with config: {:?}", config);

    if let Err(e) = network::start_server(Arc::new(config)).await {
        error!("Server stopped: {:#}", e);
        return Err(e);
    }

    Ok(())
}
