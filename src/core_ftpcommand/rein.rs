use crate::constants::status;
use crate::helpers::{send_status, ControlWriter};
use crate::session::Session;
use crate::Config;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Handles the REIN command: drops the working path, pending rename,
/// restart offset and data connection, then greets again.
pub async fn handle_rein_command(
    writer: ControlWriter,
    _config: Arc<Config>,
    session: Arc<Mutex<Session>>,
    _arg: String,
) -> Result<(), std::io::Error> {
    let mut session = session.lock().await;
    session.reset().await;
    session.logger.info("Session reinitialized.");
    send_status(&writer, &session.logger, status::READY).await
}
