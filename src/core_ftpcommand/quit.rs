use crate::constants::status;
use crate::helpers::{send_status, ControlWriter};
use crate::session::Session;
use crate::Config;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Handles the QUIT command.
///
/// Only the goodbye is sent here; the connection loop stops reading after
/// QUIT and tears the session down.
pub async fn handle_quit_command(
    writer: ControlWriter,
    _config: Arc<Config>,
    session: Arc<Mutex<Session>>,
    _arg: String,
) -> Result<(), std::io::Error> {
    let session = session.lock().await;
    session.logger.info("Client requested QUIT.");
    send_status(&writer, &session.logger, status::CLOSING).await
}
