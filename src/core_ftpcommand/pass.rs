use crate::constants::status;
use crate::helpers::{send_status, ControlWriter};
use crate::session::Session;
use crate::Config;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Handles the PASS command. No credential check is made.
pub async fn handle_pass_command(
    writer: ControlWriter,
    _config: Arc<Config>,
    session: Arc<Mutex<Session>>,
    _arg: String,
) -> Result<(), std::io::Error> {
    let session = session.lock().await;
    send_status(&writer, &session.logger, status::LOGGED_IN).await
}
