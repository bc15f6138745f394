use crate::constants::status;
use crate::helpers::{send_status, ControlWriter};
use crate::session::Session;
use crate::Config;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Handles the USER command. Any user name is accepted.
pub async fn handle_user_command(
    writer: ControlWriter,
    _config: Arc<Config>,
    session: Arc<Mutex<Session>>,
    arg: String,
) -> Result<(), std::io::Error> {
    let session = session.lock().await;
    session.logger.info(format_args!("USER {}", arg));
    send_status(&writer, &session.logger, status::USER_OK).await
}
