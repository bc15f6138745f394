use crate::constants::status;
use crate::core_ftpcommand::utils::require_arg;
use crate::helpers::{send_reply, send_status, ControlWriter};
use crate::session::Session;
use crate::Config;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Handles the REST command.
///
/// The offset is kept until the next RETR or STOR consumes it. A later REST
/// replaces it.
pub async fn handle_rest_command(
    writer: ControlWriter,
    _config: Arc<Config>,
    session: Arc<Mutex<Session>>,
    arg: String,
) -> Result<(), std::io::Error> {
    let mut session = session.lock().await;
    if !require_arg(&writer, &session, "REST", &arg).await? {
        return Ok(());
    }

    match arg.trim().parse::<u64>() {
        Ok(offset) => {
            session.restart_offset = Some(offset);
            send_reply(
                &writer,
                &session.logger,
                status::REQUEST_FILE_PENDING,
                format!("Restarting at {}. Send STOR or RETR.", offset),
            )
            .await
        }
        Err(_) => {
            session
                .logger
                .warn(format_args!("Invalid REST offset: {}", arg));
            send_status(&writer, &session.logger, status::BAD_ARGUMENTS).await
        }
    }
}
