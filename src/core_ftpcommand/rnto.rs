use crate::constants::status;
use crate::core_ftpcommand::utils::require_arg;
use crate::helpers::{send_reply, send_status, ControlWriter};
use crate::session::Session;
use crate::Config;
use std::sync::Arc;
use tokio::fs;
use tokio::sync::Mutex;

/// Handles the RNTO (Rename To) command.
///
/// Consumes the source stored by RNFR whatever the outcome. Without a
/// pending source the reply is 503 and nothing changes.
///
/// # Arguments
///
/// * `writer` - The control connection's write half.
/// * `session` - The session holding the pending rename source.
/// * `arg` - The new name, resolved like any other path argument.
pub async fn handle_rnto_command(
    writer: ControlWriter,
    _config: Arc<Config>,
    session: Arc<Mutex<Session>>,
    arg: String,
) -> Result<(), std::io::Error> {
    let mut session = session.lock().await;
    let pending = session.rename_from.take();
    if !require_arg(&writer, &session, "RNTO", &arg).await? {
        return Ok(());
    }

    let Some(source) = pending else {
        session.logger.warn("RNTO received without a preceding RNFR.");
        return send_status(&writer, &session.logger, status::BAD_SEQUENCE).await;
    };

    let target = session.resolve(&arg);
    match fs::rename(&source, &target.real_path).await {
        Ok(()) => {
            session
                .logger
                .info(format_args!("Renamed {:?} to {}", source, target.virtual_path));
            send_reply(
                &writer,
                &session.logger,
                status::REQUESTED_FILE_ACTION_OK,
                "File renamed.",
            )
            .await
        }
        Err(e) => {
            session
                .logger
                .error(format_args!("Failed to rename {:?}: {}", source, e));
            send_reply(&writer, &session.logger, status::FILE_UNAVAILABLE, e.to_string()).await
        }
    }
}
