use crate::constants::status;
use crate::core_ftpcommand::utils::require_arg;
use crate::helpers::{send_reply, send_status, ControlWriter};
use crate::session::Session;
use crate::Config;
use std::sync::Arc;
use tokio::fs;
use tokio::sync::Mutex;

/// Handles the DELE command.
///
/// Directories are refused; RMD removes those.
pub async fn handle_dele_command(
    writer: ControlWriter,
    _config: Arc<Config>,
    session: Arc<Mutex<Session>>,
    arg: String,
) -> Result<(), std::io::Error> {
    let session = session.lock().await;
    if !require_arg(&writer, &session, "DELE", &arg).await? {
        return Ok(());
    }

    let target = session.resolve(&arg);
    match fs::symlink_metadata(&target.real_path).await {
        Ok(metadata) if !metadata.is_dir() => {}
        _ => {
            session
                .logger
                .warn(format_args!("DELE: no such file {}", target.virtual_path));
            return send_status(&writer, &session.logger, status::FILE_UNAVAILABLE).await;
        }
    }

    match fs::remove_file(&target.real_path).await {
        Ok(()) => {
            session
                .logger
                .info(format_args!("Deleted {}", target.virtual_path));
            send_reply(
                &writer,
                &session.logger,
                status::REQUESTED_FILE_ACTION_OK,
                "File deleted.",
            )
            .await
        }
        Err(e) => {
            session
                .logger
                .error(format_args!("Failed to delete {}: {}", target.virtual_path, e));
            send_reply(&writer, &session.logger, status::FILE_UNAVAILABLE, e.to_string()).await
        }
    }
}
