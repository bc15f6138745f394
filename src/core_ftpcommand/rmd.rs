use crate::constants::status;
use crate::core_ftpcommand::utils::require_arg;
use crate::helpers::{send_reply, send_status, ControlWriter};
use crate::session::Session;
use crate::Config;
use std::sync::Arc;
use tokio::fs;
use tokio::sync::Mutex;

/// Handles RMD and its XRMD alias.
///
/// The directory is removed with everything below it. The root itself
/// cannot be removed.
pub async fn handle_rmd_command(
    writer: ControlWriter,
    _config: Arc<Config>,
    session: Arc<Mutex<Session>>,
    arg: String,
) -> Result<(), std::io::Error> {
    let session = session.lock().await;
    if !require_arg(&writer, &session, "RMD", &arg).await? {
        return Ok(());
    }

    let target = session.resolve(&arg);
    let is_dir = fs::symlink_metadata(&target.real_path)
        .await
        .map(|metadata| metadata.is_dir())
        .unwrap_or(false);

    if !is_dir || target.virtual_path == "/" {
        session
            .logger
            .warn(format_args!("RMD: not a removable directory {}", target.virtual_path));
        return send_status(&writer, &session.logger, status::FILE_UNAVAILABLE).await;
    }

    match fs::remove_dir_all(&target.real_path).await {
        Ok(()) => {
            session
                .logger
                .info(format_args!("Removed directory {}", target.virtual_path));
            send_reply(
                &writer,
                &session.logger,
                status::REQUESTED_FILE_ACTION_OK,
                "Directory deleted.",
            )
            .await
        }
        Err(e) => {
            session.logger.error(format_args!(
                "Failed to remove directory {}: {}",
                target.virtual_path, e
            ));
            send_reply(&writer, &session.logger, status::FILE_UNAVAILABLE, e.to_string()).await
        }
    }
}
