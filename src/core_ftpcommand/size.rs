use crate::constants::{status, DIRECTORY_SIZE_PLACEHOLDER};
use crate::core_ftpcommand::utils::require_arg;
use crate::helpers::{send_reply, send_status, ControlWriter};
use crate::session::Session;
use crate::Config;
use std::sync::Arc;
use tokio::fs;
use tokio::sync::Mutex;

/// Handles the SIZE command. Directories report a fixed placeholder.
pub async fn handle_size_command(
    writer: ControlWriter,
    _config: Arc<Config>,
    session: Arc<Mutex<Session>>,
    arg: String,
) -> Result<(), std::io::Error> {
    let session = session.lock().await;
    if !require_arg(&writer, &session, "SIZE", &arg).await? {
        return Ok(());
    }

    let target = session.resolve(&arg);
    let size = match fs::metadata(&target.real_path).await {
        Ok(metadata) if metadata.is_dir() => DIRECTORY_SIZE_PLACEHOLDER,
        Ok(metadata) => metadata.len(),
        Err(e) => {
            session
                .logger
                .warn(format_args!("SIZE {}: {}", target.virtual_path, e));
            return send_status(&writer, &session.logger, status::FILE_UNAVAILABLE).await;
        }
    };

    send_reply(&writer, &session.logger, status::FILE, size).await
}
