use crate::constants::status;
use crate::core_ftpcommand::utils::require_arg;
use crate::helpers::{send_reply, ControlWriter};
use crate::session::Session;
use crate::Config;
use std::sync::Arc;
use tokio::fs;
use tokio::sync::Mutex;

/// Handles the MKD command. The parent must already exist.
pub async fn handle_mkd_command(
    writer: ControlWriter,
    _config: Arc<Config>,
    session: Arc<Mutex<Session>>,
    arg: String,
) -> Result<(), std::io::Error> {
    let session = session.lock().await;
    if !require_arg(&writer, &session, "MKD", &arg).await? {
        return Ok(());
    }

    let target = session.resolve(&arg);
    match fs::create_dir(&target.real_path).await {
        Ok(()) => {
            session
                .logger
                .info(format_args!("Created directory {}", target.virtual_path));
            let text = format!("\"{}\" created.", target.virtual_path);
            send_reply(&writer, &session.logger, status::PATH_CREATED, text).await
        }
        Err(e) => {
            session.logger.error(format_args!(
                "Failed to create directory {}: {}",
                target.virtual_path, e
            ));
            send_reply(&writer, &session.logger, status::FILE_UNAVAILABLE, e.to_string()).await
        }
    }
}
