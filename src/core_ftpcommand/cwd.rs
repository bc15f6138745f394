use crate::constants::status;
use crate::core_ftpcommand::utils::require_arg;
use crate::helpers::{send_reply, send_status, ControlWriter};
use crate::session::Session;
use crate::Config;
use std::sync::Arc;
use tokio::fs;
use tokio::sync::Mutex;

/// Handles the CWD command.
///
/// The working path only changes when the target exists and is a
/// directory; otherwise the client gets 550 and stays where it was.
pub async fn handle_cwd_command(
    writer: ControlWriter,
    _config: Arc<Config>,
    session: Arc<Mutex<Session>>,
    arg: String,
) -> Result<(), std::io::Error> {
    let mut session = session.lock().await;
    if !require_arg(&writer, &session, "CWD", &arg).await? {
        return Ok(());
    }
    change_dir(&writer, &mut session, &arg).await
}

pub(crate) async fn change_dir(
    writer: &ControlWriter,
    session: &mut Session,
    arg: &str,
) -> Result<(), std::io::Error> {
    let target = session.resolve(arg);
    let is_dir = fs::metadata(&target.real_path)
        .await
        .map(|metadata| metadata.is_dir())
        .unwrap_or(false);

    if !is_dir {
        session.logger.warn(format_args!(
            "Cannot change directory to {}",
            target.virtual_path
        ));
        return send_status(writer, &session.logger, status::FILE_UNAVAILABLE).await;
    }

    session.current_dir = target.virtual_path;
    let text = format!("Directory changed to {}", session.current_dir);
    send_reply(writer, &session.logger, status::REQUESTED_FILE_ACTION_OK, text).await
}
