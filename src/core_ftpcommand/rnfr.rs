use crate::constants::status;
use crate::core_ftpcommand::utils::require_arg;
use crate::helpers::{send_status, ControlWriter};
use crate::session::Session;
use crate::Config;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Handles the RNFR command: remembers the source for the following RNTO.
pub async fn handle_rnfr_command(
    writer: ControlWriter,
    _config: Arc<Config>,
    session: Arc<Mutex<Session>>,
    arg: String,
) -> Result<(), std::io::Error> {
    let mut session = session.lock().await;
    if !require_arg(&writer, &session, "RNFR", &arg).await? {
        return Ok(());
    }

    let source = session.resolve(&arg);
    session
        .logger
        .debug(format_args!("Rename pending from {}", source.virtual_path));
    session.rename_from = Some(source.real_path);
    send_status(&writer, &session.logger, status::REQUEST_FILE_PENDING).await
}
