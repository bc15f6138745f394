use crate::constants::status;
use crate::core_ftpcommand::utils::{require_arg, send_data};
use crate::helpers::{send_reply, ControlWriter};
use crate::session::Session;
use crate::Config;
use std::sync::Arc;
use tokio::fs;
use tokio::sync::Mutex;

/// Handles the RETR command.
///
/// The whole file is read up front so a missing or unreadable file is
/// reported before any transfer starts. A pending REST offset skips that
/// many bytes.
pub async fn handle_retr_command(
    writer: ControlWriter,
    _config: Arc<Config>,
    session: Arc<Mutex<Session>>,
    arg: String,
) -> Result<(), std::io::Error> {
    let mut session = session.lock().await;
    let offset = session.restart_offset.take().unwrap_or(0);
    if !require_arg(&writer, &session, "RETR", &arg).await? {
        return Ok(());
    }

    let target = session.resolve(&arg);
    let contents = match fs::read(&target.real_path).await {
        Ok(contents) => contents,
        Err(e) => {
            session
                .logger
                .warn(format_args!("RETR {}: {}", target.virtual_path, e));
            session.close_data_conn().await;
            return send_reply(&writer, &session.logger, status::FILE_UNAVAILABLE, e.to_string())
                .await;
        }
    };

    let start = usize::try_from(offset)
        .unwrap_or(usize::MAX)
        .min(contents.len());
    let data = &contents[start..];

    session.logger.info(format_args!(
        "Sending {} ({} bytes from offset {})",
        target.virtual_path,
        data.len(),
        start
    ));
    send_reply(
        &writer,
        &session.logger,
        status::ABOUT_TO_SEND,
        format!("Data transfer starting {} bytes", data.len()),
    )
    .await?;
    send_data(&writer, &mut session, data).await
}
