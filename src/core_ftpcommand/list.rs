use crate::constants::status;
use crate::core_ftpcommand::utils::{read_items, send_data};
use crate::core_listing::{list_detailed, list_short, FileItem};
use crate::helpers::{send_reply, ControlWriter};
use crate::session::Session;
use crate::Config;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Handles the LIST command with the long listing format.
pub async fn handle_list_command(
    writer: ControlWriter,
    _config: Arc<Config>,
    session: Arc<Mutex<Session>>,
    arg: String,
) -> Result<(), std::io::Error> {
    let mut session = session.lock().await;
    send_listing(&writer, &mut session, &arg, list_detailed).await
}

/// Handles the NLST command: names only.
pub async fn handle_nlst_command(
    writer: ControlWriter,
    _config: Arc<Config>,
    session: Arc<Mutex<Session>>,
    arg: String,
) -> Result<(), std::io::Error> {
    let mut session = session.lock().await;
    send_listing(&writer, &mut session, &arg, list_short).await
}

/// Lists the working directory, or the path in `arg` when one is given.
/// Option-style arguments such as `-la` are ignored.
async fn send_listing(
    writer: &ControlWriter,
    session: &mut Session,
    arg: &str,
    format: fn(&[FileItem]) -> Vec<u8>,
) -> Result<(), std::io::Error> {
    let arg = arg.trim();
    let target = if arg.is_empty() || arg.starts_with('-') {
        session.resolve(".")
    } else {
        session.resolve(arg)
    };

    let items = match read_items(&target.real_path).await {
        Ok(items) => items,
        Err(e) => {
            session
                .logger
                .warn(format_args!("Cannot list {}: {}", target.virtual_path, e));
            session.close_data_conn().await;
            return send_reply(writer, &session.logger, status::FILE_UNAVAILABLE, e.to_string())
                .await;
        }
    };

    send_reply(
        writer,
        &session.logger,
        status::ABOUT_TO_SEND,
        "Opening ASCII mode data connection for file list",
    )
    .await?;
    send_data(writer, session, &format(&items)).await
}
