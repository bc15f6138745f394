use crate::constants::status;
use crate::helpers::{send_reply, ControlWriter};
use crate::session::Session;
use crate::Config;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Handles the PWD command, quoting the virtual working path.
pub async fn handle_pwd_command(
    writer: ControlWriter,
    _config: Arc<Config>,
    session: Arc<Mutex<Session>>,
    _arg: String,
) -> Result<(), std::io::Error> {
    let session = session.lock().await;
    let text = format!("\"{}\" is current directory.", session.current_dir);
    send_reply(&writer, &session.logger, status::PATH_CREATED, text).await
}
