use crate::constants::status;
use crate::helpers::{send_reply, send_status, ControlWriter};
use crate::session::Session;
use crate::Config;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Handles the OPTS command. Only `UTF8 ON` is understood; names are
/// always sent as UTF-8.
pub async fn handle_opts_command(
    writer: ControlWriter,
    _config: Arc<Config>,
    session: Arc<Mutex<Session>>,
    arg: String,
) -> Result<(), std::io::Error> {
    let session = session.lock().await;
    if arg.trim().eq_ignore_ascii_case("UTF8 ON") {
        send_reply(&writer, &session.logger, status::COMMAND_OK, "UTF8 mode enabled.").await
    } else {
        session
            .logger
            .warn(format_args!("Unsupported OPTS argument: {}", arg));
        send_status(&writer, &session.logger, status::BAD_ARGUMENTS).await
    }
}
