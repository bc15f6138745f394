use crate::constants::status;
use crate::helpers::{send_reply, ControlWriter};
use crate::session::Session;
use crate::Config;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Handles the TYPE command.
///
/// Only `A` (ASCII) and `I` (image) are recognised. Both transfer bytes
/// unchanged; the reply only acknowledges the request.
pub async fn handle_type_command(
    writer: ControlWriter,
    _config: Arc<Config>,
    session: Arc<Mutex<Session>>,
    arg: String,
) -> Result<(), std::io::Error> {
    let session = session.lock().await;
    match arg.trim().to_ascii_uppercase().as_str() {
        "A" => send_reply(&writer, &session.logger, status::COMMAND_OK, "Type set to ASCII.").await,
        "I" => {
            send_reply(&writer, &session.logger, status::COMMAND_OK, "Type set to binary.").await
        }
        _ => send_reply(&writer, &session.logger, status::BAD_ARGUMENTS, "Invalid type.").await,
    }
}
