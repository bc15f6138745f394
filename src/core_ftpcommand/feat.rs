use crate::constants::status;
use crate::helpers::{send_multiline, ControlWriter};
use crate::session::Session;
use crate::Config;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Extensions advertised in the FEAT reply.
pub const FEATURES: &[&str] = &["EPSV", "PASV", "REST STREAM", "SIZE", "UTF8"];

/// Handles the FEAT command.
pub async fn handle_feat_command(
    writer: ControlWriter,
    _config: Arc<Config>,
    session: Arc<Mutex<Session>>,
    _arg: String,
) -> Result<(), std::io::Error> {
    let session = session.lock().await;
    send_multiline(
        &writer,
        &session.logger,
        status::SYSTEM,
        "Extensions supported:",
        FEATURES,
        "End",
    )
    .await
}
