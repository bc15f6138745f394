use crate::core_ftpcommand::cwd::change_dir;
use crate::helpers::ControlWriter;
use crate::session::Session;
use crate::Config;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Handles the CDUP command. At the root this is a no-op change to `/`.
pub async fn handle_cdup_command(
    writer: ControlWriter,
    _config: Arc<Config>,
    session: Arc<Mutex<Session>>,
    _arg: String,
) -> Result<(), std::io::Error> {
    let mut session = session.lock().await;
    change_dir(&writer, &mut session, "..").await
}
