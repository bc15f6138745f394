use crate::constants::status;
use crate::core_log::SessionLogger;
use std::fmt::Display;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio::net::tcp::OwnedWriteHalf;
use tokio::sync::Mutex;

/// Write side of a server control connection, shared with every handler.
pub type ControlWriter = Arc<Mutex<OwnedWriteHalf>>;

/// Sends raw bytes to the client.
pub async fn send_response(writer: &ControlWriter, message: &[u8]) -> Result<(), std::io::Error> {
    let mut writer = writer.lock().await;
    writer.write_all(message).await?;
    writer.flush().await?;
    Ok(())
}

/// Sends a `code text` reply line.
pub async fn send_reply(
    writer: &ControlWriter,
    logger: &SessionLogger,
    code: u16,
    text: impl Display,
) -> Result<(), std::io::Error> {
    let line = format!("{} {}", code, text);
    logger.sent(&line);
    send_response(writer, format!("{}\r\n", line).as_bytes()).await
}

/// Sends a reply carrying the default text for `code`.
pub async fn send_status(
    writer: &ControlWriter,
    logger: &SessionLogger,
    code: u16,
) -> Result<(), std::io::Error> {
    send_reply(writer, logger, code, status::message(code)).await
}

/// Sends a multi-line reply: `code-first`, indented body lines, `code last`.
pub async fn send_multiline(
    writer: &ControlWriter,
    logger: &SessionLogger,
    code: u16,
    first: &str,
    body: &[&str],
    last: &str,
) -> Result<(), std::io::Error> {
    let mut reply = format!("{}-{}\r\n", code, first);
    for line in body {
        reply.push(' ');
        reply.push_str(line);
        reply.push_str("\r\n");
    }
    reply.push_str(&format!("{} {}\r\n", code, last));
    logger.sent(reply.trim_end());
    send_response(writer, reply.as_bytes()).await
}
