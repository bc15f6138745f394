use crate::constants::status;
use crate::core_network::data_conn::{DataConn, PassiveConn};
use crate::helpers::{send_reply, send_status, ControlWriter};
use crate::session::Session;
use crate::Config;
use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Text of a 227 reply: `Entering Passive Mode (h1,h2,h3,h4,p1,p2)`.
///
/// Returns `None` when `host` is not an IPv4 address, which the legacy
/// format cannot carry.
pub fn pasv_reply_text(host: &str, port: u16) -> Option<String> {
    let ip: Ipv4Addr = host.parse().ok()?;
    let [h1, h2, h3, h4] = ip.octets();
    Some(format!(
        "Entering Passive Mode ({},{},{},{},{},{})",
        h1,
        h2,
        h3,
        h4,
        port / 256,
        port % 256
    ))
}

/// Host string passive listeners bind to and PASV advertises, taken from
/// the control connection's local address. On a dual-stack listener an
/// IPv4 peer shows up as `::ffff:a.b.c.d`, which is unwrapped to `a.b.c.d`.
pub fn passive_host(local: IpAddr) -> String {
    match local {
        IpAddr::V6(v6) => match v6.to_ipv4_mapped() {
            Some(v4) => v4.to_string(),
            None => v6.to_string(),
        },
        IpAddr::V4(v4) => v4.to_string(),
    }
}

/// Text of a 229 reply: `Entering Extended Passive Mode (|||port|)`.
pub fn epsv_reply_text(port: u16) -> String {
    format!("Entering Extended Passive Mode (|||{}|)", port)
}

/// Opens a passive listener on the session host and makes it the session's
/// data connection.
async fn open_passive(session: &mut Session) -> Result<u16, std::io::Error> {
    let conn = PassiveConn::listen(&session.host, session.logger.clone()).await?;
    let port = conn.port();
    session.replace_data_conn(Box::new(conn)).await;
    Ok(port)
}

/// Handles the PASV command.
pub async fn handle_pasv_command(
    writer: ControlWriter,
    _config: Arc<Config>,
    session: Arc<Mutex<Session>>,
    _arg: String,
) -> Result<(), std::io::Error> {
    let mut session = session.lock().await;

    match open_passive(&mut session).await {
        Ok(port) => {
            let host = session.host.clone();
            match pasv_reply_text(&host, port) {
                Some(text) => send_reply(&writer, &session.logger, status::PASSIVE_MODE, text).await,
                None => {
                    session
                        .logger
                        .warn(format_args!("PASV requested on non-IPv4 host {}", host));
                    session.close_data_conn().await;
                    send_status(&writer, &session.logger, status::CANNOT_OPEN_DATA_CONNECTION)
                        .await
                }
            }
        }
        Err(e) => {
            session
                .logger
                .error(format_args!("Failed to set up passive listener: {}", e));
            send_status(&writer, &session.logger, status::CANNOT_OPEN_DATA_CONNECTION).await
        }
    }
}

/// Handles the EPSV command.
pub async fn handle_epsv_command(
    writer: ControlWriter,
    _config: Arc<Config>,
    session: Arc<Mutex<Session>>,
    _arg: String,
) -> Result<(), std::io::Error> {
    let mut session = session.lock().await;

    match open_passive(&mut session).await {
        Ok(port) => {
            send_reply(
                &writer,
                &session.logger,
                status::EXTENDED_PASSIVE_MODE,
                epsv_reply_text(port),
            )
            .await
        }
        Err(e) => {
            session
                .logger
                .error(format_args!("Failed to set up passive listener: {}", e));
            send_status(&writer, &session.logger, status::CANNOT_OPEN_DATA_CONNECTION).await
        }
    }
}
