use crate::constants::status;
use crate::core_client::error::FtpError;
use crate::core_client::response::{read_response, DataResponse, Response};
use crate::core_listing::{parse_listing, Entry};
use crate::core_log::SessionLogger;
use crate::core_network::data_conn::DialConn;
use regex::Regex;
use std::collections::HashMap;
use std::sync::OnceLock;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;

/// A client session over one FTP control connection.
///
/// Every data-bearing operation negotiates its own data connection
/// (EPSV, then PASV) and dials the server's resolved address, never the
/// name used to connect.
pub struct ClientConn {
    reader: BufReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
    host: String,
    timeout: Option<Duration>,
    features: HashMap<String, String>,
    logger: SessionLogger,
}

impl ClientConn {
    /// Like [`dial_timeout`](Self::dial_timeout) with no timeout.
    pub async fn dial(addr: &str) -> Result<Self, FtpError> {
        Self::dial_timeout(addr, None).await
    }

    /// Opens the control connection, reads the 220 greeting and discovers
    /// the server's features. `timeout` bounds the control and data dials.
    pub async fn dial_timeout(addr: &str, timeout: Option<Duration>) -> Result<Self, FtpError> {
        let connect = TcpStream::connect(addr);
        let stream = match timeout {
            Some(limit) => tokio::time::timeout(limit, connect)
                .await
                .map_err(|_| {
                    FtpError::Connection(std::io::Error::new(
                        std::io::ErrorKind::TimedOut,
                        format!("connection to {} timed out", addr),
                    ))
                })?
                .map_err(FtpError::Connection)?,
            None => connect.await.map_err(FtpError::Connection)?,
        };

        let peer = stream.peer_addr().map_err(FtpError::Connection)?;
        let (read_half, write_half) = stream.into_split();
        let mut conn = Self {
            reader: BufReader::new(read_half),
            writer: write_half,
            host: peer.ip().to_string(),
            timeout,
            features: HashMap::new(),
            logger: SessionLogger::new(peer),
        };

        let greeting = conn.read_expected(status::READY).await?;
        conn.logger.info(format_args!("Connected: {}", greeting.message));

        conn.feat().await?;
        conn.set_utf8().await?;
        Ok(conn)
    }

    /// Dials `addr` and logs in. A failed dial returns before any
    /// connection exists.
    pub async fn connect(addr: &str, user: &str, password: &str) -> Result<Self, FtpError> {
        let mut conn = Self::dial(addr).await?;
        conn.login(user, password).await?;
        Ok(conn)
    }

    /// Connects with the conventional `anonymous`/`anonymous` credentials.
    pub async fn connect_anonymous(addr: &str) -> Result<Self, FtpError> {
        Self::connect(addr, "anonymous", "anonymous").await
    }

    /// Resolved address of the server; data connections are dialed here.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Features announced by FEAT, keyed by name, with any description.
    pub fn features(&self) -> &HashMap<String, String> {
        &self.features
    }

    /// Sends USER, then PASS when asked for it, then switches to binary.
    pub async fn login(&mut self, user: &str, password: &str) -> Result<(), FtpError> {
        let response = self.cmd(None, &format!("USER {}", user)).await?;
        match response.code {
            status::LOGGED_IN => {}
            status::USER_OK => {
                self.cmd(Some(status::LOGGED_IN), &format!("PASS {}", password))
                    .await?;
            }
            code => {
                return Err(FtpError::Status {
                    code,
                    message: response.message,
                })
            }
        }

        self.cmd(Some(status::COMMAND_OK), "TYPE I").await?;
        self.logger.info(format_args!("User {} logged in.", user));
        Ok(())
    }

    /// Issues REIN to log the current user out.
    pub async fn logout(&mut self) -> Result<(), FtpError> {
        self.cmd(Some(status::READY), "REIN").await?;
        Ok(())
    }

    /// Sends QUIT and closes the control connection.
    pub async fn quit(mut self) -> Result<(), FtpError> {
        self.send_line("QUIT").await?;
        match read_response(&mut self.reader).await {
            Ok(response) => self.logger.received(&format!("{} {}", response.code, response.message)),
            Err(e) => self.logger.debug(format_args!("No reply to QUIT: {}", e)),
        }
        self.writer.shutdown().await?;
        self.logger.info("Disconnected.");
        Ok(())
    }

    pub async fn noop(&mut self) -> Result<(), FtpError> {
        self.cmd(Some(status::COMMAND_OK), "NOOP").await?;
        Ok(())
    }

    pub async fn change_dir(&mut self, path: &str) -> Result<(), FtpError> {
        self.cmd(Some(status::REQUESTED_FILE_ACTION_OK), &format!("CWD {}", path))
            .await?;
        Ok(())
    }

    pub async fn change_dir_to_parent(&mut self) -> Result<(), FtpError> {
        self.cmd(Some(status::REQUESTED_FILE_ACTION_OK), "CDUP")
            .await?;
        Ok(())
    }

    /// Returns the quoted path from the PWD reply.
    pub async fn current_dir(&mut self) -> Result<String, FtpError> {
        let response = self.cmd(Some(status::PATH_CREATED), "PWD").await?;
        parse_quoted_path(&response.message)
    }

    pub async fn rename(&mut self, from: &str, to: &str) -> Result<(), FtpError> {
        self.cmd(Some(status::REQUEST_FILE_PENDING), &format!("RNFR {}", from))
            .await?;
        self.cmd(Some(status::REQUESTED_FILE_ACTION_OK), &format!("RNTO {}", to))
            .await?;
        Ok(())
    }

    pub async fn make_dir(&mut self, path: &str) -> Result<(), FtpError> {
        self.cmd(Some(status::PATH_CREATED), &format!("MKD {}", path))
            .await?;
        Ok(())
    }

    pub async fn remove_dir(&mut self, path: &str) -> Result<(), FtpError> {
        self.cmd(Some(status::REQUESTED_FILE_ACTION_OK), &format!("RMD {}", path))
            .await?;
        Ok(())
    }

    pub async fn delete(&mut self, path: &str) -> Result<(), FtpError> {
        self.cmd(Some(status::REQUESTED_FILE_ACTION_OK), &format!("DELE {}", path))
            .await?;
        Ok(())
    }

    /// Size in bytes as reported by SIZE.
    pub async fn size(&mut self, path: &str) -> Result<u64, FtpError> {
        let response = self.cmd(Some(status::FILE), &format!("SIZE {}", path)).await?;
        response
            .message
            .trim()
            .parse()
            .map_err(|_| FtpError::Protocol(format!("invalid SIZE response: {}", response.message)))
    }

    /// The system type reported by SYST.
    pub async fn system(&mut self) -> Result<String, FtpError> {
        let response = self.cmd(Some(status::NAME_SYSTEM), "SYST").await?;
        Ok(response.message)
    }

    /// Issues NLST and returns one name per line.
    pub async fn name_list(&mut self, path: &str) -> Result<Vec<String>, FtpError> {
        let body = self.read_listing("NLST", path).await?;
        Ok(body.lines().map(str::to_string).collect())
    }

    /// Issues LIST and parses the reply. Lines that do not parse are skipped.
    pub async fn list(&mut self, path: &str) -> Result<Vec<Entry>, FtpError> {
        let body = self.read_listing("LIST", path).await?;
        Ok(parse_listing(&body))
    }

    /// Retrieves `path`. The returned stream must be closed.
    pub async fn retr(&mut self, path: &str) -> Result<DataResponse<'_>, FtpError> {
        self.retr_from(path, 0).await
    }

    /// Retrieves `path`, skipping the first `offset` bytes.
    pub async fn retr_from(
        &mut self,
        path: &str,
        offset: u64,
    ) -> Result<DataResponse<'_>, FtpError> {
        self.cmd_data_conn_from(offset, &format!("RETR {}", path))
            .await
    }

    /// Uploads everything `reader` yields to `path`.
    pub async fn stor<R>(&mut self, path: &str, reader: &mut R) -> Result<(), FtpError>
    where
        R: AsyncRead + Unpin + ?Sized,
    {
        self.stor_from(path, reader, 0).await
    }

    /// Uploads to `path`, the server writing from `offset` on.
    ///
    /// Succeeds only once the server has confirmed the transfer with 226.
    pub async fn stor_from<R>(
        &mut self,
        path: &str,
        reader: &mut R,
        offset: u64,
    ) -> Result<(), FtpError>
    where
        R: AsyncRead + Unpin + ?Sized,
    {
        let logger = self.logger.clone();
        let mut response = self
            .cmd_data_conn_from(offset, &format!("STOR {}", path))
            .await?;

        let copied = tokio::io::copy(reader, &mut response).await;
        match copied {
            Ok(sent) => {
                response.close().await?;
                logger.info(format_args!("Stored {} ({} bytes).", path, sent));
                Ok(())
            }
            Err(e) => {
                // Still consume the server's verdict so the next command
                // reads its own reply.
                if let Err(close_err) = response.close().await {
                    logger.debug(format_args!("After failed upload: {}", close_err));
                }
                Err(FtpError::Io(e))
            }
        }
    }

    /// Sends one command and reads its reply. With `expected` set, any
    /// other code becomes [`FtpError::Status`].
    pub async fn cmd(&mut self, expected: Option<u16>, line: &str) -> Result<Response, FtpError> {
        self.send_line(line).await?;
        self.read_reply(expected).await
    }

    pub(crate) async fn read_expected(&mut self, code: u16) -> Result<Response, FtpError> {
        self.read_reply(Some(code)).await
    }

    async fn read_reply(&mut self, expected: Option<u16>) -> Result<Response, FtpError> {
        let response = read_response(&mut self.reader).await?;
        self.logger
            .received(&format!("{} {}", response.code, response.message));

        match expected {
            Some(code) if code != response.code => Err(FtpError::Status {
                code: response.code,
                message: response.message,
            }),
            _ => Ok(response),
        }
    }

    async fn send_line(&mut self, line: &str) -> Result<(), FtpError> {
        if line.starts_with("PASS ") {
            self.logger.sent("PASS ****");
        } else {
            self.logger.sent(line);
        }
        self.writer
            .write_all(format!("{}\r\n", line).as_bytes())
            .await?;
        self.writer.flush().await?;
        Ok(())
    }

    async fn read_listing(&mut self, command: &str, path: &str) -> Result<String, FtpError> {
        let line = if path.is_empty() {
            command.to_string()
        } else {
            format!("{} {}", command, path)
        };

        let mut response = self.cmd_data_conn_from(0, &line).await?;
        let mut body = Vec::new();
        let read = response.read_to_end(&mut body).await;
        response.close().await?;
        read?;
        Ok(String::from_utf8_lossy(&body).into_owned())
    }

    /// Negotiates a data connection, sends REST when `offset` is non-zero,
    /// then sends `line` and requires 125 or 150.
    ///
    /// The data connection is closed on every failure after it was opened.
    async fn cmd_data_conn_from(
        &mut self,
        offset: u64,
        line: &str,
    ) -> Result<DataResponse<'_>, FtpError> {
        let mut conn = self.open_data_conn().await?;

        if offset != 0 {
            if let Err(e) = self
                .cmd(Some(status::REQUEST_FILE_PENDING), &format!("REST {}", offset))
                .await
            {
                let _ = conn.shutdown().await;
                return Err(e);
            }
        }

        let response = match self.cmd(None, line).await {
            Ok(response) => response,
            Err(e) => {
                let _ = conn.shutdown().await;
                return Err(e);
            }
        };

        if response.code != status::ALREADY_OPEN && response.code != status::ABOUT_TO_SEND {
            let _ = conn.shutdown().await;
            return Err(FtpError::Status {
                code: response.code,
                message: response.message,
            });
        }

        Ok(DataResponse::new(conn, self))
    }

    /// Tries EPSV, falls back to PASV, then dials the announced port.
    async fn open_data_conn(&mut self) -> Result<DialConn, FtpError> {
        let port = match self.epsv().await {
            Ok(port) => port,
            Err(extended) => {
                self.logger
                    .debug(format_args!("EPSV failed, trying PASV: {}", extended));
                match self.pasv().await {
                    Ok(port) => port,
                    Err(legacy) => {
                        return Err(FtpError::Negotiation {
                            extended: Box::new(extended),
                            legacy: Box::new(legacy),
                        })
                    }
                }
            }
        };

        self.logger
            .debug(format_args!("Opening data connection to {}:{}", self.host, port));
        DialConn::connect(&self.host, port, self.timeout)
            .await
            .map_err(FtpError::Connection)
    }

    async fn epsv(&mut self) -> Result<u16, FtpError> {
        let response = self.cmd(Some(status::EXTENDED_PASSIVE_MODE), "EPSV").await?;
        parse_epsv_port(&response.message)
    }

    async fn pasv(&mut self) -> Result<u16, FtpError> {
        let response = self.cmd(Some(status::PASSIVE_MODE), "PASV").await?;
        parse_pasv_port(&response.message)
    }

    /// FEAT is optional: any reply other than 211 means no extra features.
    async fn feat(&mut self) -> Result<(), FtpError> {
        let response = self.cmd(None, "FEAT").await?;
        if response.code != status::SYSTEM {
            return Ok(());
        }
        self.features = parse_features(&response.message);
        Ok(())
    }

    /// Turns UTF-8 on when the server announced it.
    async fn set_utf8(&mut self) -> Result<(), FtpError> {
        if !self.features.contains_key("UTF8") {
            return Ok(());
        }
        self.cmd(Some(status::COMMAND_OK), "OPTS UTF8 ON").await?;
        self.logger.debug("UTF8 enabled.");
        Ok(())
    }
}

/// Port from `229 Entering Extended Passive Mode (|||65202|)`.
pub fn parse_epsv_port(message: &str) -> Result<u16, FtpError> {
    static EPSV_PORT_RE: OnceLock<Regex> = OnceLock::new();
    let re = EPSV_PORT_RE.get_or_init(|| Regex::new(r"\|\|\|(.*)\|").expect("valid regex"));

    let port = re
        .captures(message)
        .and_then(|captures| captures.get(1))
        .ok_or_else(|| FtpError::Protocol("invalid EPSV response format".to_string()))?;

    port.as_str()
        .parse()
        .map_err(|_| FtpError::Protocol(format!("invalid EPSV port: {}", port.as_str())))
}

/// Port from `227 Entering Passive Mode (h1,h2,h3,h4,p1,p2)`. All six fields
/// must be present but only the two port fields are used; data is always
/// dialed to the control peer.
pub fn parse_pasv_port(message: &str) -> Result<u16, FtpError> {
    let invalid = || FtpError::Protocol("invalid PASV response format".to_string());

    let start = message.find('(').ok_or_else(invalid)?;
    let end = message.rfind(')').ok_or_else(invalid)?;
    if end <= start {
        return Err(invalid());
    }

    let fields: Vec<&str> = message[start + 1..end].split(',').collect();
    if fields.len() != 6 {
        return Err(invalid());
    }

    let byte = |field: &str| field.trim().parse::<u8>().map_err(|_| invalid());
    let high = byte(fields[4])?;
    let low = byte(fields[5])?;
    Ok(u16::from(high) * 256 + u16::from(low))
}

/// Path between the first and last double quote of a PWD reply.
pub fn parse_quoted_path(message: &str) -> Result<String, FtpError> {
    static QUOTED_PATH_RE: OnceLock<Regex> = OnceLock::new();
    let re = QUOTED_PATH_RE.get_or_init(|| Regex::new(r#""(.*)""#).expect("valid regex"));

    re.captures(message)
        .and_then(|captures| captures.get(1))
        .map(|path| path.as_str().to_string())
        .ok_or_else(|| FtpError::Protocol("unsupported PWD response format".to_string()))
}

/// Feature map from a FEAT reply: every indented line is a name and an
/// optional description.
pub fn parse_features(message: &str) -> HashMap<String, String> {
    message
        .lines()
        .filter(|line| line.starts_with(' '))
        .filter_map(|line| {
            let mut parts = line.trim().splitn(2, ' ');
            let name = parts.next().filter(|name| !name.is_empty())?;
            let description = parts.next().unwrap_or_default();
            Some((name.to_string(), description.to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_epsv_port() {
        assert_eq!(
            parse_epsv_port("Entering Extended Passive Mode (|||65202|)").unwrap(),
            65202
        );
        assert!(matches!(
            parse_epsv_port("Entering Extended Passive Mode"),
            Err(FtpError::Protocol(_))
        ));
        assert!(parse_epsv_port("Entering Extended Passive Mode (|||port|)").is_err());
    }

    #[test]
    fn test_parse_pasv_port() {
        assert_eq!(
            parse_pasv_port("Entering Passive Mode (172,17,66,241,254,179)").unwrap(),
            65203
        );
        assert!(parse_pasv_port("Entering Passive Mode").is_err());
        assert!(parse_pasv_port("Entering Passive Mode (7)").is_err());
        assert!(parse_pasv_port("Entering Passive Mode (254,179)").is_err());
        assert!(parse_pasv_port("Entering Passive Mode (10,0,0,1,1,254,179)").is_err());
        assert!(parse_pasv_port("Entering Passive Mode (1,2,3,4,x,9)").is_err());
        assert!(parse_pasv_port("Entering Passive Mode )1,2(").is_err());
    }

    #[test]
    fn test_parse_quoted_path() {
        assert_eq!(
            parse_quoted_path("\"/pub/my dir\" is current directory.").unwrap(),
            "/pub/my dir"
        );
        assert_eq!(parse_quoted_path("\"/a \"b\"\" x").unwrap(), "/a \"b\"");
        assert!(parse_quoted_path("/pub is current directory.").is_err());
    }

    #[test]
    fn test_parse_features() {
        let features = parse_features("Extensions supported:\n EPSV\n REST STREAM\n UTF8\nEnd");
        assert_eq!(features.len(), 3);
        assert_eq!(features.get("EPSV").map(String::as_str), Some(""));
        assert_eq!(features.get("REST").map(String::as_str), Some("STREAM"));
        assert!(features.contains_key("UTF8"));
        assert!(!features.contains_key("End"));
    }
}
