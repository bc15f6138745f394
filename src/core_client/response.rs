use crate::constants::status;
use crate::core_client::client::ClientConn;
use crate::core_client::error::FtpError;
use crate::core_network::data_conn::DialConn;
use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, ReadBuf};

/// One control connection reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub code: u16,
    /// Reply text. Lines of a multi-line reply are joined with `\n`.
    pub message: String,
}

/// Splits `NNN text` / `NNN-text` into code, continuation flag and text.
fn parse_code_line(line: &str) -> Option<(u16, bool, &str)> {
    let code = line.get(..3)?;
    if !code.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let continued = match line.as_bytes().get(3) {
        None | Some(b' ') => false,
        Some(b'-') => true,
        Some(_) => return None,
    };
    let text = line.get(4..).unwrap_or_default();
    Some((code.parse().ok()?, continued, text))
}

async fn read_line<R>(reader: &mut R) -> Result<String, FtpError>
where
    R: AsyncBufRead + Unpin,
{
    let mut buffer = Vec::new();
    if reader.read_until(b'\n', &mut buffer).await? == 0 {
        return Err(FtpError::Io(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "control connection closed",
        )));
    }
    let line = String::from_utf8_lossy(&buffer);
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

/// Reads one reply, following continuation lines up to the terminating
/// `NNN ` line.
///
/// Continuation lines that repeat the code have it stripped; any other
/// line, such as an indented FEAT entry, is kept as it arrived.
pub async fn read_response<R>(reader: &mut R) -> Result<Response, FtpError>
where
    R: AsyncBufRead + Unpin,
{
    let line = read_line(reader).await?;
    let (code, mut continued, text) = parse_code_line(&line)
        .ok_or_else(|| FtpError::Protocol(format!("malformed response line: {:?}", line)))?;
    let mut message = text.to_string();

    while continued {
        let line = read_line(reader).await?;
        message.push('\n');
        match parse_code_line(&line) {
            Some((next, more, text)) if next == code => {
                message.push_str(text);
                continued = more;
            }
            _ => message.push_str(&line),
        }
    }

    Ok(Response { code, message })
}

/// An open data connection handed back to the caller of a transfer.
///
/// The transfer is not finished until [`close`](DataResponse::close) has
/// shut the socket down and read the server's 226 confirmation. Dropping
/// the value closes the socket but leaves that reply unread.
pub struct DataResponse<'a> {
    conn: DialConn,
    client: &'a mut ClientConn,
}

impl<'a> DataResponse<'a> {
    pub(crate) fn new(conn: DialConn, client: &'a mut ClientConn) -> Self {
        Self { conn, client }
    }

    /// Closes the data connection and waits for the closing confirmation.
    /// A failed confirmation is reported in preference to a failed close.
    pub async fn close(self) -> Result<(), FtpError> {
        let DataResponse { mut conn, client } = self;
        let closed = conn.shutdown().await;
        drop(conn);

        client
            .read_expected(status::CLOSING_DATA_CONNECTION)
            .await?;
        closed.map_err(FtpError::Io)
    }
}

impl AsyncRead for DataResponse<'_> {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        Pin::new(&mut self.get_mut().conn).poll_read(cx, buf)
    }
}

impl AsyncWrite for DataResponse<'_> {
    fn poll_write(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        Pin::new(&mut self.get_mut().conn).poll_write(cx, buf)
    }

    fn poll_flush(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Pin::new(&mut self.get_mut().conn).poll_flush(cx)
    }

    fn poll_shutdown(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Pin::new(&mut self.get_mut().conn).poll_shutdown(cx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::BufReader;

    async fn read(input: &str) -> Result<Response, FtpError> {
        let mut reader = BufReader::new(input.as_bytes());
        read_response(&mut reader).await
    }

    #[tokio::test]
    async fn test_single_line() {
        let response = read("220 Service ready for new user.\r\n").await.unwrap();
        assert_eq!(response.code, 220);
        assert_eq!(response.message, "Service ready for new user.");
    }

    #[tokio::test]
    async fn test_multiline_feat_keeps_indentation() {
        let response = read("211-Extensions supported:\r\n EPSV\r\n REST STREAM\r\n211 End\r\n")
            .await
            .unwrap();
        assert_eq!(response.code, 211);
        assert_eq!(
            response.message,
            "Extensions supported:\n EPSV\n REST STREAM\nEnd"
        );
    }

    #[tokio::test]
    async fn test_multiline_strips_repeated_code() {
        let response = read("230-Welcome\r\n230-to the server\r\n230 Logged in.\r\n")
            .await
            .unwrap();
        assert_eq!(response.message, "Welcome\nto the server\nLogged in.");
    }

    #[tokio::test]
    async fn test_bare_code() {
        let response = read("200\r\n").await.unwrap();
        assert_eq!(response.code, 200);
        assert_eq!(response.message, "");
    }

    #[tokio::test]
    async fn test_malformed_line() {
        assert!(matches!(
            read("hello\r\n").await,
            Err(FtpError::Protocol(_))
        ));
        assert!(matches!(read("2x0 nope\r\n").await, Err(FtpError::Protocol(_))));
    }

    #[tokio::test]
    async fn test_eof_is_io_error() {
        assert!(matches!(read("").await, Err(FtpError::Io(_))));
        assert!(matches!(read("211-first\r\n").await, Err(FtpError::Io(_))));
    }
}
