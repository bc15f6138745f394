use crate::core_log::SessionLogger;
use std::future::Future;
use std::io;
use std::pin::Pin;
use std::task::{ready, Context, Poll};
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncWrite, ReadBuf};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

/// The per-operation data connection.
///
/// Both variants read and write like a socket. Closing is
/// `AsyncWriteExt::shutdown` followed by dropping the value; a data
/// connection is never reused for a second transfer.
pub trait DataConn: AsyncRead + AsyncWrite + Unpin + Send + Sync {
    fn host(&self) -> &str;
    fn port(&self) -> u16;
}

/// Client side: a connection dialed to the port the server advertised.
#[derive(Debug)]
pub struct DialConn {
    stream: TcpStream,
    host: String,
    port: u16,
}

impl DialConn {
    /// Dials `host:port`, giving up after `timeout` when one is set.
    pub async fn connect(host: &str, port: u16, timeout: Option<Duration>) -> io::Result<Self> {
        let connect = TcpStream::connect((host, port));
        let stream = match timeout {
            Some(limit) => tokio::time::timeout(limit, connect).await.map_err(|_| {
                io::Error::new(
                    io::ErrorKind::TimedOut,
                    format!("data connection to {}:{} timed out", host, port),
                )
            })??,
            None => connect.await?,
        };

        Ok(Self {
            stream,
            host: host.to_string(),
            port,
        })
    }
}

impl DataConn for DialConn {
    fn host(&self) -> &str {
        &self.host
    }

    fn port(&self) -> u16 {
        self.port
    }
}

impl AsyncRead for DialConn {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        Pin::new(&mut self.get_mut().stream).poll_read(cx, buf)
    }
}

impl AsyncWrite for DialConn {
    fn poll_write(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        Pin::new(&mut self.get_mut().stream).poll_write(cx, buf)
    }

    fn poll_flush(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Pin::new(&mut self.get_mut().stream).poll_flush(cx)
    }

    fn poll_shutdown(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Pin::new(&mut self.get_mut().stream).poll_shutdown(cx)
    }
}

enum AcceptState {
    Pending(oneshot::Receiver<io::Result<TcpStream>>),
    Accepted(TcpStream),
    Failed(io::ErrorKind, String),
}

/// Server side: an ephemeral listener that accepts exactly one connection.
///
/// The accept runs in its own task so the PASV/EPSV reply can go out before
/// the client dials in. The first read or write waits for that accept; its
/// outcome is kept for every later call.
pub struct PassiveConn {
    host: String,
    port: u16,
    state: AcceptState,
    accept_task: JoinHandle<()>,
}

impl PassiveConn {
    /// Binds `host:0` and starts accepting in the background.
    pub async fn listen(host: &str, logger: SessionLogger) -> io::Result<Self> {
        let listener = TcpListener::bind((host, 0)).await?;
        let addr = listener.local_addr()?;
        logger.debug(format_args!("Passive listener bound on {}", addr));

        let (tx, rx) = oneshot::channel();
        let accept_task = tokio::spawn(async move {
            let outcome = match listener.accept().await {
                Ok((stream, peer)) => {
                    logger.debug(format_args!("Accepted data connection from {}", peer));
                    Ok(stream)
                }
                Err(e) => {
                    logger.error(format_args!("Failed to accept data connection: {}", e));
                    Err(e)
                }
            };
            // The receiver is gone if the session already dropped this channel.
            let _ = tx.send(outcome);
        });

        Ok(Self {
            host: addr.ip().to_string(),
            port: addr.port(),
            state: AcceptState::Pending(rx),
            accept_task,
        })
    }

    /// Waits for the accept to finish, then yields the accepted socket or
    /// the accept error.
    fn poll_accepted(&mut self, cx: &mut Context<'_>) -> Poll<io::Result<&mut TcpStream>> {
        if let AcceptState::Pending(rx) = &mut self.state {
            let outcome = ready!(Pin::new(rx).poll(cx));
            self.state = match outcome {
                Ok(Ok(stream)) => AcceptState::Accepted(stream),
                Ok(Err(e)) => AcceptState::Failed(e.kind(), e.to_string()),
                Err(_) => AcceptState::Failed(
                    io::ErrorKind::BrokenPipe,
                    "accept task ended without a connection".to_string(),
                ),
            };
        }

        match &mut self.state {
            AcceptState::Accepted(stream) => Poll::Ready(Ok(stream)),
            AcceptState::Failed(kind, message) => {
                Poll::Ready(Err(io::Error::new(*kind, message.clone())))
            }
            AcceptState::Pending(_) => Poll::Ready(Err(io::Error::new(
                io::ErrorKind::NotConnected,
                "data connection not accepted",
            ))),
        }
    }
}

impl DataConn for PassiveConn {
    fn host(&self) -> &str {
        &self.host
    }

    fn port(&self) -> u16 {
        self.port
    }
}

impl AsyncRead for PassiveConn {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        let stream = ready!(self.get_mut().poll_accepted(cx))?;
        Pin::new(stream).poll_read(cx, buf)
    }
}

impl AsyncWrite for PassiveConn {
    fn poll_write(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        let stream = ready!(self.get_mut().poll_accepted(cx))?;
        Pin::new(stream).poll_write(cx, buf)
    }

    fn poll_flush(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        match &mut self.get_mut().state {
            AcceptState::Accepted(stream) => Pin::new(stream).poll_flush(cx),
            _ => Poll::Ready(Ok(())),
        }
    }

    /// Closing never waits for a client that has not dialed in yet.
    fn poll_shutdown(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        let this = self.get_mut();
        if let AcceptState::Accepted(stream) = &mut this.state {
            return Pin::new(stream).poll_shutdown(cx);
        }
        if matches!(this.state, AcceptState::Pending(_)) {
            this.accept_task.abort();
            this.state =
                AcceptState::Failed(io::ErrorKind::NotConnected, "data connection closed".into());
        }
        Poll::Ready(Ok(()))
    }
}

impl Drop for PassiveConn {
    fn drop(&mut self) {
        // Releases the ephemeral port if nobody ever connected.
        self.accept_task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    #[tokio::test]
    async fn test_passive_read_waits_for_accept() {
        let logger = SessionLogger::new("test");
        let mut passive = PassiveConn::listen("127.0.0.1", logger).await.unwrap();
        let port = passive.port();
        assert_eq!(passive.host(), "127.0.0.1");

        let client = tokio::spawn(async move {
            let mut dial = DialConn::connect("127.0.0.1", port, Some(Duration::from_secs(5)))
                .await
                .unwrap();
            dial.write_all(b"hello data").await.unwrap();
            dial.shutdown().await.unwrap();
        });

        let mut received = Vec::new();
        passive.read_to_end(&mut received).await.unwrap();
        assert_eq!(received, b"hello data");
        client.await.unwrap();
    }

    #[tokio::test]
    async fn test_shutdown_before_accept_does_not_block() {
        let logger = SessionLogger::new("test");
        let mut passive = PassiveConn::listen("127.0.0.1", logger).await.unwrap();
        passive.shutdown().await.unwrap();
        // Further I/O reports the closed state instead of hanging.
        let mut buf = [0u8; 4];
        assert!(passive.read(&mut buf).await.is_err());
    }

    #[tokio::test]
    async fn test_dial_refused_is_connection_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);
        assert!(DialConn::connect("127.0.0.1", port, Some(Duration::from_secs(2)))
            .await
            .is_err());
    }
}
