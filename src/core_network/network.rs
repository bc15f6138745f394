use crate::constants::status;
use crate::core_ftpcommand::ftpcommand::FtpCommand;
use crate::core_ftpcommand::handlers::initialize_command_handlers;
use crate::core_log::SessionLogger;
use crate::core_network::pasv::passive_host;
use crate::helpers::{send_status, ControlWriter};
use crate::session::Session;
use crate::Config;
use anyhow::{Context, Result};
use log::{error, info};
use std::future::Future;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Mutex;

/// A bound control listener together with the root it serves.
pub struct FtpServer {
    listener: TcpListener,
    config: Arc<Config>,
    base_path: PathBuf,
}

impl FtpServer {
    /// Binds the configured listen address and resolves the served root.
    pub async fn bind(config: Arc<Config>) -> Result<Self> {
        let base_path = PathBuf::from(&config.server.chroot_dir)
            .canonicalize()
            .with_context(|| format!("Invalid root directory: {}", config.server.chroot_dir))?;

        let addr = config.listen_addr();
        let listener = TcpListener::bind(&addr)
            .await
            .with_context(|| format!("Failed to bind {}", addr))?;

        Ok(Self {
            listener,
            config,
            base_path,
        })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accepts control connections forever, one task per connection.
    pub async fn run(self) -> Result<()> {
        self.run_until(std::future::pending()).await
    }

    /// Accepts control connections until `shutdown` completes, then closes
    /// the listener. Sessions already running are left to finish.
    pub async fn run_until<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        info!(
            "Server listening on {} serving {:?}",
            self.local_addr()?,
            self.base_path
        );
        tokio::pin!(shutdown);

        loop {
            let (socket, addr) = tokio::select! {
                accepted = self.listener.accept() => accepted?,
                _ = &mut shutdown => {
                    info!("Server on {} stopping", self.local_addr()?);
                    return Ok(());
                }
            };
            info!("New connection from {}", addr);

            let config = Arc::clone(&self.config);
            let base_path = self.base_path.clone();

            tokio::spawn(async move {
                if let Err(e) = handle_connection(socket, addr, config, base_path).await {
                    error!("Connection error for {}: {:?}", addr, e);
                }
                info!("Connection closed for {}", addr);
            });
        }
    }
}

pub async fn start_server(config: Arc<Config>) -> Result<()> {
    FtpServer::bind(config).await?.run().await
}

/// Drives one control connection until QUIT, end of input, or a failed
/// read or write.
pub async fn handle_connection(
    socket: TcpStream,
    addr: SocketAddr,
    config: Arc<Config>,
    base_path: PathBuf,
) -> Result<()> {
    let logger = SessionLogger::new(addr);
    let host = match &config.server.pasv_address {
        Some(host) => host.clone(),
        None => passive_host(socket.local_addr()?.ip()),
    };

    let (read_half, write_half) = socket.into_split();
    let writer: ControlWriter = Arc::new(Mutex::new(write_half));
    let mut reader = BufReader::new(read_half);
    let session = Arc::new(Mutex::new(Session::new(base_path, host, logger.clone())));

    send_status(&writer, &logger, status::READY).await?;

    let handlers = initialize_command_handlers();
    let mut buffer = Vec::new();

    loop {
        buffer.clear();
        match reader.read_until(b'\n', &mut buffer).await {
            Ok(0) => {
                logger.info("Client closed the control connection.");
                break;
            }
            Ok(_) => {}
            Err(e) => {
                logger.error(format_args!("Failed to read command: {}", e));
                break;
            }
        }

        let line = String::from_utf8_lossy(&buffer);
        let mut parts = line.split_whitespace();
        let token = parts.next().unwrap_or_default();
        let arg = parts.collect::<Vec<_>>().join(" ");
        let command = FtpCommand::parse(token);

        if command == Some(FtpCommand::PASS) {
            logger.received("PASS ****");
        } else {
            logger.received(line.trim_end());
        }

        let Some((command, handler)) = command.and_then(|c| handlers.get(&c).map(|h| (c, h)))
        else {
            send_status(&writer, &logger, status::COMMAND_NOT_IMPLEMENTED).await?;
            continue;
        };

        if let Err(e) = handler(
            Arc::clone(&writer),
            Arc::clone(&config),
            Arc::clone(&session),
            arg,
        )
        .await
        {
            logger.error(format_args!("Error handling command {:?}: {}", command, e));
            break;
        }

        if command == FtpCommand::QUIT {
            break;
        }
    }

    session.lock().await.close_data_conn().await;
    if let Err(e) = writer.lock().await.shutdown().await {
        logger.debug(format_args!("Error shutting down control connection: {}", e));
    }
    logger.info("Session ended.");
    Ok(())
}
