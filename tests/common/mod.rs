#![allow(dead_code)]

use rouilleftp::config::ServerConfig;
use rouilleftp::{ClientConn, Config, FtpServer};
use std::path::Path;
use std::sync::Arc;
use tokio::io::AsyncReadExt;

/// Binds a server to an ephemeral loopback port serving `root`.
pub async fn bind_server(root: &Path) -> FtpServer {
    let config = Config {
        server: ServerConfig {
            listen_address: "127.0.0.1".to_string(),
            listen_port: 0,
            chroot_dir: root.to_string_lossy().into_owned(),
            ..ServerConfig::default()
        },
    };

    FtpServer::bind(Arc::new(config)).await.unwrap()
}

/// Starts a server on an ephemeral loopback port serving `root`.
pub async fn start_server(root: &Path) -> String {
    let server = bind_server(root).await;
    let addr = server.local_addr().unwrap();
    tokio::spawn(server.run());
    addr.to_string()
}

pub async fn connect(root: &Path) -> ClientConn {
    let addr = start_server(root).await;
    ClientConn::connect_anonymous(&addr).await.unwrap()
}

/// Retrieves `path` from `offset` and closes the transfer.
pub async fn fetch(conn: &mut ClientConn, path: &str, offset: u64) -> Vec<u8> {
    let mut response = conn.retr_from(path, offset).await.unwrap();
    let mut data = Vec::new();
    response.read_to_end(&mut data).await.unwrap();
    response.close().await.unwrap();
    data
}
