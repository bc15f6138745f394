//! FTP client and server sharing one protocol core: the control-connection
//! reply reader, passive data connections, and the LIST line codec.

pub mod config;
pub mod constants;
pub mod core_cli;
pub mod core_client;
pub mod core_ftpcommand;
pub mod core_listing;
pub mod core_log;
pub mod core_network;
pub mod helpers;
pub mod server;
pub mod session;

pub use config::Config;
pub use core_client::{ClientConn, DataResponse, FtpError, Response};
pub use core_listing::{Entry, EntryType};
pub use core_network::network::FtpServer;
