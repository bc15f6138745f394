pub mod client;
pub mod error;
pub mod response;

pub use client::ClientConn;
pub use error::FtpError;
pub use response::{DataResponse, Response};
