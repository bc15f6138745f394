use crate::core_listing::ListingError;
use std::io;
use thiserror::Error;

/// Errors returned by [`ClientConn`](super::ClientConn).
#[derive(Debug, Error)]
pub enum FtpError {
    /// Dialing the control or data connection failed or timed out.
    #[error("connection failed: {0}")]
    Connection(#[source] io::Error),

    /// A stream failed while a command or transfer was in flight.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The server sent something that could not be parsed.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// The server answered with an unexpected code.
    #[error("{code} {message}")]
    Status { code: u16, message: String },

    /// Neither EPSV nor PASV produced a data port.
    #[error("passive mode negotiation failed: EPSV: {extended}; PASV: {legacy}")]
    Negotiation {
        extended: Box<FtpError>,
        legacy: Box<FtpError>,
    },

    #[error("invalid listing line: {0}")]
    ListLine(#[from] ListingError),
}

impl FtpError {
    /// The server's reply code, for errors that carry one.
    pub fn code(&self) -> Option<u16> {
        match self {
            FtpError::Status { code, .. } => Some(*code),
            _ => None,
        }
    }
}
