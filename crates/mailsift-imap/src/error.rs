//! Client errors.

use std::time::Duration;

use thiserror::Error;

/// Everything that can go wrong between connecting and logging out.
#[derive(Debug, Error)]
pub enum Error {
    /// Socket read, write or connect failure.
    #[error("network: {0}")]
    Io(#[from] std::io::Error),

    /// TLS setup or record failure.
    #[error("tls: {0}")]
    Tls(#[from] rustls::Error),

    /// The host cannot be used as a TLS server name.
    #[error("host is not a valid TLS server name: {0}")]
    InvalidDnsName(#[from] rustls::pki_types::InvalidDnsNameError),

    /// Bytes from the server that do not parse as a response.
    #[error("malformed response at byte {position}: {message}")]
    Parse {
        /// Offset into the response line.
        position: usize,
        /// What the parser expected.
        message: String,
    },

    /// LOGIN completed with NO or BAD.
    #[error("login rejected: {0}")]
    Auth(String),

    /// A command completed with NO.
    #[error("command refused: {0}")]
    No(String),

    /// A command completed with BAD.
    #[error("command rejected as invalid: {0}")]
    Bad(String),

    /// The server closed the session.
    #[error("server said BYE: {0}")]
    Bye(String),

    /// Connecting took longer than the configured limit.
    #[error("timed out after {0:?}")]
    Timeout(Duration),

    /// The server answered out of protocol.
    #[error("protocol violation: {0}")]
    Protocol(String),
}

impl Error {
    /// Whether the connection is gone and no further command can be sent.
    #[must_use]
    pub const fn is_disconnect(&self) -> bool {
        matches!(
            self,
            Self::Io(_) | Self::Tls(_) | Self::Bye(_) | Self::Timeout(_)
        )
    }
}

/// Result alias for client operations.
pub type Result<T> = std::result::Result<T, Error>;
