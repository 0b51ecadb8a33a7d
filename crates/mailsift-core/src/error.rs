//! The ways a sweep can fail.

use thiserror::Error;

use crate::config::ConfigError;

/// Errors surfaced by an unread-mail extraction.
#[derive(Debug, Error)]
pub enum Error {
    /// The session could not be established, or was found disconnected
    /// before use.
    #[error("Connection error: {0}")]
    Connection(String),

    /// A folder or message operation failed (search, flag update, fetch).
    #[error("Mail access error: {0}")]
    MailAccess(String),

    /// Reading the textual content of a body part failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration is unreadable or invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Result alias for sweep operations.
pub type Result<T> = std::result::Result<T, Error>;
