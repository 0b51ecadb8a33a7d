//! The unread-mail sweep.
//!
//! Composes a [`SessionProvider`], the [`UnreadMailExtractor`] and
//! guaranteed release of the folder and session.

pub mod imap;

use tracing::{info, warn};

use crate::config::{ConfigError, MailboxConfig};
use crate::error::Result;
use crate::extractor::UnreadMailExtractor;
use crate::folder::{MailFolder, SessionProvider};

pub use imap::{ImapFolder, ImapSessionProvider, SelectedClient};

/// Reads all unread mail of the configured folder over IMAP.
///
/// # Errors
///
/// See [`read_unread_mails_with`].
pub async fn read_unread_mails(config: &MailboxConfig) -> Result<String> {
    read_unread_mails_with(&ImapSessionProvider::new(), config).await
}

/// Reads all unread mail through `provider` and returns the report.
///
/// The configuration is validated before anything is opened. Once the
/// folder is open it is closed exactly once, whether extraction succeeded
/// or not.
///
/// # Errors
///
/// - [`crate::Error::Config`] if the configuration is invalid
/// - [`crate::Error::Connection`] if the folder cannot be opened
/// - [`crate::Error::MailAccess`] or [`crate::Error::Io`] from extraction,
///   taking precedence over a failure to close
/// - [`crate::Error::MailAccess`] from closing when extraction succeeded
pub async fn read_unread_mails_with<P>(provider: &P, config: &MailboxConfig) -> Result<String>
where
    P: SessionProvider,
{
    config.validate().map_err(ConfigError::Invalid)?;

    let mut folder = provider.open_inbox(config).await?;
    let extracted = UnreadMailExtractor::new(config.seen_policy)
        .extract_unread(&mut folder)
        .await;
    let closed = folder.close().await;

    match (extracted, closed) {
        (Ok(report), Ok(())) => {
            info!(folder = %config.folder, bytes = report.len(), "unread mail read");
            Ok(report)
        }
        (Ok(_), Err(close_error)) => Err(close_error),
        (Err(e), Ok(())) => Err(e),
        (Err(e), Err(close_error)) => {
            warn!(error = %close_error, "closing folder after a failed extraction also failed");
            Err(e)
        }
    }
}
