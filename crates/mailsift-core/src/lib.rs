//! # mailsift-core
//!
//! Reads the unread messages of one mailbox folder, marks them seen, and
//! renders the plain-text ones into a single report.
//!
//! This crate provides:
//! - Mailbox configuration (JSON, environment override, validation)
//! - The [`MailFolder`] and [`SessionProvider`] seams
//! - An IMAP-backed provider ([`ImapSessionProvider`])
//! - The [`UnreadMailExtractor`] and report rendering
//! - [`read_unread_mails`], which always releases the folder and session
//!
//! ```ignore
//! use mailsift_core::{MailboxConfig, read_unread_mails};
//!
//! let config = MailboxConfig::load(&MailboxConfig::default_path()?)?;
//! print!("{}", read_unread_mails(&config).await?);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod config;
mod error;
pub mod extractor;
pub mod folder;
pub mod report;
pub mod service;

pub use config::{
    ConfigError, MailboxConfig, PASSWORD_ENV, SeenPolicy, ValidationError, ValidationResult,
    validate_config,
};
pub use error::{Error, Result};
pub use extractor::UnreadMailExtractor;
pub use folder::{
    BodyContent, BodyPart, BodyStructure, ContentKind, MailFolder, MessageId, MessageRecord,
    SessionProvider,
};
pub use report::{MessageBlock, ReportBuffer};
pub use service::{
    ImapFolder, ImapSessionProvider, SelectedClient, read_unread_mails, read_unread_mails_with,
};
