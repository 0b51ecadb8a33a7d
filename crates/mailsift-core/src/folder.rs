//! Folder handles and the message view they produce.

use std::fmt;
use std::io;

use mailsift_mime::{ContentType, Part};

use crate::config::MailboxConfig;
use crate::error::Result;

/// Folder-scoped stable identifier of a message (an IMAP UID).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MessageId(u32);

impl MessageId {
    /// Creates an identifier.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the raw value.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<mailsift_imap::Uid> for MessageId {
    fn from(uid: mailsift_imap::Uid) -> Self {
        Self(uid.get())
    }
}

/// Declared content kind of a body part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentKind {
    /// `text/plain`.
    PlainText,
    /// Anything else, as `type/subtype` (or the raw header when unparsable).
    Other(String),
}

impl ContentKind {
    /// Classifies a parsed content type.
    #[must_use]
    pub fn from_content_type(content_type: &ContentType) -> Self {
        if content_type.is_text_plain() {
            Self::PlainText
        } else {
            Self::Other(content_type.mime_type())
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PlainText => f.write_str("text/plain"),
            Self::Other(mime) => f.write_str(mime),
        }
    }
}

/// Resolved textual content of a body part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BodyContent {
    /// Declared content kind.
    pub kind: ContentKind,
    /// Decoded text.
    pub text: String,
}

#[derive(Debug, Clone)]
enum PartSource {
    Mime(Part),
    Text(String),
}

/// One body part. Its content is decoded on demand.
#[derive(Debug, Clone)]
pub struct BodyPart {
    kind: ContentKind,
    source: PartSource,
}

impl BodyPart {
    /// Wraps a parsed MIME entity. The kind is derived once from its
    /// Content-Type; a malformed header yields [`ContentKind::Other`].
    #[must_use]
    pub fn from_mime(part: Part) -> Self {
        let kind = match part.content_type() {
            Ok(content_type) => ContentKind::from_content_type(&content_type),
            Err(_) => ContentKind::Other(
                part.headers
                    .get("content-type")
                    .unwrap_or_default()
                    .to_string(),
            ),
        };
        Self {
            kind,
            source: PartSource::Mime(part),
        }
    }

    /// A part whose content is already decoded text.
    #[must_use]
    pub fn text(kind: ContentKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            source: PartSource::Text(text.into()),
        }
    }

    /// Declared content kind.
    #[must_use]
    pub const fn kind(&self) -> &ContentKind {
        &self.kind
    }

    /// Decodes the part's textual content.
    ///
    /// # Errors
    ///
    /// Returns [`io::ErrorKind::InvalidData`] if the Content-Type is
    /// malformed or transfer decoding fails.
    pub fn read_content(&self) -> io::Result<BodyContent> {
        let text = match &self.source {
            PartSource::Mime(part) => part
                .body_text()
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?,
            PartSource::Text(text) => text.clone(),
        };
        Ok(BodyContent {
            kind: self.kind.clone(),
            text,
        })
    }
}

/// Body of a message.
#[derive(Debug, Clone)]
pub enum BodyStructure {
    /// Not multipart.
    Single(BodyPart),
    /// Multipart, parts in wire order.
    Multipart(Vec<BodyPart>),
}

/// Read-only view of one message.
#[derive(Debug, Clone)]
pub struct MessageRecord {
    /// Identifier within the folder.
    pub id: MessageId,
    /// Sender addresses in server order.
    pub from: Vec<String>,
    /// To addresses in server order.
    pub to: Vec<String>,
    /// Cc addresses in server order, possibly empty.
    pub cc: Vec<String>,
    /// Decoded subject.
    pub subject: Option<String>,
    /// Whether the `\Seen` flag was set when fetched.
    pub seen: bool,
    /// Body structure.
    pub body: BodyStructure,
}

/// An open folder of an authenticated session.
///
/// Closing consumes the handle, so a closed folder cannot be queried.
#[allow(async_fn_in_trait)]
pub trait MailFolder {
    /// Identifiers of all messages without `\Seen`, in backend order.
    async fn search_unread(&mut self) -> Result<Vec<MessageId>>;

    /// Sets `\Seen` on one message.
    async fn mark_seen(&mut self, id: MessageId) -> Result<()>;

    /// Fetches one message without changing its flags.
    async fn fetch(&mut self, id: MessageId) -> Result<MessageRecord>;

    /// Closes the folder, then the session that owns it.
    async fn close(self) -> Result<()>;
}

/// Opens folder handles from connection parameters.
#[allow(async_fn_in_trait)]
pub trait SessionProvider {
    /// Handle type produced by this provider.
    type Folder: MailFolder;

    /// Opens the configured folder read-write on a fresh authenticated
    /// session. Every failure is [`crate::Error::Connection`] and leaves
    /// nothing open.
    async fn open_inbox(&self, config: &MailboxConfig) -> Result<Self::Folder>;
}
