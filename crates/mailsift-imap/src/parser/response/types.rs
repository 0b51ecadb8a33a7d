//! Parsed response values.

use crate::types::{Capability, Flags, ResponseCode, SeqNum, Status, Uid};

/// A data item inside `* n FETCH (...)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchItem {
    #[allow(missing_docs)]
    Flags(Flags),
    #[allow(missing_docs)]
    Envelope(Box<Envelope>),
    #[allow(missing_docs)]
    Uid(Uid),
    /// `BODY[section]<origin>` contents. `BODY.PEEK` is answered as `BODY`.
    Body {
        /// `None` for the whole message.
        section: Option<String>,
        /// Offset of a partial fetch.
        origin: Option<u32>,
        /// `None` when the server sent NIL.
        data: Option<Vec<u8>>,
    },
}

/// The server's parse of a message's main headers, field order as on
/// the wire. String fields are raw; the subject may still hold RFC 2047
/// encoded words. NIL address lists are empty.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[allow(missing_docs)]
pub struct Envelope {
    pub date: Option<String>,
    pub subject: Option<String>,
    pub from: Vec<Address>,
    pub sender: Vec<Address>,
    pub reply_to: Vec<Address>,
    pub to: Vec<Address>,
    pub cc: Vec<Address>,
    pub bcc: Vec<Address>,
    pub in_reply_to: Option<String>,
    pub message_id: Option<String>,
}

/// One `(name adl mailbox host)` entry of an envelope address list.
///
/// A NIL host marks group syntax: the entry opening a group carries the
/// group name as mailbox, the one closing it has no mailbox either.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Address {
    /// Display name.
    pub name: Option<String>,
    /// Obsolete source route.
    pub adl: Option<String>,
    /// Local part.
    pub mailbox: Option<String>,
    /// Domain.
    pub host: Option<String>,
}

impl Address {
    /// `mailbox@host`; `None` for group markers.
    #[must_use]
    pub fn email(&self) -> Option<String> {
        let mailbox = self.mailbox.as_deref()?;
        let host = self.host.as_deref()?;
        Some(format!("{mailbox}@{host}"))
    }
}

/// Data sent on a `*` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UntaggedResponse {
    /// `* OK|NO|BAD|PREAUTH|BYE [code] text`.
    Status {
        /// Which condition.
        status: Status,
        /// Bracketed response code, if any.
        code: Option<ResponseCode>,
        /// Remaining human-readable text.
        text: String,
    },
    /// `* CAPABILITY ...`
    Capability(Vec<Capability>),
    /// `* FLAGS (...)` of the selected mailbox.
    Flags(Flags),
    /// `* n EXISTS`
    Exists(u32),
    /// `* n RECENT`
    Recent(u32),
    /// `* n EXPUNGE`
    Expunge(SeqNum),
    /// `* SEARCH ...`; UIDs when answering UID SEARCH.
    Search(Vec<u32>),
    /// `* n FETCH (...)`
    Fetch {
        #[allow(missing_docs)]
        seq: SeqNum,
        /// Items in the order the server sent them.
        items: Vec<FetchItem>,
    },
    /// Anything this client does not interpret, by keyword.
    Other(String),
}
