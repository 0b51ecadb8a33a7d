//! # mailsift-imap
//!
//! A small IMAP client covering exactly what an unread-mail sweep needs:
//! connect (implicit TLS or plaintext), LOGIN, SELECT, `UID SEARCH`,
//! `UID STORE`, `UID FETCH`, UNSELECT/CLOSE and LOGOUT.
//!
//! ## Connection States
//!
//! The client uses the type-state pattern, so commands that are only valid
//! in one protocol state are only callable in that state:
//!
//! ```text
//! NotAuthenticated ── login() ──→ Authenticated ── select() ──→ Selected
//!                                       ↑                          │
//!                                       └──────── unselect() ──────┘
//! ```
//!
//! ## Example
//!
//! ```ignore
//! use mailsift_imap::{Client, Config, FetchAttribute, FetchItems, SearchCriteria, Security};
//!
//! let config = Config::new("imap.example.com").with_security(Security::Implicit);
//! let stream = mailsift_imap::connection::connect(&config).await?;
//! let client = Client::from_stream(stream).await?;
//! let client = client.login("user@example.com", "secret").await?;
//! let (mut inbox, _status) = client.select("INBOX").await.map_err(|(e, _)| e)?;
//!
//! let unread = inbox.uid_search(&SearchCriteria::Unseen).await?;
//! for uid in unread {
//!     let items = FetchItems::new(vec![FetchAttribute::Uid, FetchAttribute::Envelope]);
//!     let _ = inbox.uid_fetch(&uid.into(), &items).await?;
//! }
//!
//! inbox.unselect().await?.logout().await?;
//! ```
//!
//! ## Modules
//!
//! - [`command`]: command types and wire serialization
//! - [`connection`]: streams, framing and the type-state client
//! - [`parser`]: sans-I/O response parser
//! - [`types`]: flags, identifiers, capabilities, mailbox status

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod command;
pub mod connection;
mod error;
pub mod parser;
pub mod types;

pub use command::{Command, FetchAttribute, FetchItems, SearchCriteria, StoreAction, TagGenerator};
pub use connection::{
    Authenticated, Client, Config, FramedStream, ImapStream, NotAuthenticated,
    Security, Selected,
};
pub use error::{Error, Result};
pub use parser::{Address, Envelope, FetchItem, Response, ResponseParser, UntaggedResponse};
pub use types::{
    Capability, Flag, Flags, MailboxStatus, ResponseCode, SeqNum, Status, Tag, Uid, UidSet,
};
