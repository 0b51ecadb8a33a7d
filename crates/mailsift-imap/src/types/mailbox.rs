//! What SELECT reports about a folder.

use super::{Flags, SeqNum, Uid};

/// Folder state collected from the untagged lines and response codes of a
/// SELECT. Fields the server did not send keep their default.
#[derive(Debug, Clone, Default)]
pub struct MailboxStatus {
    /// `* n EXISTS`.
    pub exists: u32,
    /// `* n RECENT`.
    pub recent: u32,
    /// `[UNSEEN n]`, sequence number of the first unseen message.
    pub unseen: Option<SeqNum>,
    /// `[UIDNEXT n]`.
    pub uid_next: Option<Uid>,
    /// `[UIDVALIDITY n]`.
    pub uid_validity: Option<u32>,
    /// `* FLAGS (...)`.
    pub flags: Flags,
    /// `[PERMANENTFLAGS (...)]`.
    pub permanent_flags: Flags,
    /// Set by `[READ-ONLY]`. Flags cannot be stored in such a folder.
    pub read_only: bool,
}
