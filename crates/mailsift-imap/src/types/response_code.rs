//! Response codes.

use super::{Capability, Flag, SeqNum, Uid};

/// Bracketed response code attached to a status response, e.g.
/// `* OK [UIDVALIDITY 3857529045] UIDs valid`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseCode {
    /// ALERT: human-readable message that must be shown to the user.
    Alert,
    /// CAPABILITY list sent alongside a greeting or LOGIN completion.
    Capability(Vec<Capability>),
    /// PERMANENTFLAGS: flags the client may change permanently.
    PermanentFlags(Vec<Flag>),
    /// READ-ONLY: the mailbox was selected without write access.
    ReadOnly,
    /// READ-WRITE: the mailbox was selected with write access.
    ReadWrite,
    /// UIDNEXT: next UID to be assigned.
    UidNext(Uid),
    /// UIDVALIDITY value of the mailbox.
    UidValidity(u32),
    /// UNSEEN: sequence number of the first unseen message.
    Unseen(SeqNum),
    /// Unrecognized code, kept verbatim.
    Unknown(String),
}

impl ResponseCode {
    /// Parses the text found between `[` and `]`.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        let (name, rest) = raw
            .split_once(' ')
            .map_or((raw, ""), |(name, rest)| (name, rest.trim()));

        let number = || rest.split_whitespace().next()?.parse::<u32>().ok();

        match name.to_ascii_uppercase().as_str() {
            "ALERT" => Self::Alert,
            "READ-ONLY" => Self::ReadOnly,
            "READ-WRITE" => Self::ReadWrite,
            "CAPABILITY" => Self::Capability(rest.split_whitespace().map(Capability::parse).collect()),
            "PERMANENTFLAGS" => Self::PermanentFlags(
                rest.trim_start_matches('(')
                    .trim_end_matches(')')
                    .split_whitespace()
                    .map(Flag::parse)
                    .collect(),
            ),
            "UIDNEXT" => number()
                .and_then(Uid::new)
                .map_or_else(|| Self::Unknown(raw.to_string()), Self::UidNext),
            "UIDVALIDITY" => number().map_or_else(|| Self::Unknown(raw.to_string()), Self::UidValidity),
            "UNSEEN" => number()
                .and_then(SeqNum::new)
                .map_or_else(|| Self::Unknown(raw.to_string()), Self::Unseen),
            _ => Self::Unknown(raw.to_string()),
        }
    }
}
