//! IMAP command builder.
//!
//! Covers the commands needed to log in, select a mailbox read-write,
//! search it, flag messages and fetch them by UID.

mod tag_generator;
mod types;
mod wire;

use crate::types::UidSet;

pub use tag_generator::TagGenerator;
pub use types::{FetchAttribute, FetchItems, SearchCriteria, StoreAction};

use wire::{AString, Store, push_arg};

/// A client command. Tagging happens at serialization time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `CAPABILITY`, valid in any state.
    Capability,
    /// `NOOP`, valid in any state.
    Noop,
    /// `LOGOUT`, valid in any state.
    Logout,
    /// `LOGIN user pass`.
    #[allow(missing_docs)]
    Login { username: String, password: String },
    /// `SELECT mailbox`, opening it read-write.
    #[allow(missing_docs)]
    Select { mailbox: String },
    /// `CLOSE`. Also expunges `\Deleted` messages.
    Close,
    /// `UNSELECT` (RFC 3691). Leaves the mailbox without expunging.
    Unselect,
    /// `UID SEARCH criteria`.
    #[allow(missing_docs)]
    UidSearch { criteria: SearchCriteria },
    /// `UID FETCH uids items`.
    #[allow(missing_docs)]
    UidFetch { uids: UidSet, items: FetchItems },
    /// `UID STORE uids action`. `silent` suppresses the FETCH echo.
    #[allow(missing_docs)]
    UidStore {
        uids: UidSet,
        action: StoreAction,
        silent: bool,
    },
}

impl Command {
    /// Wire form of the command under `tag`, CRLF included.
    #[must_use]
    pub fn serialize(&self, tag: &str) -> Vec<u8> {
        let mut out = Vec::with_capacity(64);
        out.extend_from_slice(tag.as_bytes());
        out.push(b' ');
        out.extend_from_slice(self.name().as_bytes());

        match self {
            Self::Capability | Self::Noop | Self::Logout | Self::Close | Self::Unselect => {}
            Self::Login { username, password } => {
                push_arg(&mut out, &AString(username));
                push_arg(&mut out, &AString(password));
            }
            Self::Select { mailbox } => push_arg(&mut out, &AString(mailbox)),
            Self::UidSearch { criteria } => push_arg(&mut out, criteria),
            Self::UidFetch { uids, items } => {
                push_arg(&mut out, uids);
                push_arg(&mut out, items);
            }
            Self::UidStore {
                uids,
                action,
                silent,
            } => {
                push_arg(&mut out, uids);
                push_arg(
                    &mut out,
                    &Store {
                        action,
                        silent: *silent,
                    },
                );
            }
        }
        out.extend_from_slice(b"\r\n");
        out
    }

    /// Command keyword; also what gets logged, so LOGIN never leaks its
    /// arguments.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Capability => "CAPABILITY",
            Self::Noop => "NOOP",
            Self::Logout => "LOGOUT",
            Self::Login { .. } => "LOGIN",
            Self::Select { .. } => "SELECT",
            Self::Close => "CLOSE",
            Self::Unselect => "UNSELECT",
            Self::UidSearch { .. } => "UID SEARCH",
            Self::UidFetch { .. } => "UID FETCH",
            Self::UidStore { .. } => "UID STORE",
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::{Flag, Uid};

    fn uid(n: u32) -> UidSet {
        Uid::new(n).unwrap().into()
    }

    fn wire(cmd: &Command) -> String {
        String::from_utf8(cmd.serialize("A0001")).unwrap()
    }

    #[test]
    fn login_quotes_when_needed() {
        let cmd = Command::Login {
            username: "bob@example.com".into(),
            password: "pa ss\"word".into(),
        };
        assert_eq!(wire(&cmd), "A0001 LOGIN bob@example.com \"pa ss\\\"word\"\r\n");
    }

    #[test]
    fn login_sends_unquotable_text_as_literals() {
        let cmd = Command::Login {
            username: "bob".into(),
            password: "p\u{e4}ssw".into(),
        };
        assert_eq!(wire(&cmd), "A0001 LOGIN bob {6}\r\np\u{e4}ssw\r\n");

        let cmd = Command::Login {
            username: "bob\r\nA0002 DELETE INBOX".into(),
            password: "x".into(),
        };
        assert_eq!(
            wire(&cmd),
            "A0001 LOGIN {23}\r\nbob\r\nA0002 DELETE INBOX x\r\n"
        );
    }

    #[test]
    fn login_empty_password_is_quoted() {
        let cmd = Command::Login {
            username: "bob".into(),
            password: String::new(),
        };
        assert_eq!(wire(&cmd), "A0001 LOGIN bob \"\"\r\n");
    }

    #[test]
    fn select_inbox() {
        let cmd = Command::Select {
            mailbox: "INBOX".into(),
        };
        assert_eq!(wire(&cmd), "A0001 SELECT INBOX\r\n");
    }

    #[test]
    fn uid_search_unseen() {
        let cmd = Command::UidSearch {
            criteria: SearchCriteria::Unseen,
        };
        assert_eq!(wire(&cmd), "A0001 UID SEARCH UNSEEN\r\n");
    }

    #[test]
    fn uid_search_compound() {
        let cmd = Command::UidSearch {
            criteria: SearchCriteria::And(vec![
                SearchCriteria::Unseen,
                SearchCriteria::Not(Box::new(SearchCriteria::Deleted)),
            ]),
        };
        assert_eq!(wire(&cmd), "A0001 UID SEARCH UNSEEN NOT DELETED\r\n");
    }

    #[test]
    fn uid_store_silent_seen() {
        let cmd = Command::UidStore {
            uids: uid(42),
            action: StoreAction::AddFlags(vec![Flag::Seen]),
            silent: true,
        };
        assert_eq!(wire(&cmd), "A0001 UID STORE 42 +FLAGS.SILENT (\\Seen)\r\n");
    }

    #[test]
    fn uid_fetch_envelope_and_body() {
        let cmd = Command::UidFetch {
            uids: uid(7),
            items: FetchItems::new(vec![
                FetchAttribute::Uid,
                FetchAttribute::Envelope,
                FetchAttribute::full_message_peek(),
            ]),
        };
        assert_eq!(wire(&cmd), "A0001 UID FETCH 7 (UID ENVELOPE BODY.PEEK[])\r\n");
    }

    #[test]
    fn uid_fetch_single_item_is_bare() {
        let cmd = Command::UidFetch {
            uids: uid(7),
            items: FetchItems::new(vec![FetchAttribute::Flags]),
        };
        assert_eq!(wire(&cmd), "A0001 UID FETCH 7 FLAGS\r\n");
    }

    #[test]
    fn login_name_hides_credentials() {
        let cmd = Command::Login {
            username: "u".into(),
            password: "secret".into(),
        };
        assert_eq!(cmd.name(), "LOGIN");
    }
}
