//! Server capabilities and response status.

/// A server capability advertised in a greeting or CAPABILITY response.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Capability {
    /// `IMAP4rev1` (RFC 3501).
    Imap4Rev1,
    /// `IMAP4rev2` (RFC 9051).
    Imap4Rev2,
    /// STARTTLS is available.
    StartTls,
    /// LOGIN is disabled on this connection.
    LoginDisabled,
    /// UNSELECT command (RFC 3691).
    Unselect,
    /// IDLE command (RFC 2177).
    Idle,
    /// SASL mechanism, e.g. `AUTH=PLAIN`.
    Auth(String),
    /// Anything else, kept verbatim.
    Other(String),
}

impl Capability {
    /// Parses a single capability atom.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        let upper = s.to_ascii_uppercase();
        match upper.as_str() {
            "IMAP4REV1" => Self::Imap4Rev1,
            "IMAP4REV2" => Self::Imap4Rev2,
            "STARTTLS" => Self::StartTls,
            "LOGINDISABLED" => Self::LoginDisabled,
            "UNSELECT" => Self::Unselect,
            "IDLE" => Self::Idle,
            _ => upper.strip_prefix("AUTH=").map_or_else(
                || Self::Other(s.to_string()),
                |mechanism| Self::Auth(mechanism.to_string()),
            ),
        }
    }
}

/// Status of a tagged or untagged status response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Command succeeded.
    Ok,
    /// Command failed (operational error).
    No,
    /// Command was malformed or not valid in the current state.
    Bad,
    /// Connection starts already authenticated.
    PreAuth,
    /// Server is closing the connection.
    Bye,
}

impl Status {
    /// Parses a status keyword.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "OK" => Some(Self::Ok),
            "NO" => Some(Self::No),
            "BAD" => Some(Self::Bad),
            "PREAUTH" => Some(Self::PreAuth),
            "BYE" => Some(Self::Bye),
            _ => None,
        }
    }
}
