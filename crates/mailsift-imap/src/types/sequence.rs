//! UID sets for UID commands.

use super::Uid;

/// A set of UIDs as accepted by UID FETCH and UID STORE.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UidSet {
    /// Single UID.
    Single(Uid),
    /// Inclusive range of UIDs.
    Range(Uid, Uid),
    /// Several sets joined by commas.
    Set(Vec<Self>),
}

impl UidSet {
    /// Builds a comma-joined set from individual UIDs, `None` if empty.
    #[must_use]
    pub fn from_uids(uids: &[Uid]) -> Option<Self> {
        match uids {
            [] => None,
            [uid] => Some(Self::Single(*uid)),
            _ => Some(Self::Set(uids.iter().copied().map(Self::Single).collect())),
        }
    }
}

impl From<Uid> for UidSet {
    fn from(uid: Uid) -> Self {
        Self::Single(uid)
    }
}

impl std::fmt::Display for UidSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Single(uid) => write!(f, "{uid}"),
            Self::Range(start, end) => write!(f, "{start}:{end}"),
            Self::Set(items) => {
                let parts: Vec<_> = items.iter().map(ToString::to_string).collect();
                f.write_str(&parts.join(","))
            }
        }
    }
}
