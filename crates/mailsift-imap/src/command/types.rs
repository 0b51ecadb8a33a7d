//! Arguments of the selected-state commands.

use crate::types::Flag;

/// One item of a UID FETCH request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchAttribute {
    /// `FLAGS`
    Flags,
    /// `ENVELOPE`
    Envelope,
    /// `UID`
    Uid,
    /// `BODY[section]` or `BODY.PEEK[section]`.
    Body {
        /// `None` requests the whole message.
        section: Option<String>,
        /// Peeking leaves `\Seen` untouched.
        peek: bool,
    },
}

impl FetchAttribute {
    /// `BODY.PEEK[]`: the raw message, without setting `\Seen`.
    #[must_use]
    pub const fn full_message_peek() -> Self {
        Self::Body {
            section: None,
            peek: true,
        }
    }
}

/// Ordered item list of a FETCH.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchItems(Vec<FetchAttribute>);

impl FetchItems {
    /// Wraps the items in request order.
    #[must_use]
    pub const fn new(items: Vec<FetchAttribute>) -> Self {
        Self(items)
    }

    /// The requested items.
    #[must_use]
    pub fn attributes(&self) -> &[FetchAttribute] {
        &self.0
    }
}

/// How UID STORE changes the flags of its targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreAction {
    /// Replace the flag set.
    SetFlags(Vec<Flag>),
    /// Add to the flag set.
    AddFlags(Vec<Flag>),
    /// Remove from the flag set.
    RemoveFlags(Vec<Flag>),
}

/// Filter of a UID SEARCH.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchCriteria {
    /// Every message.
    All,
    /// Without `\Seen`.
    Unseen,
    /// With `\Seen`.
    Seen,
    /// With `\Deleted`.
    Deleted,
    /// Every criterion matches.
    And(Vec<Self>),
    /// The criterion does not match.
    Not(Box<Self>),
}
