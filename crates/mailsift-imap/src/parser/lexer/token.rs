//! Token kinds.

/// What [`super::Lexer::next_token`] yields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token<'a> {
    /// Run of atom characters. `\Seen` is one atom.
    Atom(&'a str),
    /// `"..."` with escapes resolved.
    QuotedString(String),
    /// Payload of a `{n}` literal.
    Literal(Vec<u8>),
    /// Digits that fit in a `u32`.
    Number(u32),
    /// `NIL` in any case.
    Nil,
    #[allow(missing_docs)]
    LParen,
    #[allow(missing_docs)]
    RParen,
    #[allow(missing_docs)]
    LBracket,
    #[allow(missing_docs)]
    RBracket,
    #[allow(missing_docs)]
    Space,
    /// Untagged prefix.
    Asterisk,
    /// Continuation prefix.
    Plus,
    #[allow(missing_docs)]
    Crlf,
    /// Input exhausted.
    Eof,
}
