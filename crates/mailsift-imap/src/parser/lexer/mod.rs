//! Response tokenizer.
//!
//! Operates on one complete response, literal payloads included, exactly as
//! [`crate::FramedStream`] hands it over. No I/O happens here.

#![allow(clippy::missing_errors_doc)]

mod token;

pub use token::Token;

use crate::{Error, Result};

/// Byte cursor over one response.
pub struct Lexer<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> Lexer<'a> {
    /// Cursor at the first byte of `input`.
    #[must_use]
    pub const fn new(input: &'a [u8]) -> Self {
        Self { input, pos: 0 }
    }

    /// Bytes not consumed yet.
    #[must_use]
    pub fn remaining(&self) -> &'a [u8] {
        self.input.get(self.pos..).unwrap_or_default()
    }

    /// Next byte, not consumed.
    #[must_use]
    pub fn peek(&self) -> Option<u8> {
        self.remaining().first().copied()
    }

    /// Consumes and returns the next byte.
    pub fn advance(&mut self) -> Option<u8> {
        let byte = self.peek();
        if byte.is_some() {
            self.pos += 1;
        }
        byte
    }

    /// Consumes `n` bytes, or everything that is left.
    pub fn skip(&mut self, n: usize) {
        self.pos = self.pos.saturating_add(n).min(self.input.len());
    }

    /// Consumes bytes while `pred` holds and returns them.
    fn take_while(&mut self, pred: impl Fn(u8) -> bool) -> &'a [u8] {
        let rest = self.remaining();
        let len = rest.iter().position(|&b| !pred(b)).unwrap_or(rest.len());
        self.pos += len;
        &rest[..len]
    }

    /// Consumes `expected` or fails with `message`.
    fn eat(&mut self, expected: &[u8], message: &str) -> Result<()> {
        if self.remaining().starts_with(expected) {
            self.pos += expected.len();
            Ok(())
        } else {
            Err(self.error(message))
        }
    }

    /// Lexes the next token. [`Token::Eof`] once the input is exhausted.
    pub fn next_token(&mut self) -> Result<Token<'a>> {
        let Some(byte) = self.peek() else {
            return Ok(Token::Eof);
        };

        let token = match byte {
            b'"' => return self.quoted(),
            b'{' => return self.literal(),
            b'\r' => {
                self.eat(b"\r\n", "CR without LF")?;
                return Ok(Token::Crlf);
            }
            b' ' => Token::Space,
            b'(' => Token::LParen,
            b')' => Token::RParen,
            b'[' => Token::LBracket,
            b']' => Token::RBracket,
            b'*' => Token::Asterisk,
            b'+' => Token::Plus,
            b if is_atom_char(b) => return Ok(self.atom()),
            b => return Err(self.error(&format!("stray byte {b:#04x}"))),
        };
        self.pos += 1;
        Ok(token)
    }

    fn quoted(&mut self) -> Result<Token<'a>> {
        self.pos += 1;
        let mut text = Vec::new();
        loop {
            match self.advance() {
                Some(b'"') => break,
                Some(b'\\') => match self.advance() {
                    Some(escaped @ (b'"' | b'\\')) => text.push(escaped),
                    Some(other) => {
                        return Err(self.error(&format!("bad escape \\{}", char::from(other))));
                    }
                    None => return Err(self.error("quoted string runs off the end")),
                },
                Some(b) => text.push(b),
                None => return Err(self.error("quoted string runs off the end")),
            }
        }
        // Raw 8-bit header bytes show up here in practice.
        Ok(Token::QuotedString(String::from_utf8_lossy(&text).into_owned()))
    }

    fn literal(&mut self) -> Result<Token<'a>> {
        self.pos += 1;
        let digits = self.take_while(|b| b.is_ascii_digit());
        let size = std::str::from_utf8(digits)
            .ok()
            .and_then(|s| s.parse::<usize>().ok())
            .ok_or_else(|| self.error("literal without a size"))?;
        // `{n+}` only matters client-side
        if self.peek() == Some(b'+') {
            self.pos += 1;
        }
        self.eat(b"}\r\n", "literal size not followed by }CRLF")?;

        let data = self
            .remaining()
            .get(..size)
            .ok_or_else(|| self.error("literal shorter than announced"))?
            .to_vec();
        self.pos += size;
        Ok(Token::Literal(data))
    }

    fn atom(&mut self) -> Token<'a> {
        let bytes = self.take_while(is_atom_char);
        // atom chars are ASCII
        let text = std::str::from_utf8(bytes).unwrap_or_default();

        if text.eq_ignore_ascii_case("NIL") {
            return Token::Nil;
        }
        if bytes.iter().all(u8::is_ascii_digit) {
            // 64-bit values such as MODSEQ stay atoms
            if let Ok(n) = text.parse() {
                return Token::Number(n);
            }
        }
        Token::Atom(text)
    }

    /// A parse error located at the cursor.
    #[must_use]
    pub fn error(&self, message: &str) -> Error {
        Error::Parse {
            position: self.pos,
            message: message.to_string(),
        }
    }

    /// Consumes a token of the same variant as `expected`, payload ignored.
    #[allow(clippy::needless_pass_by_value)]
    pub fn expect(&mut self, expected: Token<'_>) -> Result<()> {
        let found = self.next_token()?;
        if std::mem::discriminant(&found) == std::mem::discriminant(&expected) {
            return Ok(());
        }
        Err(self.error(&format!("wanted {expected:?}, found {found:?}")))
    }

    /// Consumes one space.
    pub fn expect_space(&mut self) -> Result<()> {
        self.expect(Token::Space)
    }

    /// `nstring`: NIL, quoted or literal. Literal bytes are decoded lossily.
    pub fn read_nstring(&mut self) -> Result<Option<String>> {
        match self.next_token()? {
            Token::Nil => Ok(None),
            Token::QuotedString(s) => Ok(Some(s)),
            Token::Literal(data) => Ok(Some(String::from_utf8_lossy(&data).into_owned())),
            found => Err(self.error(&format!("wanted nstring, found {found:?}"))),
        }
    }

    #[allow(missing_docs)]
    pub fn read_number(&mut self) -> Result<u32> {
        match self.next_token()? {
            Token::Number(n) => Ok(n),
            found => Err(self.error(&format!("wanted number, found {found:?}"))),
        }
    }

    #[allow(missing_docs)]
    pub fn read_atom_string(&mut self) -> Result<&'a str> {
        match self.next_token()? {
            Token::Atom(s) => Ok(s),
            found => Err(self.error(&format!("wanted atom, found {found:?}"))),
        }
    }

    /// Rest of the line as text; the CRLF is consumed but not returned.
    pub fn read_text_until_crlf(&mut self) -> String {
        let line = self.take_while(|b| b != b'\r');
        let text = String::from_utf8_lossy(line).into_owned();
        self.skip(2);
        text
    }
}

/// Bytes that may appear in an atom as servers send it.
///
/// Wider than RFC 9051 `ATOM-CHAR` in one way: `\` is allowed, so system
/// flags are single atoms. `]` is excluded so response codes and section
/// specs end where they should.
#[must_use]
pub const fn is_atom_char(b: u8) -> bool {
    b.is_ascii_graphic()
        && !matches!(b, b'(' | b')' | b'{' | b'}' | b'%' | b'*' | b'"' | b'[' | b']')
}
