//! The `(...)` item list of `* n FETCH`, including ENVELOPE.

use crate::Result;
use crate::parser::lexer::{Lexer, Token};
use crate::types::Uid;

use super::parse_flag_list;
use super::types::{Address, Envelope, FetchItem};

/// Parses `(name value name value ...)`. Items this client never requests
/// are skipped.
pub fn parse_fetch_response(lexer: &mut Lexer<'_>) -> Result<Vec<FetchItem>> {
    lexer.expect(Token::LParen)?;
    let mut items = Vec::new();

    loop {
        match lexer.next_token()? {
            Token::RParen => return Ok(items),
            Token::Space => {}
            Token::Atom(name) => items.extend(parse_item(lexer, name)?),
            found => return Err(lexer.error(&format!("unexpected {found:?} in FETCH"))),
        }
    }
}

fn parse_item(lexer: &mut Lexer<'_>, name: &str) -> Result<Option<FetchItem>> {
    let name = name.to_ascii_uppercase();
    if matches!(name.as_str(), "BODY" | "BINARY") && lexer.peek() == Some(b'[') {
        return parse_body(lexer).map(Some);
    }

    lexer.expect_space()?;
    let item = match name.as_str() {
        "UID" => {
            let n = lexer.read_number()?;
            FetchItem::Uid(Uid::new(n).ok_or_else(|| lexer.error("UID 0 is invalid"))?)
        }
        "FLAGS" => FetchItem::Flags(parse_flag_list(lexer)?),
        "ENVELOPE" => FetchItem::Envelope(Box::new(parse_envelope(lexer)?)),
        _ => {
            skip_value(lexer)?;
            return Ok(None);
        }
    };
    Ok(Some(item))
}

/// `[section]<origin> value`, the cursor sitting on `[`.
fn parse_body(lexer: &mut Lexer<'_>) -> Result<FetchItem> {
    lexer.advance();
    let section = take_until(lexer, b']');
    let origin = if lexer.peek() == Some(b'<') {
        lexer.advance();
        take_until(lexer, b'>').and_then(|n| n.parse().ok())
    } else {
        None
    };

    lexer.expect_space()?;
    let data = match lexer.next_token()? {
        Token::Literal(bytes) => Some(bytes),
        Token::QuotedString(text) => Some(text.into_bytes()),
        _ => None,
    };
    Ok(FetchItem::Body {
        section,
        origin,
        data,
    })
}

/// Text up to `end`, which is consumed. `None` if the text is empty.
fn take_until(lexer: &mut Lexer<'_>, end: u8) -> Option<String> {
    let rest = lexer.remaining();
    let len = rest.iter().position(|&b| b == end).unwrap_or(rest.len());
    lexer.skip(len + 1);
    (len > 0).then(|| String::from_utf8_lossy(&rest[..len]).into_owned())
}

/// Consumes one value of any shape, nested lists included.
fn skip_value(lexer: &mut Lexer<'_>) -> Result<()> {
    let mut depth = 0usize;
    loop {
        match lexer.next_token()? {
            Token::LParen => depth += 1,
            Token::RParen => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| lexer.error("unbalanced ) in FETCH value"))?;
            }
            Token::Eof | Token::Crlf => return Err(lexer.error("FETCH value cut short")),
            _ => {}
        }
        if depth == 0 && matches!(lexer.peek(), Some(b' ' | b')')) {
            return Ok(());
        }
    }
}

/// A space, then whatever `read` parses.
fn spaced<'a, T>(
    lexer: &mut Lexer<'a>,
    read: impl FnOnce(&mut Lexer<'a>) -> Result<T>,
) -> Result<T> {
    lexer.expect_space()?;
    read(lexer)
}

/// Parses the ten-field ENVELOPE structure.
pub fn parse_envelope(lexer: &mut Lexer<'_>) -> Result<Envelope> {
    lexer.expect(Token::LParen)?;
    let envelope = Envelope {
        date: lexer.read_nstring()?,
        subject: spaced(lexer, Lexer::read_nstring)?,
        from: spaced(lexer, parse_address_list)?,
        sender: spaced(lexer, parse_address_list)?,
        reply_to: spaced(lexer, parse_address_list)?,
        to: spaced(lexer, parse_address_list)?,
        cc: spaced(lexer, parse_address_list)?,
        bcc: spaced(lexer, parse_address_list)?,
        in_reply_to: spaced(lexer, Lexer::read_nstring)?,
        message_id: spaced(lexer, Lexer::read_nstring)?,
    };
    lexer.expect(Token::RParen)?;
    Ok(envelope)
}

/// `NIL` or `(addr addr ...)`. Servers differ on whether addresses are
/// separated by spaces, so both forms are accepted.
pub fn parse_address_list(lexer: &mut Lexer<'_>) -> Result<Vec<Address>> {
    match lexer.next_token()? {
        Token::Nil => return Ok(Vec::new()),
        Token::LParen => {}
        found => return Err(lexer.error(&format!("wanted address list, found {found:?}"))),
    }

    let mut addresses = Vec::new();
    loop {
        match lexer.peek() {
            Some(b'(') => addresses.push(parse_address(lexer)?),
            Some(b' ') => lexer.skip(1),
            Some(b')') => {
                lexer.skip(1);
                return Ok(addresses);
            }
            _ => return Err(lexer.error("malformed address list")),
        }
    }
}

fn parse_address(lexer: &mut Lexer<'_>) -> Result<Address> {
    lexer.expect(Token::LParen)?;
    let address = Address {
        name: lexer.read_nstring()?,
        adl: spaced(lexer, Lexer::read_nstring)?,
        mailbox: spaced(lexer, Lexer::read_nstring)?,
        host: spaced(lexer, Lexer::read_nstring)?,
    };
    lexer.expect(Token::RParen)?;
    Ok(address)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_fetch_uid_and_flags() {
        let mut lexer = Lexer::new(b"(UID 123 FLAGS (\\Seen))");
        let items = parse_fetch_response(&mut lexer).unwrap();

        assert_eq!(items.len(), 2);
        assert!(matches!(items[0], FetchItem::Uid(u) if u.get() == 123));
        assert!(matches!(&items[1], FetchItem::Flags(f) if f.is_seen()));
    }

    #[test]
    fn test_parse_fetch_uid_zero_rejected() {
        let mut lexer = Lexer::new(b"(UID 0)");
        let err = parse_fetch_response(&mut lexer).unwrap_err();
        assert!(err.to_string().contains("UID"));
    }

    #[test]
    fn test_parse_fetch_skips_unknown_items() {
        let mut lexer = Lexer::new(
            b"(RFC822.SIZE 4432 MODSEQ (715194045007) INTERNALDATE \"17-Jul-1996 02:44:25 -0700\" X-GM-LABELS (\\Inbox {3}\r\nfoo) UID 9)",
        );
        let items = parse_fetch_response(&mut lexer).unwrap();
        assert_eq!(items, vec![FetchItem::Uid(Uid::new(9).unwrap())]);
    }

    #[test]
    fn test_parse_body_section_and_origin() {
        let mut lexer = Lexer::new(b"(BODY[TEXT]<100> \"abc\")");
        let items = parse_fetch_response(&mut lexer).unwrap();

        assert_eq!(
            items,
            vec![FetchItem::Body {
                section: Some("TEXT".to_string()),
                origin: Some(100),
                data: Some(b"abc".to_vec()),
            }]
        );
    }

    #[test]
    fn test_parse_body_nil() {
        let mut lexer = Lexer::new(b"(BODY[] NIL)");
        let items = parse_fetch_response(&mut lexer).unwrap();
        assert!(matches!(&items[0], FetchItem::Body { data: None, .. }));
    }

    #[test]
    fn test_parse_envelope() {
        let data = b"(\"Mon, 7 Feb 1994 21:52:25 -0800\" \"Hi\" \
((\"Alice\" NIL \"alice\" \"x.com\")) NIL NIL \
((NIL NIL \"bob\" \"y.com\")(NIL NIL \"carol\" \"y.com\")) \
((NIL NIL \"dave\" \"y.com\")) NIL NIL \"<id@x.com>\")";
        let mut lexer = Lexer::new(data);
        let envelope = parse_envelope(&mut lexer).unwrap();

        assert_eq!(envelope.subject.as_deref(), Some("Hi"));
        assert_eq!(envelope.from[0].email().as_deref(), Some("alice@x.com"));
        assert_eq!(envelope.from[0].name.as_deref(), Some("Alice"));
        let to: Vec<_> = envelope.to.iter().filter_map(Address::email).collect();
        assert_eq!(to, vec!["bob@y.com", "carol@y.com"]);
        assert_eq!(envelope.cc.len(), 1);
        assert!(envelope.bcc.is_empty());
        assert_eq!(envelope.message_id.as_deref(), Some("<id@x.com>"));
    }

    #[test]
    fn test_parse_group_address_markers() {
        let data = b"((NIL NIL \"team\" NIL)(NIL NIL \"ann\" \"z.org\")(NIL NIL NIL NIL))";
        let mut lexer = Lexer::new(data);
        let list = parse_address_list(&mut lexer).unwrap();

        assert_eq!(list.len(), 3);
        let emails: Vec<_> = list.iter().filter_map(Address::email).collect();
        assert_eq!(emails, vec!["ann@z.org"]);
    }

    #[test]
    fn test_parse_envelope_with_literal_subject() {
        let data = b"(NIL {6}\r\nH\xc3\xa9llo NIL NIL NIL NIL NIL NIL NIL NIL)";
        let mut lexer = Lexer::new(data);
        let envelope = parse_envelope(&mut lexer).unwrap();
        assert_eq!(envelope.subject.as_deref(), Some("H\u{e9}llo"));
    }
}
