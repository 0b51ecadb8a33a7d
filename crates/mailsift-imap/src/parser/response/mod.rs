//! Response grammar on top of the lexer.

#![allow(clippy::missing_errors_doc)]

mod fetch;
mod types;

pub use fetch::{parse_address_list, parse_envelope};
pub use types::{Address, Envelope, FetchItem, UntaggedResponse};

use crate::parser::lexer::{Lexer, Token};
use crate::types::{Capability, Flag, Flags, ResponseCode, SeqNum, Status, Tag};
use crate::Result;

/// One server response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// `tag OK|NO|BAD [code] text`, completing a command.
    #[allow(missing_docs)]
    Tagged {
        tag: Tag,
        status: Status,
        code: Option<ResponseCode>,
        text: String,
    },
    /// A `*` line.
    Untagged(UntaggedResponse),
    /// `+ text`, asking for more client data.
    Continuation {
        /// `None` for a bare `+`.
        text: Option<String>,
    },
}

/// Turns framed responses into [`Response`] values.
pub struct ResponseParser;

impl ResponseParser {
    /// Parses one response as returned by [`crate::FramedStream`].
    pub fn parse(input: &[u8]) -> Result<Response> {
        let mut lexer = Lexer::new(input);
        match lexer.next_token()? {
            Token::Asterisk => {
                lexer.expect_space()?;
                parse_untagged(&mut lexer).map(Response::Untagged)
            }
            Token::Plus => {
                skip_space(&mut lexer);
                let text = lexer.read_text_until_crlf();
                Ok(Response::Continuation {
                    text: (!text.is_empty()).then_some(text),
                })
            }
            Token::Atom(tag) => {
                lexer.expect_space()?;
                let (status, code, text) = parse_condition(&mut lexer)?;
                Ok(Response::Tagged {
                    tag: Tag::new(tag),
                    status,
                    code,
                    text,
                })
            }
            found => Err(lexer.error(&format!("response starts with {found:?}"))),
        }
    }
}

fn skip_space(lexer: &mut Lexer<'_>) {
    if lexer.peek() == Some(b' ') {
        lexer.advance();
    }
}

/// `OK|NO|BAD|PREAUTH|BYE [code] text`.
fn parse_condition(lexer: &mut Lexer<'_>) -> Result<(Status, Option<ResponseCode>, String)> {
    let keyword = lexer.read_atom_string()?;
    let status =
        Status::parse(keyword).ok_or_else(|| lexer.error(&format!("unknown status {keyword}")))?;
    let (code, text) = parse_resp_text(lexer)?;
    Ok((status, code, text))
}

fn parse_untagged(lexer: &mut Lexer<'_>) -> Result<UntaggedResponse> {
    match lexer.next_token()? {
        Token::Atom(keyword) => match Status::parse(keyword) {
            Some(status) => {
                let (code, text) = parse_resp_text(lexer)?;
                Ok(UntaggedResponse::Status { status, code, text })
            }
            None => parse_mailbox_data(lexer, keyword),
        },
        Token::Number(n) => {
            lexer.expect_space()?;
            let keyword = lexer.read_atom_string()?;
            parse_message_data(lexer, n, keyword)
        }
        found => Err(lexer.error(&format!("untagged response starts with {found:?}"))),
    }
}

/// `* KEYWORD ...` data that is not a status.
fn parse_mailbox_data(lexer: &mut Lexer<'_>, keyword: &str) -> Result<UntaggedResponse> {
    Ok(match keyword.to_ascii_uppercase().as_str() {
        "CAPABILITY" => UntaggedResponse::Capability(
            lexer
                .read_text_until_crlf()
                .split_whitespace()
                .map(Capability::parse)
                .collect(),
        ),
        // non-numeric entries cannot be UIDs
        "SEARCH" => UntaggedResponse::Search(
            lexer
                .read_text_until_crlf()
                .split_whitespace()
                .filter_map(|n| n.parse().ok())
                .collect(),
        ),
        "FLAGS" => {
            lexer.expect_space()?;
            UntaggedResponse::Flags(parse_flag_list(lexer)?)
        }
        other => {
            lexer.read_text_until_crlf();
            UntaggedResponse::Other(other.to_string())
        }
    })
}

/// `* n KEYWORD ...` data.
fn parse_message_data(lexer: &mut Lexer<'_>, n: u32, keyword: &str) -> Result<UntaggedResponse> {
    let seq = || SeqNum::new(n).ok_or_else(|| lexer.error("message number 0"));
    Ok(match keyword.to_ascii_uppercase().as_str() {
        "EXISTS" => UntaggedResponse::Exists(n),
        "RECENT" => UntaggedResponse::Recent(n),
        "EXPUNGE" => UntaggedResponse::Expunge(seq()?),
        "FETCH" => {
            let seq = seq()?;
            lexer.expect_space()?;
            UntaggedResponse::Fetch {
                seq,
                items: fetch::parse_fetch_response(lexer)?,
            }
        }
        other => {
            lexer.read_text_until_crlf();
            UntaggedResponse::Other(other.to_string())
        }
    })
}

/// Optional `[code]` and the free text after a status keyword.
fn parse_resp_text(lexer: &mut Lexer<'_>) -> Result<(Option<ResponseCode>, String)> {
    skip_space(lexer);
    if lexer.peek() != Some(b'[') {
        return Ok((None, lexer.read_text_until_crlf()));
    }

    lexer.advance();
    let rest = lexer.remaining();
    let end = rest
        .iter()
        .position(|&b| b == b']')
        .ok_or_else(|| lexer.error("response code without ]"))?;
    let code = ResponseCode::parse(&String::from_utf8_lossy(&rest[..end]));
    lexer.skip(end + 1);
    skip_space(lexer);
    Ok((Some(code), lexer.read_text_until_crlf()))
}

/// `(flag flag ...)`. The `\*` wildcard of PERMANENTFLAGS is dropped.
pub(crate) fn parse_flag_list(lexer: &mut Lexer<'_>) -> Result<Flags> {
    lexer.expect(Token::LParen)?;
    let mut flags = Flags::new();
    loop {
        match lexer.next_token()? {
            Token::RParen => return Ok(flags),
            Token::Space | Token::Asterisk | Token::Atom("\\") => {}
            Token::Atom(name) => flags.insert(Flag::parse(name)),
            found => return Err(lexer.error(&format!("unexpected {found:?} in flag list"))),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_greeting() {
        let response = ResponseParser::parse(b"* OK [CAPABILITY IMAP4rev1 UNSELECT] ready\r\n").unwrap();

        match response {
            Response::Untagged(UntaggedResponse::Status {
                status: Status::Ok,
                code,
                text,
            }) => {
                assert_eq!(
                    code,
                    Some(ResponseCode::Capability(vec![
                        Capability::Imap4Rev1,
                        Capability::Unselect
                    ]))
                );
                assert_eq!(text, "ready");
            }
            other => panic!("Expected untagged OK, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_tagged_ok_with_code() {
        let response = ResponseParser::parse(b"A0002 OK [READ-WRITE] SELECT completed\r\n").unwrap();

        assert_eq!(
            response,
            Response::Tagged {
                tag: Tag::new("A0002"),
                status: Status::Ok,
                code: Some(ResponseCode::ReadWrite),
                text: "SELECT completed".to_string(),
            }
        );
    }

    #[test]
    fn test_parse_tagged_no() {
        let response = ResponseParser::parse(b"A0001 NO [AUTHENTICATIONFAILED] bad creds\r\n").unwrap();

        match response {
            Response::Tagged { status, text, .. } => {
                assert_eq!(status, Status::No);
                assert_eq!(text, "bad creds");
            }
            other => panic!("Expected tagged NO, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_bye() {
        let response = ResponseParser::parse(b"* BYE shutting down\r\n").unwrap();
        assert!(matches!(
            response,
            Response::Untagged(UntaggedResponse::Status {
                status: Status::Bye,
                ..
            })
        ));
    }

    #[test]
    fn test_parse_exists_and_recent() {
        assert_eq!(
            ResponseParser::parse(b"* 23 EXISTS\r\n").unwrap(),
            Response::Untagged(UntaggedResponse::Exists(23))
        );
        assert_eq!(
            ResponseParser::parse(b"* 2 RECENT\r\n").unwrap(),
            Response::Untagged(UntaggedResponse::Recent(2))
        );
    }

    #[test]
    fn test_parse_flags() {
        let response =
            ResponseParser::parse(b"* FLAGS (\\Answered \\Flagged \\Deleted \\Seen \\Draft)\r\n")
                .unwrap();

        match response {
            Response::Untagged(UntaggedResponse::Flags(flags)) => {
                assert_eq!(flags.len(), 5);
                assert!(flags.is_seen());
            }
            other => panic!("Expected FLAGS, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_search() {
        assert_eq!(
            ResponseParser::parse(b"* SEARCH 4 9 17\r\n").unwrap(),
            Response::Untagged(UntaggedResponse::Search(vec![4, 9, 17]))
        );
        assert_eq!(
            ResponseParser::parse(b"* SEARCH\r\n").unwrap(),
            Response::Untagged(UntaggedResponse::Search(Vec::new()))
        );
    }

    #[test]
    fn test_parse_unknown_untagged_is_kept() {
        assert_eq!(
            ResponseParser::parse(b"* LIST (\\HasNoChildren) \"/\" INBOX\r\n").unwrap(),
            Response::Untagged(UntaggedResponse::Other("LIST".to_string()))
        );
    }

    #[test]
    fn test_parse_continuation() {
        assert_eq!(
            ResponseParser::parse(b"+ go ahead\r\n").unwrap(),
            Response::Continuation {
                text: Some("go ahead".to_string())
            }
        );
    }

    #[test]
    fn test_parse_fetch_with_literal() {
        let input = b"* 3 FETCH (UID 42 BODY[] {11}\r\nhello world)\r\n";
        let response = ResponseParser::parse(input).unwrap();

        match response {
            Response::Untagged(UntaggedResponse::Fetch { seq, items }) => {
                assert_eq!(seq.get(), 3);
                assert!(items.iter().any(|i| matches!(i, FetchItem::Uid(u) if u.get() == 42)));
                assert!(items.iter().any(|i| matches!(
                    i,
                    FetchItem::Body { section: None, data: Some(d), .. } if d == b"hello world"
                )));
            }
            other => panic!("Expected FETCH, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_garbage_is_error() {
        assert!(ResponseParser::parse(b")\r\n").is_err());
    }
}
