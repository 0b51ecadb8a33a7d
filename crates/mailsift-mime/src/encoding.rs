//! Transfer, header and charset decoding.
//!
//! Supports Base64 and Quoted-Printable bodies (RFC 2045), RFC 2047 encoded
//! words in headers, and charset decoding through `encoding_rs`.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use encoding_rs::{Encoding, REPLACEMENT, UTF_8};

use crate::error::{Error, Result};

/// Decodes Base64 data, ignoring embedded line breaks and whitespace.
///
/// # Errors
///
/// Returns an error if the input is not valid Base64.
pub fn decode_base64(data: &[u8]) -> Result<Vec<u8>> {
    let cleaned: Vec<u8> = data
        .iter()
        .copied()
        .filter(|b| !b.is_ascii_whitespace())
        .collect();
    STANDARD.decode(cleaned).map_err(Into::into)
}

/// Decodes Quoted-Printable data (RFC 2045) to raw bytes.
///
/// Soft line breaks (`=` at end of line) are removed. A lone `=` at the very
/// end of the input is treated as a soft break.
///
/// # Errors
///
/// Returns an error if an escape sequence is not two hex digits.
pub fn decode_quoted_printable(input: &[u8]) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(input.len());
    let mut i = 0;

    while i < input.len() {
        let byte = input[i];
        if byte != b'=' {
            out.push(byte);
            i += 1;
            continue;
        }

        match input.get(i + 1..i + 3) {
            Some([b'\r', b'\n']) => i += 3,
            Some([b'\n', _]) => i += 2,
            Some(&[hi, lo]) => {
                let (Some(hi), Some(lo)) = (hex_value(hi), hex_value(lo)) else {
                    return Err(Error::InvalidEncoding(format!(
                        "invalid escape at byte {i}"
                    )));
                };
                out.push((hi << 4) | lo);
                i += 3;
            }
            _ => match input.get(i + 1) {
                None => i += 1,
                Some(b'\n') => i += 2,
                Some(_) => {
                    return Err(Error::InvalidEncoding(
                        "incomplete escape sequence".to_string(),
                    ));
                }
            },
        }
    }

    Ok(out)
}

const fn hex_value(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'A'..=b'F' => Some(b - b'A' + 10),
        b'a'..=b'f' => Some(b - b'a' + 10),
        _ => None,
    }
}

/// Decodes text in the declared charset.
///
/// Labels are resolved the way browsers resolve them, so `iso-8859-1` and
/// `us-ascii` decode as Windows-1252. Malformed sequences become U+FFFD.
/// Without a label, or with one no decoder exists for, the bytes are read
/// as UTF-8 with the same replacement.
#[must_use]
pub fn decode_charset(bytes: Vec<u8>, charset: Option<&str>) -> String {
    match charset.and_then(|label| Encoding::for_label(label.trim().as_bytes())) {
        Some(encoding) if encoding != UTF_8 && encoding != REPLACEMENT => {
            encoding.decode_without_bom_handling(&bytes).0.into_owned()
        }
        _ => String::from_utf8(bytes)
            .unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned()),
    }
}

/// Decodes every RFC 2047 encoded word in a header value.
///
/// Format of a word: `=?charset?encoding?encoded-text?=`. Whitespace between
/// two adjacent encoded words is dropped; everything else is kept verbatim.
/// Sequences that only look like the start of an encoded word are copied
/// through unchanged.
///
/// # Errors
///
/// Returns an error if a well-formed word carries an invalid Base64 or
/// Quoted-Printable payload.
pub fn decode_rfc2047(text: &str) -> Result<String> {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    let mut after_word = false;

    while let Some(pos) = rest.find("=?") {
        let (before, candidate) = rest.split_at(pos);
        if let Some(word) = EncodedWord::parse(candidate) {
            if !(after_word && before.chars().all(char::is_whitespace)) {
                out.push_str(before);
            }
            out.push_str(&word.decode()?);
            rest = &candidate[word.len..];
            after_word = true;
        } else {
            out.push_str(before);
            out.push_str("=?");
            rest = &candidate[2..];
            after_word = false;
        }
    }

    out.push_str(rest);
    Ok(out)
}

struct EncodedWord<'a> {
    charset: &'a str,
    encoding: &'a str,
    payload: &'a str,
    len: usize,
}

impl<'a> EncodedWord<'a> {
    fn parse(s: &'a str) -> Option<Self> {
        let inner = s.strip_prefix("=?")?;
        let (charset, after) = inner.split_once('?')?;
        let (encoding, after) = after.split_once('?')?;
        let end = after.find("?=")?;
        let payload = &after[..end];

        if charset.is_empty() || encoding.len() != 1 || payload.contains(char::is_whitespace) {
            return None;
        }

        Some(Self {
            // RFC 2231 language suffix: `utf-8*en`
            charset: charset.split('*').next().unwrap_or(charset),
            encoding,
            payload,
            len: s.len() - after.len() + end + 2,
        })
    }

    fn decode(&self) -> Result<String> {
        let bytes = match self.encoding {
            "B" | "b" => decode_base64(self.payload.as_bytes())?,
            "Q" | "q" => {
                let spaced: Vec<u8> = self
                    .payload
                    .bytes()
                    .map(|b| if b == b'_' { b' ' } else { b })
                    .collect();
                decode_quoted_printable(&spaced)?
            }
            other => {
                return Err(Error::InvalidEncoding(format!(
                    "unknown encoded-word encoding {other:?}"
                )));
            }
        };
        Ok(decode_charset(bytes, Some(self.charset)))
    }
}
