//! Message structure: header/body split and multipart bodies.

use crate::content_type::ContentType;
use crate::encoding::{decode_base64, decode_charset, decode_quoted_printable};
use crate::error::{Error, Result};
use crate::header::Headers;

/// `Content-Transfer-Encoding` of a part.
///
/// `7bit`, `8bit` and `binary` bodies are stored as sent, so they share
/// [`TransferEncoding::Identity`]. Unrecognised tokens are treated the same
/// way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransferEncoding {
    #[default]
    #[allow(missing_docs)]
    Identity,
    #[allow(missing_docs)]
    Base64,
    #[allow(missing_docs)]
    QuotedPrintable,
}

impl TransferEncoding {
    /// Interprets a header value, case and surrounding space ignored.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        if value.eq_ignore_ascii_case("base64") {
            Self::Base64
        } else if value.eq_ignore_ascii_case("quoted-printable") {
            Self::QuotedPrintable
        } else {
            Self::Identity
        }
    }

    /// Undoes the encoding.
    ///
    /// # Errors
    ///
    /// [`Error::Base64Decode`] or [`Error::InvalidEncoding`] for bodies that
    /// do not follow their declared encoding.
    pub fn decode(self, body: &[u8]) -> Result<Vec<u8>> {
        match self {
            Self::Identity => Ok(body.to_vec()),
            Self::Base64 => decode_base64(body),
            Self::QuotedPrintable => decode_quoted_printable(body),
        }
    }
}

/// One entity: a header block and its still-encoded body.
#[derive(Debug, Clone)]
pub struct Part {
    /// Part headers.
    pub headers: Headers,
    /// Part body as it appeared on the wire.
    pub body: Vec<u8>,
}

impl Part {
    #[allow(missing_docs)]
    #[must_use]
    pub const fn new(headers: Headers, body: Vec<u8>) -> Self {
        Self { headers, body }
    }

    /// Parses an entity: headers, an empty line, then the body.
    #[must_use]
    pub fn parse(raw: &[u8]) -> Self {
        let (head, body) = split_head_body(raw);
        let headers = Headers::parse(&String::from_utf8_lossy(head));
        Self::new(headers, body.to_vec())
    }

    /// Gets the content type, `text/plain` when the header is absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the Content-Type header is malformed.
    pub fn content_type(&self) -> Result<ContentType> {
        self.headers
            .get("content-type")
            .map_or_else(|| Ok(ContentType::text_plain()), ContentType::parse)
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn transfer_encoding(&self) -> TransferEncoding {
        self.headers
            .get("content-transfer-encoding")
            .map(TransferEncoding::parse)
            .unwrap_or_default()
    }

    /// Body bytes with the transfer encoding removed.
    ///
    /// # Errors
    ///
    /// See [`TransferEncoding::decode`].
    pub fn decode_body(&self) -> Result<Vec<u8>> {
        self.transfer_encoding().decode(&self.body)
    }

    /// Body as text: transfer encoding removed, then the declared charset
    /// applied (see [`decode_charset`]).
    ///
    /// # Errors
    ///
    /// Malformed Content-Type or bad transfer encoding.
    pub fn body_text(&self) -> Result<String> {
        let content_type = self.content_type()?;
        Ok(decode_charset(self.decode_body()?, content_type.charset()))
    }
}

/// Body of a parsed message.
#[derive(Debug, Clone)]
pub enum Body {
    /// Non-multipart message; the part carries the message headers.
    Single(Part),
    /// Multipart message, parts in wire order.
    Multipart(Vec<Part>),
}

/// A parsed RFC 5322 message.
#[derive(Debug, Clone)]
pub struct Message {
    /// Top-level headers.
    pub headers: Headers,
    /// Body, split into parts for `multipart/*` content.
    pub body: Body,
}

impl Message {
    /// Parses a complete raw message.
    ///
    /// Only the top level is split: a part that is itself multipart stays a
    /// single [`Part`]. A missing or malformed top-level Content-Type is
    /// treated as `text/plain`.
    ///
    /// # Errors
    ///
    /// Returns an error if a multipart message has no boundary or no parts.
    pub fn parse(raw: &[u8]) -> Result<Self> {
        let (head, body) = split_head_body(raw);
        let headers = Headers::parse(&String::from_utf8_lossy(head));

        let content_type = headers
            .get("content-type")
            .and_then(|value| ContentType::parse(value).ok());

        let body = match content_type {
            Some(ct) if ct.is_multipart() => {
                let boundary = ct.boundary().ok_or(Error::MissingBoundary)?;
                Body::Multipart(split_multipart(body, boundary)?)
            }
            _ => Body::Single(Part::new(headers.clone(), body.to_vec())),
        };

        Ok(Self { headers, body })
    }
}

/// Splits an entity at the first empty line. Accepts CRLF or bare LF.
fn split_head_body(raw: &[u8]) -> (&[u8], &[u8]) {
    if raw.starts_with(b"\r\n") {
        return (&raw[..0], &raw[2..]);
    }
    if raw.starts_with(b"\n") {
        return (&raw[..0], &raw[1..]);
    }

    let mut offset = 0;
    for line in raw.split_inclusive(|&b| b == b'\n') {
        offset += line.len();
        if let Some(next) = raw.get(offset..) {
            if next.starts_with(b"\r\n") {
                return (&raw[..offset], &raw[offset + 2..]);
            }
            if next.starts_with(b"\n") {
                return (&raw[..offset], &raw[offset + 1..]);
            }
        }
    }

    (raw, &raw[raw.len()..])
}

/// Splits a multipart body on `--boundary` delimiter lines.
///
/// The preamble before the first delimiter and the epilogue after the close
/// delimiter are discarded. The line break preceding a delimiter belongs to
/// the delimiter. A body that ends without a close delimiter keeps its last
/// part.
fn split_multipart(body: &[u8], boundary: &str) -> Result<Vec<Part>> {
    let delimiter = format!("--{boundary}");
    let mut parts = Vec::new();
    let mut current: Option<usize> = None;
    let mut offset = 0;

    for line in body.split_inclusive(|&b| b == b'\n') {
        let line_start = offset;
        offset += line.len();

        let Some(rest) = trim_line_end(line).strip_prefix(delimiter.as_bytes()) else {
            continue;
        };
        let (is_close, rest) = rest.strip_prefix(b"--").map_or((false, rest), |r| (true, r));
        if !rest.iter().all(|b| *b == b' ' || *b == b'\t') {
            continue;
        }

        if let Some(begin) = current.take() {
            let end = strip_trailing_newline(body, begin, line_start);
            parts.push(Part::parse(&body[begin..end]));
        }
        if is_close {
            break;
        }
        current = Some(offset);
    }

    if let Some(begin) = current {
        parts.push(Part::parse(&body[begin..]));
    }

    if parts.is_empty() {
        return Err(Error::InvalidMultipart(format!(
            "no parts delimited by {delimiter:?}"
        )));
    }
    Ok(parts)
}

fn trim_line_end(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

fn strip_trailing_newline(body: &[u8], begin: usize, mut end: usize) -> usize {
    if end > begin && body[end - 1] == b'\n' {
        end -= 1;
        if end > begin && body[end - 1] == b'\r' {
            end -= 1;
        }
    }
    end
}
