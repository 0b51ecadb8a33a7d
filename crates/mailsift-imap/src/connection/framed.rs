//! Response framing.
//!
//! A response is a CRLF-terminated line, except that a line ending in
//! `{n}` is followed by exactly `n` literal bytes and then continues on
//! another line. [`FramedStream`] hands the parser whole responses.

#![allow(clippy::missing_errors_doc)]

use std::io;

use bytes::BytesMut;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, trace};

use crate::parser::{Response, ResponseParser, UntaggedResponse};
use crate::types::Status;
use crate::{Error, Result};

const READ_BUFFER: usize = 8 * 1024;
const MAX_LINE: u64 = 1024 * 1024;
const MAX_LITERAL: usize = 100 * 1024 * 1024;

/// A buffered transport that reads whole responses and writes commands.
pub struct FramedStream<S> {
    inner: BufReader<S>,
}

impl<S> FramedStream<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    #[allow(missing_docs)]
    pub fn new(stream: S) -> Self {
        Self {
            inner: BufReader::with_capacity(READ_BUFFER, stream),
        }
    }

    /// Reads the next response with its literals inlined.
    pub async fn read_response(&mut self) -> Result<Vec<u8>> {
        let mut response = Vec::new();
        loop {
            let line_start = response.len();
            self.read_line_into(&mut response).await?;

            let Some(len) = literal_length(&response[line_start..]) else {
                return Ok(response);
            };
            if len > MAX_LITERAL {
                return Err(Error::Protocol(format!(
                    "literal too large: {len} bytes, limit {MAX_LITERAL}"
                )));
            }
            let mut literal = BytesMut::zeroed(len);
            self.inner.read_exact(&mut literal).await?;
            response.extend_from_slice(&literal);
        }
    }

    /// Appends one line, terminator included.
    async fn read_line_into(&mut self, out: &mut Vec<u8>) -> Result<()> {
        let start = out.len();
        let read = (&mut self.inner).take(MAX_LINE).read_until(b'\n', out).await?;

        if out.ends_with(b"\n") {
            return Ok(());
        }
        if u64::try_from(read).is_ok_and(|n| n >= MAX_LINE) {
            return Err(Error::Protocol("line too long".to_string()));
        }
        debug!(partial = out.len() - start, "stream ended mid-line");
        Err(Error::Io(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "connection closed",
        )))
    }

    /// Sends `data` and flushes.
    pub async fn write_command(&mut self, data: &[u8]) -> Result<()> {
        let stream = self.inner.get_mut();
        stream.write_all(data).await?;
        stream.flush().await?;
        Ok(())
    }

    /// Sends an encoded command. After each synchronizing literal
    /// announcement the rest is held back until the server answers `+`.
    ///
    /// A NO or BAD instead of the continuation ends the command and is
    /// returned as [`Error::No`] or [`Error::Bad`].
    pub async fn send_command(&mut self, command: &[u8]) -> Result<()> {
        let chunks = literal_chunks(command);
        for (i, chunk) in chunks.iter().enumerate() {
            if i > 0 {
                self.await_continuation().await?;
            }
            self.write_command(chunk).await?;
        }
        Ok(())
    }

    async fn await_continuation(&mut self) -> Result<()> {
        loop {
            let response = self.read_response().await?;
            match ResponseParser::parse(&response)? {
                Response::Continuation { .. } => return Ok(()),
                Response::Tagged {
                    status: Status::No,
                    text,
                    ..
                } => return Err(Error::No(text)),
                Response::Tagged {
                    status: Status::Bad,
                    text,
                    ..
                } => return Err(Error::Bad(text)),
                Response::Tagged { text, .. } => {
                    return Err(Error::Protocol(format!(
                        "command completed before its literal was sent: {text}"
                    )));
                }
                Response::Untagged(UntaggedResponse::Status {
                    status: Status::Bye,
                    text,
                    ..
                }) => return Err(Error::Bye(text)),
                Response::Untagged(other) => trace!(?other, "untagged data while waiting for +"),
            }
        }
    }

    /// Closes the write side.
    pub async fn shutdown(&mut self) -> Result<()> {
        self.inner.get_mut().shutdown().await?;
        Ok(())
    }
}

/// Size announced by a trailing `{n}` or `{n+}` on `line`.
fn literal_length(line: &[u8]) -> Option<usize> {
    let body = line.strip_suffix(b"\r\n")?.strip_suffix(b"}")?;
    let body = body.strip_suffix(b"+").unwrap_or(body);
    let digits = &body[body.iter().rposition(|&b| b == b'{')? + 1..];
    if digits.is_empty() || !digits.iter().all(u8::is_ascii_digit) {
        return None;
    }
    std::str::from_utf8(digits).ok()?.parse().ok()
}

/// Splits an encoded command after each `{n}\r\n` announcement. The
/// literal data opens the following chunk.
fn literal_chunks(command: &[u8]) -> Vec<&[u8]> {
    let mut chunks = Vec::new();
    let mut start = 0;
    let mut pos = 0;
    while let Some(offset) = command[pos..].windows(2).position(|w| w == b"\r\n") {
        let end = pos + offset + 2;
        match literal_length(&command[start..end]) {
            Some(len) if end < command.len() => {
                chunks.push(&command[start..end]);
                start = end;
                pos = end.saturating_add(len).min(command.len());
            }
            _ => pos = end,
        }
    }
    chunks.push(&command[start..]);
    chunks
}

/// Reads one command's responses, through its tagged completion.
pub struct ResponseAccumulator {
    tag: String,
    responses: Vec<Vec<u8>>,
    bye: Option<String>,
}

impl ResponseAccumulator {
    /// Waits for the completion tagged `tag`.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            responses: Vec::new(),
            bye: None,
        }
    }

    /// Returns every response received, the tagged one last.
    ///
    /// A hangup after an untagged BYE is reported as [`Error::Bye`] with the
    /// server's text rather than as an I/O error.
    pub async fn read_until_tagged<S>(
        &mut self,
        framed: &mut FramedStream<S>,
    ) -> Result<Vec<Vec<u8>>>
    where
        S: AsyncRead + AsyncWrite + Unpin,
    {
        loop {
            let response = match framed.read_response().await {
                Ok(response) => response,
                Err(Error::Io(e)) if self.bye.is_some() => {
                    debug!(error = %e, "server hung up after BYE");
                    return Err(Error::Bye(self.bye.take().unwrap_or_default()));
                }
                Err(e) => return Err(e),
            };

            let tagged = self.is_completion(&response);
            if !tagged {
                self.note_bye(&response);
            }
            self.responses.push(response);
            if tagged {
                return Ok(std::mem::take(&mut self.responses));
            }
        }
    }

    fn is_completion(&self, response: &[u8]) -> bool {
        response
            .strip_prefix(self.tag.as_bytes())
            .is_some_and(|rest| rest.starts_with(b" "))
    }

    fn note_bye(&mut self, response: &[u8]) {
        if response.starts_with(b"* ")
            && let Ok(Response::Untagged(UntaggedResponse::Status {
                status: Status::Bye,
                text,
                ..
            })) = ResponseParser::parse(response)
        {
            self.bye = Some(text);
        }
    }
}
