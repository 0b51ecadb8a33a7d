//! Before LOGIN.

use std::marker::PhantomData;

use tokio::io::{AsyncRead, AsyncWrite};
use tracing::debug;

use super::Client;
use super::states::{Authenticated, NotAuthenticated};
use crate::command::{Command, TagGenerator};
use crate::connection::framed::FramedStream;
use crate::parser::{Response, ResponseParser, UntaggedResponse};
use crate::types::{ResponseCode, Status};
use crate::{Error, Result};

impl<S> Client<S, NotAuthenticated>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Reads the greeting from a freshly connected stream.
    ///
    /// Capabilities advertised in the greeting are remembered. A BYE
    /// greeting fails with [`Error::Bye`].
    pub async fn from_stream(stream: S) -> Result<Self> {
        let mut stream = FramedStream::new(stream);
        let greeting = stream.read_response().await?;

        let capabilities = match ResponseParser::parse(&greeting)? {
            Response::Untagged(UntaggedResponse::Status { status, code, text }) => match status {
                Status::Ok | Status::PreAuth => match code {
                    Some(ResponseCode::Capability(caps)) => caps,
                    _ => Vec::new(),
                },
                Status::Bye => return Err(Error::Bye(text)),
                Status::No | Status::Bad => {
                    return Err(Error::Protocol(format!("server refused session: {text}")));
                }
            },
            other => return Err(Error::Protocol(format!("not a greeting: {other:?}"))),
        };
        debug!(capabilities = capabilities.len(), "greeted");

        Ok(Self {
            stream,
            tag_gen: TagGenerator::default(),
            capabilities,
            _state: PhantomData,
        })
    }

    /// Logs in with LOGIN. A NO or BAD completion becomes [`Error::Auth`].
    pub async fn login(
        mut self,
        username: &str,
        password: &str,
    ) -> Result<Client<S, Authenticated>> {
        let command = Command::Login {
            username: username.to_string(),
            password: password.to_string(),
        };
        let rejected = |e: Error| match e {
            Error::No(text) | Error::Bad(text) => Error::Auth(text),
            other => other,
        };
        let responses = self.execute(&command).await.map_err(rejected)?;

        // Servers may attach refreshed capabilities as a code on the tagged OK.
        if let Some(Ok(Response::Tagged {
            code: Some(ResponseCode::Capability(caps)),
            ..
        })) = responses.last().map(|r| ResponseParser::parse(r))
        {
            self.capabilities = caps;
        }
        self.absorb_capabilities(&responses);

        Self::check_tagged_ok(&responses).map_err(rejected)?;

        Ok(self.transition())
    }
}
