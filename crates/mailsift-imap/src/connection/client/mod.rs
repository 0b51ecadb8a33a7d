//! Type-state client.
//!
//! The connection state is a type parameter, so commands are only callable
//! in the states where the protocol allows them:
//!
//! - `NotAuthenticated`: after the greeting
//! - `Authenticated`: after LOGIN
//! - `Selected`: after SELECT

#![allow(clippy::missing_errors_doc)]

mod authenticated;
mod not_authenticated;
mod selected;
mod states;

use std::marker::PhantomData;

use tokio::io::{AsyncRead, AsyncWrite};
use tracing::trace;

pub use self::states::{Authenticated, NotAuthenticated, Selected};
use super::framed::{FramedStream, ResponseAccumulator};
use crate::command::{Command, TagGenerator};
use crate::parser::{Response, ResponseParser, UntaggedResponse};
use crate::types::{Capability, Status};
use crate::{Error, Result};

/// IMAP client connection in state `State`.
pub struct Client<S, State> {
    pub(crate) stream: FramedStream<S>,
    pub(crate) tag_gen: TagGenerator,
    pub(crate) capabilities: Vec<Capability>,
    _state: PhantomData<State>,
}

impl<S, State> std::fmt::Debug for Client<S, State> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("tag_gen", &self.tag_gen)
            .field("capabilities", &self.capabilities)
            .finish_non_exhaustive()
    }
}

impl<S, State> Client<S, State>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Capabilities last advertised by the server.
    #[must_use]
    pub fn capabilities(&self) -> &[Capability] {
        &self.capabilities
    }

    /// Checks for a capability.
    #[must_use]
    pub fn has_capability(&self, cap: &Capability) -> bool {
        self.capabilities.contains(cap)
    }

    /// Sends NOOP. Used as a liveness probe.
    pub async fn noop(&mut self) -> Result<()> {
        let responses = self.execute(&Command::Noop).await?;
        Self::check_tagged_ok(&responses)
    }

    /// Sends CAPABILITY and refreshes the stored list.
    pub async fn capability(&mut self) -> Result<Vec<Capability>> {
        let responses = self.execute(&Command::Capability).await?;
        self.absorb_capabilities(&responses);
        Self::check_tagged_ok(&responses)?;
        Ok(self.capabilities.clone())
    }

    /// Ends the session. Valid in every state.
    ///
    /// The server answers with BYE and then the tagged OK; either way the
    /// connection is finished afterwards, so only write failures are errors.
    pub async fn logout(mut self) -> Result<()> {
        let tag = self.tag_gen.next_tag();
        self.stream
            .write_command(&Command::Logout.serialize(&tag))
            .await?;
        if let Err(e) = ResponseAccumulator::new(tag).read_until_tagged(&mut self.stream).await {
            trace!(error = %e, "LOGOUT ended without tagged reply");
        }
        let _ = self.stream.shutdown().await;
        Ok(())
    }

    /// Sends `command` and collects responses up to its tagged completion.
    pub(crate) async fn execute(&mut self, command: &Command) -> Result<Vec<Vec<u8>>> {
        let tag = self.tag_gen.next_tag();
        trace!(%tag, command = command.name(), "sending");
        self.stream.send_command(&command.serialize(&tag)).await?;
        ResponseAccumulator::new(tag)
            .read_until_tagged(&mut self.stream)
            .await
    }

    /// Maps the tagged completion (always the last response) to a result.
    pub(crate) fn check_tagged_ok(responses: &[Vec<u8>]) -> Result<()> {
        let last = responses
            .last()
            .ok_or_else(|| Error::Protocol("missing tagged response".to_string()))?;

        match ResponseParser::parse(last)? {
            Response::Tagged { status, text, .. } => match status {
                Status::Ok | Status::PreAuth => Ok(()),
                Status::No => Err(Error::No(text)),
                Status::Bad => Err(Error::Bad(text)),
                Status::Bye => Err(Error::Bye(text)),
            },
            _ => Err(Error::Protocol("missing tagged response".to_string())),
        }
    }

    /// Picks up CAPABILITY data sent alongside another command.
    pub(crate) fn absorb_capabilities(&mut self, responses: &[Vec<u8>]) {
        for bytes in responses {
            if let Ok(Response::Untagged(UntaggedResponse::Capability(caps))) =
                ResponseParser::parse(bytes)
            {
                self.capabilities = caps;
            }
        }
    }

    /// Moves the connection into another state.
    pub(crate) fn transition<Next>(self) -> Client<S, Next> {
        Client {
            stream: self.stream,
            tag_gen: self.tag_gen,
            capabilities: self.capabilities,
            _state: PhantomData,
        }
    }
}
