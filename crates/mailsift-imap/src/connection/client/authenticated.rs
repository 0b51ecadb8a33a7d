//! Authenticated state.

use tokio::io::{AsyncRead, AsyncWrite};
use tracing::debug;

use super::Client;
use super::states::{Authenticated, Selected};
use crate::Error;
use crate::command::Command;
use crate::parser::{Response, ResponseParser, UntaggedResponse};
use crate::types::{MailboxStatus, ResponseCode, Status};

impl<S> Client<S, Authenticated>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Selects `mailbox` read-write.
    ///
    /// On failure the still-authenticated client is handed back with the
    /// error so the caller can log out. A server that grants only read
    /// access still succeeds here, with `read_only` set on the status.
    pub async fn select(
        mut self,
        mailbox: &str,
    ) -> Result<(Client<S, Selected>, MailboxStatus), (Error, Self)> {
        let command = Command::Select {
            mailbox: mailbox.to_string(),
        };

        let responses = match self.execute(&command).await {
            Ok(responses) => responses,
            Err(e) => return Err((e, self)),
        };
        if let Err(e) = Self::check_tagged_ok(&responses) {
            return Err((e, self));
        }

        let status = parse_mailbox_status(&responses);
        debug!(
            mailbox,
            exists = status.exists,
            read_only = status.read_only,
            "mailbox selected"
        );
        Ok((self.transition(), status))
    }
}

/// Collects the untagged data and codes of a SELECT into a status.
pub(crate) fn parse_mailbox_status(responses: &[Vec<u8>]) -> MailboxStatus {
    let mut status = MailboxStatus::default();

    for bytes in responses {
        let (code, response) = match ResponseParser::parse(bytes) {
            Ok(
                Response::Untagged(UntaggedResponse::Status {
                    status: Status::Ok,
                    code,
                    ..
                })
                | Response::Tagged { code, .. },
            ) => (code, None),
            Ok(Response::Untagged(other)) => (None, Some(other)),
            _ => continue,
        };

        match response {
            Some(UntaggedResponse::Exists(n)) => status.exists = n,
            Some(UntaggedResponse::Recent(n)) => status.recent = n,
            Some(UntaggedResponse::Flags(flags)) => status.flags = flags,
            _ => {}
        }

        match code {
            Some(ResponseCode::Unseen(seq)) => status.unseen = Some(seq),
            Some(ResponseCode::UidNext(uid)) => status.uid_next = Some(uid),
            Some(ResponseCode::UidValidity(v)) => status.uid_validity = Some(v),
            Some(ResponseCode::PermanentFlags(flags)) => {
                status.permanent_flags = flags.into_iter().collect();
            }
            Some(ResponseCode::ReadOnly) => status.read_only = true,
            Some(ResponseCode::ReadWrite) => status.read_only = false,
            _ => {}
        }
    }

    status
}
