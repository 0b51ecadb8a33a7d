//! Selected state.

use tokio::io::{AsyncRead, AsyncWrite};
use tracing::warn;

use super::Client;
use super::states::{Authenticated, Selected};
use crate::Result;
use crate::command::{Command, FetchItems, SearchCriteria, StoreAction};
use crate::parser::{FetchItem, Response, ResponseParser, UntaggedResponse};
use crate::types::{Capability, SeqNum, Uid, UidSet};

impl<S> Client<S, Selected>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Runs UID SEARCH and returns the matching UIDs in server order.
    pub async fn uid_search(&mut self, criteria: &SearchCriteria) -> Result<Vec<Uid>> {
        let command = Command::UidSearch {
            criteria: criteria.clone(),
        };
        let responses = self.execute(&command).await?;
        Self::check_tagged_ok(&responses)?;

        let mut uids = Vec::new();
        for bytes in &responses {
            if let Ok(Response::Untagged(UntaggedResponse::Search(ids))) =
                ResponseParser::parse(bytes)
            {
                uids.extend(ids.into_iter().filter_map(Uid::new));
            }
        }
        Ok(uids)
    }

    /// Runs UID FETCH.
    ///
    /// FETCH responses that fail to parse are logged and skipped; unsolicited
    /// untagged data is ignored.
    pub async fn uid_fetch(
        &mut self,
        uids: &UidSet,
        items: &FetchItems,
    ) -> Result<Vec<(SeqNum, Vec<FetchItem>)>> {
        let command = Command::UidFetch {
            uids: uids.clone(),
            items: items.clone(),
        };
        let responses = self.execute(&command).await?;
        Self::check_tagged_ok(&responses)?;

        let mut results = Vec::new();
        for bytes in &responses {
            if !bytes.starts_with(b"* ") {
                continue;
            }
            match ResponseParser::parse(bytes) {
                Ok(Response::Untagged(UntaggedResponse::Fetch { seq, items })) => {
                    results.push((seq, items));
                }
                Ok(_) => {}
                Err(e) => warn!(error = %e, "skipping unparsable FETCH response"),
            }
        }
        Ok(results)
    }

    /// Runs `UID STORE ... .SILENT`, so the server sends no FETCH echo.
    pub async fn uid_store(&mut self, uids: &UidSet, action: StoreAction) -> Result<()> {
        let command = Command::UidStore {
            uids: uids.clone(),
            action,
            silent: true,
        };
        let responses = self.execute(&command).await?;
        Self::check_tagged_ok(&responses)
    }

    /// CLOSE: leaves the mailbox, expunging `\Deleted` messages.
    pub async fn close(mut self) -> Result<Client<S, Authenticated>> {
        let responses = self.execute(&Command::Close).await?;
        Self::check_tagged_ok(&responses)?;
        Ok(self.transition())
    }

    /// UNSELECT (RFC 3691): leaves the mailbox without expunging.
    pub async fn unselect(mut self) -> Result<Client<S, Authenticated>> {
        let responses = self.execute(&Command::Unselect).await?;
        Self::check_tagged_ok(&responses)?;
        Ok(self.transition())
    }

    /// Leaves the mailbox with UNSELECT when advertised, CLOSE otherwise.
    pub async fn deselect(self) -> Result<Client<S, Authenticated>> {
        if self.has_capability(&Capability::Unselect) {
            self.unselect().await
        } else {
            self.close().await
        }
    }
}
