//! In-memory folder and provider for exercising the sweep.

#![allow(dead_code, clippy::unwrap_used)]

use std::sync::{Arc, Mutex, MutexGuard};

use mailsift_core::{
    BodyPart, BodyStructure, ContentKind, Error, MailFolder, MailboxConfig, MessageId,
    MessageRecord, Result, SessionProvider,
};

#[derive(Debug, Default)]
pub struct MailboxState {
    pub messages: Vec<MessageRecord>,
    pub calls: Vec<String>,
    pub fail_fetch: Option<MessageId>,
    pub fail_close: bool,
    pub refuse_connection: bool,
    pub open_folders: usize,
    pub opens: usize,
    pub closes: usize,
}

/// Shared server-side state, inspectable after the folder is consumed.
#[derive(Debug, Clone, Default)]
pub struct FakeMailbox(Arc<Mutex<MailboxState>>);

impl FakeMailbox {
    pub fn with_messages(messages: Vec<MessageRecord>) -> Self {
        let mailbox = Self::default();
        mailbox.state().messages = messages;
        mailbox
    }

    pub fn state(&self) -> MutexGuard<'_, MailboxState> {
        self.0.lock().unwrap()
    }

    pub fn is_seen(&self, id: u32) -> bool {
        self.state()
            .messages
            .iter()
            .find(|m| m.id == MessageId::new(id))
            .is_some_and(|m| m.seen)
    }

    pub fn calls(&self) -> Vec<String> {
        self.state().calls.clone()
    }
}

pub struct FakeFolder {
    mailbox: FakeMailbox,
}

impl MailFolder for FakeFolder {
    async fn search_unread(&mut self) -> Result<Vec<MessageId>> {
        let mut state = self.mailbox.state();
        state.calls.push("search".to_string());
        Ok(state
            .messages
            .iter()
            .filter(|m| !m.seen)
            .map(|m| m.id)
            .collect())
    }

    async fn mark_seen(&mut self, id: MessageId) -> Result<()> {
        let mut state = self.mailbox.state();
        state.calls.push(format!("mark_seen {id}"));
        let message = state
            .messages
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or_else(|| Error::MailAccess(format!("no message {id}")))?;
        message.seen = true;
        Ok(())
    }

    async fn fetch(&mut self, id: MessageId) -> Result<MessageRecord> {
        let mut state = self.mailbox.state();
        state.calls.push(format!("fetch {id}"));
        if state.fail_fetch == Some(id) {
            return Err(Error::MailAccess(format!("fetch {id} failed")));
        }
        state
            .messages
            .iter()
            .find(|m| m.id == id)
            .cloned()
            .ok_or_else(|| Error::MailAccess(format!("no message {id}")))
    }

    async fn close(self) -> Result<()> {
        let mut state = self.mailbox.state();
        state.calls.push("close".to_string());
        state.open_folders -= 1;
        state.closes += 1;
        if state.fail_close {
            return Err(Error::MailAccess("close failed".to_string()));
        }
        Ok(())
    }
}

pub struct FakeProvider {
    pub mailbox: FakeMailbox,
}

impl FakeProvider {
    pub fn new(mailbox: &FakeMailbox) -> Self {
        Self {
            mailbox: mailbox.clone(),
        }
    }
}

impl SessionProvider for FakeProvider {
    type Folder = FakeFolder;

    async fn open_inbox(&self, _config: &MailboxConfig) -> Result<FakeFolder> {
        let mut state = self.mailbox.state();
        if state.refuse_connection {
            return Err(Error::Connection("connection refused".to_string()));
        }
        state.open_folders += 1;
        state.opens += 1;
        Ok(FakeFolder {
            mailbox: self.mailbox.clone(),
        })
    }
}

pub fn config() -> MailboxConfig {
    MailboxConfig::new("bob", "secret", "localhost", "143", false)
}

pub fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(ToString::to_string).collect()
}

pub fn message(id: u32, body: BodyStructure) -> MessageRecord {
    MessageRecord {
        id: MessageId::new(id),
        from: strings(&["alice@x.com"]),
        to: strings(&["bob@y.com"]),
        cc: Vec::new(),
        subject: None,
        seen: false,
        body,
    }
}

pub fn plain_multipart(id: u32, text: &str) -> MessageRecord {
    message(
        id,
        BodyStructure::Multipart(vec![
            BodyPart::text(ContentKind::PlainText, text),
            BodyPart::text(ContentKind::Other("text/html".to_string()), "<p>ignored</p>"),
        ]),
    )
}

pub fn single_part(id: u32) -> MessageRecord {
    message(
        id,
        BodyStructure::Single(BodyPart::text(ContentKind::PlainText, "not rendered")),
    )
}
