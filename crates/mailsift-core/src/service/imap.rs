//! IMAP-backed session provider and folder handle.

use mailsift_imap::connection::connect;
use mailsift_imap::{
    Address, Authenticated, Client, Config, Envelope, FetchAttribute, FetchItem, FetchItems,
    Flag, Flags, ImapStream, SearchCriteria, Security, Selected, StoreAction, Uid, UidSet,
};
use mailsift_mime::encoding::decode_rfc2047;
use mailsift_mime::{Body, Message};
use tokio::io::{AsyncRead, AsyncWrite};
use tracing::{debug, info, warn};

use crate::config::{ConfigError, MailboxConfig};
use crate::error::{Error, Result};
use crate::folder::{BodyPart, BodyStructure, MailFolder, MessageId, MessageRecord, SessionProvider};

/// Type alias for a selected client over a network stream.
pub type SelectedClient = Client<ImapStream, Selected>;

/// Opens folders on an IMAP server.
///
/// `enable_auth` picks the transport: implicit TLS when set, plaintext TCP
/// otherwise. LOGIN is sent in both cases.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImapSessionProvider;

impl ImapSessionProvider {
    /// Creates a provider.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl SessionProvider for ImapSessionProvider {
    type Folder = ImapFolder<ImapStream>;

    async fn open_inbox(&self, config: &MailboxConfig) -> Result<Self::Folder> {
        let port = config
            .port_number()
            .map_err(|e| ConfigError::Invalid(vec![e]))?;
        let security = if config.enable_auth {
            Security::Implicit
        } else {
            Security::None
        };

        let imap_config = Config::new(config.host.as_str())
            .with_port(port)
            .with_security(security)
            .with_connect_timeout(config.connect_timeout());

        info!(host = %config.host, port, tls = config.enable_auth, "connecting");
        let stream = connect(&imap_config).await.map_err(connection_error)?;
        ImapFolder::open(stream, config).await
    }
}

/// A read-write selected folder on a live IMAP session.
#[derive(Debug)]
pub struct ImapFolder<S> {
    client: Client<S, Selected>,
    name: String,
}

impl<S> ImapFolder<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Greets, logs in, checks the session is alive, and selects the
    /// configured folder read-write.
    ///
    /// # Errors
    ///
    /// Every failure is [`Error::Connection`]. An authenticated session is
    /// logged out before the error is returned.
    pub async fn open(stream: S, config: &MailboxConfig) -> Result<Self> {
        let client = Client::from_stream(stream)
            .await
            .map_err(connection_error)?;
        let mut client = client
            .login(&config.username, &config.password)
            .await
            .map_err(connection_error)?;
        debug!(username = %config.username, "logged in");

        if let Err(e) = client.noop().await {
            logout_quietly(client).await;
            return Err(Error::Connection(format!("session not connected: {e}")));
        }

        let (client, status) = match client.select(&config.folder).await {
            Ok(selected) => selected,
            Err((e, client)) => {
                logout_quietly(client).await;
                return Err(Error::Connection(format!(
                    "cannot open folder {}: {e}",
                    config.folder
                )));
            }
        };

        if status.read_only {
            match client.deselect().await {
                Ok(client) => logout_quietly(client).await,
                Err(e) => debug!(error = %e, "deselect after read-only select failed"),
            }
            return Err(Error::Connection(format!(
                "folder {} is read-only",
                config.folder
            )));
        }

        info!(folder = %config.folder, exists = status.exists, "folder opened read-write");
        Ok(Self {
            client,
            name: config.folder.clone(),
        })
    }

    /// Name of the selected folder.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl<S> MailFolder for ImapFolder<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    async fn search_unread(&mut self) -> Result<Vec<MessageId>> {
        let uids = self
            .client
            .uid_search(&SearchCriteria::Unseen)
            .await
            .map_err(access_error)?;
        Ok(uids.into_iter().map(MessageId::from).collect())
    }

    async fn mark_seen(&mut self, id: MessageId) -> Result<()> {
        let uid = to_uid(id)?;
        self.client
            .uid_store(&UidSet::from(uid), StoreAction::AddFlags(vec![Flag::Seen]))
            .await
            .map_err(access_error)?;
        debug!(%id, "marked seen");
        Ok(())
    }

    async fn fetch(&mut self, id: MessageId) -> Result<MessageRecord> {
        let uid = to_uid(id)?;
        let items = FetchItems::new(vec![
            FetchAttribute::Uid,
            FetchAttribute::Flags,
            FetchAttribute::Envelope,
            FetchAttribute::full_message_peek(),
        ]);

        let responses = self
            .client
            .uid_fetch(&UidSet::from(uid), &items)
            .await
            .map_err(access_error)?;

        let items = responses
            .into_iter()
            .map(|(_, items)| items)
            .find(|items| items.iter().any(|item| *item == FetchItem::Uid(uid)))
            .ok_or_else(|| Error::MailAccess(format!("message {id} was not returned")))?;

        build_record(id, items)
    }

    async fn close(self) -> Result<()> {
        let client = self.client.deselect().await.map_err(access_error)?;
        client.logout().await.map_err(access_error)?;
        debug!(folder = %self.name, "folder and session closed");
        Ok(())
    }
}

fn to_uid(id: MessageId) -> Result<Uid> {
    Uid::new(id.get()).ok_or_else(|| Error::MailAccess(format!("invalid message id {id}")))
}

fn build_record(id: MessageId, items: Vec<FetchItem>) -> Result<MessageRecord> {
    let mut envelope: Option<Envelope> = None;
    let mut flags = Flags::new();
    let mut raw: Option<Vec<u8>> = None;
    let mut has_body = false;

    for item in items {
        match item {
            FetchItem::Envelope(e) => envelope = Some(*e),
            FetchItem::Flags(f) => flags = f,
            FetchItem::Body {
                section: None,
                data,
                ..
            } => {
                has_body = true;
                raw = data;
            }
            _ => {}
        }
    }

    let envelope =
        envelope.ok_or_else(|| Error::MailAccess(format!("message {id}: no envelope")))?;
    if !has_body {
        return Err(Error::MailAccess(format!("message {id}: no body")));
    }

    let message = Message::parse(raw.as_deref().unwrap_or_default())
        .map_err(|e| Error::MailAccess(format!("message {id}: {e}")))?;
    let body = match message.body {
        Body::Single(part) => BodyStructure::Single(BodyPart::from_mime(part)),
        Body::Multipart(parts) => {
            BodyStructure::Multipart(parts.into_iter().map(BodyPart::from_mime).collect())
        }
    };

    Ok(MessageRecord {
        id,
        cc: addresses(&envelope.cc),
        to: addresses(&envelope.to),
        from: addresses(&envelope.from),
        subject: envelope.subject.map(decode_subject),
        seen: flags.is_seen(),
        body,
    })
}

/// Flattens an address list to `mailbox@host`, dropping group markers.
fn addresses(list: &[Address]) -> Vec<String> {
    list.iter().filter_map(Address::email).collect()
}

fn decode_subject(raw: String) -> String {
    match decode_rfc2047(&raw) {
        Ok(decoded) => decoded,
        Err(e) => {
            debug!(error = %e, "subject left undecoded");
            raw
        }
    }
}

async fn logout_quietly<S>(client: Client<S, Authenticated>)
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    if let Err(e) = client.logout().await {
        warn!(error = %e, "logout failed");
    }
}

fn connection_error(e: mailsift_imap::Error) -> Error {
    Error::Connection(e.to_string())
}

fn access_error(e: mailsift_imap::Error) -> Error {
    Error::MailAccess(e.to_string())
}
