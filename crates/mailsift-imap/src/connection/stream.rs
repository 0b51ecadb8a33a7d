//! Opening the transport: TCP, optionally wrapped in TLS.

use std::io;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use rustls::pki_types::ServerName;
use tokio::io::{AsyncRead, AsyncWrite, ReadBuf};
use tokio::net::TcpStream;
use tokio_rustls::TlsConnector;
use tokio_rustls::client::TlsStream;
use tracing::debug;

use super::config::{Config, Security};
use crate::{Error, Result};

/// The socket under a [`Client`](super::Client).
pub enum ImapStream {
    /// Unencrypted TCP.
    Plain(TcpStream),
    /// TLS over TCP.
    Tls(Box<TlsStream<TcpStream>>),
}

impl ImapStream {
    /// Whether the stream is encrypted.
    #[must_use]
    pub const fn is_tls(&self) -> bool {
        matches!(self, Self::Tls(_))
    }
}

impl std::fmt::Debug for ImapStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(if self.is_tls() { "ImapStream::Tls" } else { "ImapStream::Plain" })
    }
}

/// Forwards a poll method to whichever stream is inside.
macro_rules! delegate {
    ($self:ident, $method:ident($($arg:expr),*)) => {
        match $self.get_mut() {
            ImapStream::Plain(s) => Pin::new(s).$method($($arg),*),
            ImapStream::Tls(s) => Pin::new(s.as_mut()).$method($($arg),*),
        }
    };
}

impl AsyncRead for ImapStream {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        delegate!(self, poll_read(cx, buf))
    }
}

impl AsyncWrite for ImapStream {
    fn poll_write(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        delegate!(self, poll_write(cx, buf))
    }

    fn poll_flush(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        delegate!(self, poll_flush(cx))
    }

    fn poll_shutdown(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        delegate!(self, poll_shutdown(cx))
    }
}

/// Client TLS setup trusting the bundled Mozilla roots.
fn tls_connector() -> TlsConnector {
    let roots: rustls::RootCertStore = webpki_roots::TLS_SERVER_ROOTS.iter().cloned().collect();
    let tls = rustls::ClientConfig::builder()
        .with_root_certificates(roots)
        .with_no_client_auth();
    TlsConnector::from(Arc::new(tls))
}

/// Connects to the endpoint in `config`.
///
/// # Errors
///
/// [`Error::Timeout`] when connecting and handshaking together exceed
/// `config.connect_timeout`; otherwise the socket, DNS-name or TLS error.
pub async fn connect(config: &Config) -> Result<ImapStream> {
    let limit = config.connect_timeout;
    let stream = tokio::time::timeout(limit, open(config))
        .await
        .map_err(|_| Error::Timeout(limit))??;

    debug!(host = %config.host, port = config.port(), tls = stream.is_tls(), "connected");
    Ok(stream)
}

async fn open(config: &Config) -> Result<ImapStream> {
    let tcp = TcpStream::connect((config.host.as_str(), config.port())).await?;
    if config.security == Security::None {
        return Ok(ImapStream::Plain(tcp));
    }
    let server_name = ServerName::try_from(config.host.clone())?;
    let tls = tls_connector().connect(server_name, tcp).await?;
    Ok(ImapStream::Tls(Box::new(tls)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use tokio::net::TcpListener;

    use super::*;

    async fn local_port() -> (TcpListener, u16) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        (listener, port)
    }

    #[tokio::test]
    async fn test_plaintext_connect() {
        let (_listener, port) = local_port().await;
        let config = Config::new("127.0.0.1")
            .with_security(Security::None)
            .with_port(port);

        let stream = connect(&config).await.unwrap();
        assert!(!stream.is_tls());
    }

    #[tokio::test]
    async fn test_refused_connect_is_a_disconnect() {
        let (listener, port) = local_port().await;
        drop(listener);
        let config = Config::new("127.0.0.1")
            .with_security(Security::None)
            .with_port(port)
            .with_connect_timeout(Duration::from_secs(5));

        let err = connect(&config).await.err().unwrap();
        assert!(err.is_disconnect());
    }
}
