//! Server endpoint and transport settings.

use std::time::Duration;

const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// How the TCP stream is protected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Security {
    /// No encryption. Conventionally port 143.
    None,
    /// TLS handshake right after connecting. Conventionally port 993.
    #[default]
    Implicit,
}

impl Security {
    /// IANA port for the mode.
    #[must_use]
    pub const fn default_port(self) -> u16 {
        if matches!(self, Self::Implicit) { 993 } else { 143 }
    }
}

/// An IMAP endpoint. The port follows the security mode unless set.
#[derive(Debug, Clone)]
pub struct Config {
    /// DNS name or address; also the TLS server name.
    pub host: String,
    /// Transport protection.
    pub security: Security,
    /// Bound on TCP connect plus TLS handshake.
    pub connect_timeout: Duration,
    port: Option<u16>,
}

impl Config {
    /// Implicit TLS on the default port, 30 second connect timeout.
    #[must_use]
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            security: Security::default(),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            port: None,
        }
    }

    /// Overrides the port.
    #[must_use]
    pub const fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Sets the transport protection.
    #[must_use]
    pub const fn with_security(mut self, security: Security) -> Self {
        self.security = security;
        self
    }

    /// Sets the connect bound.
    #[must_use]
    pub const fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Port to connect to.
    #[must_use]
    pub fn port(&self) -> u16 {
        self.port.unwrap_or_else(|| self.security.default_port())
    }
}
