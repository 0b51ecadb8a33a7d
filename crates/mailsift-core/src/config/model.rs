//! Mailbox configuration model.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Deserializer, Serialize};

use super::validation::{ValidationError, ValidationResult, validate_config};

/// Environment variable that overrides the configured password.
pub const PASSWORD_ENV: &str = "MAILSIFT_PASSWORD";

const DEFAULT_FOLDER: &str = "INBOX";
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 30;

/// When a message's `\Seen` flag is set relative to reading its content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeenPolicy {
    /// Mark first, then extract. A failed run never re-delivers a message.
    #[default]
    BeforeExtraction,
    /// Extract first, then mark. A message whose extraction fails stays
    /// unread and is picked up again by the next run.
    AfterExtraction,
}

/// Errors raised while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("cannot read {}: {source}", .path.display())]
    Read {
        /// File that was being read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The file is not valid configuration JSON.
    #[error("invalid configuration JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// One or more fields failed validation.
    #[error("{}", describe(.0))]
    Invalid(Vec<ValidationError>),

    /// No platform configuration directory and no explicit path.
    #[error("no configuration directory available on this platform")]
    NoConfigDir,
}

fn describe(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field(), e.message()))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Connection parameters for one mailbox account.
///
/// An explicit value handed to each extraction run; nothing is read from
/// global state once the value exists.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailboxConfig {
    /// Login name.
    pub username: String,
    /// Login secret.
    pub password: String,
    /// Server hostname.
    pub host: String,
    /// Server port as written in the file. Accepts a JSON string or number.
    #[serde(deserialize_with = "port_from_text_or_number")]
    pub port: String,
    /// `true` connects with implicit TLS, `false` with plaintext TCP.
    /// LOGIN is performed either way.
    pub enable_auth: bool,
    /// Folder to sweep.
    #[serde(default = "default_folder")]
    pub folder: String,
    /// Ordering of the `\Seen` update relative to extraction.
    #[serde(default)]
    pub seen_policy: SeenPolicy,
    /// Upper bound for TCP connect plus TLS handshake, in seconds.
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

fn default_folder() -> String {
    DEFAULT_FOLDER.to_string()
}

const fn default_connect_timeout_secs() -> u64 {
    DEFAULT_CONNECT_TIMEOUT_SECS
}

fn port_from_text_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Port {
        Text(String),
        Number(u64),
    }

    Ok(match Port::deserialize(deserializer)? {
        Port::Text(text) => text,
        Port::Number(number) => number.to_string(),
    })
}

impl MailboxConfig {
    /// Creates a configuration with default folder, policy and timeout.
    #[must_use]
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        host: impl Into<String>,
        port: impl Into<String>,
        enable_auth: bool,
    ) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            host: host.into(),
            port: port.into(),
            enable_auth,
            folder: default_folder(),
            seen_policy: SeenPolicy::default(),
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
        }
    }

    /// Returns a copy sweeping `folder` instead of the inbox.
    #[must_use]
    pub fn with_folder(mut self, folder: impl Into<String>) -> Self {
        self.folder = folder.into();
        self
    }

    /// Returns a copy with a different seen policy.
    #[must_use]
    pub const fn with_seen_policy(mut self, policy: SeenPolicy) -> Self {
        self.seen_policy = policy;
        self
    }

    /// Returns a copy with a different connect timeout.
    #[must_use]
    pub const fn with_connect_timeout_secs(mut self, secs: u64) -> Self {
        self.connect_timeout_secs = secs;
        self
    }

    /// Replaces the password when an override is present.
    #[must_use]
    pub fn with_password_override(mut self, password: Option<String>) -> Self {
        if let Some(password) = password.filter(|p| !p.is_empty()) {
            self.password = password;
        }
        self
    }

    /// The port as a number in `1..=65535`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidPort`] for anything else.
    pub fn port_number(&self) -> Result<u16, ValidationError> {
        match self.port.trim().parse::<u16>() {
            Ok(port) if port != 0 => Ok(port),
            _ => Err(ValidationError::InvalidPort),
        }
    }

    /// The connect timeout as a duration.
    #[must_use]
    pub const fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Validates every field, reporting all problems at once.
    ///
    /// # Errors
    ///
    /// Returns the list of failed checks.
    pub fn validate(&self) -> ValidationResult {
        validate_config(self)
    }

    /// Parses configuration JSON without validating it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON or missing fields.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(Into::into)
    }

    /// Loads, applies the [`PASSWORD_ENV`] override, and validates.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or validated.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let config =
            Self::from_json(&json)?.with_password_override(std::env::var(PASSWORD_ENV).ok());
        config.validate().map_err(ConfigError::Invalid)?;
        Ok(config)
    }

    /// `<config_dir>/mailsift/config.json`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NoConfigDir`] if the platform has no
    /// configuration directory.
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        dirs::config_dir()
            .map(|dir| dir.join("mailsift").join("config.json"))
            .ok_or(ConfigError::NoConfigDir)
    }
}

impl fmt::Debug for MailboxConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MailboxConfig")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("enable_auth", &self.enable_auth)
            .field("folder", &self.folder)
            .field("seen_policy", &self.seen_policy)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"{
        "username": "bob",
        "password": "secret",
        "host": "imap.example.com",
        "port": "993",
        "enable_auth": true
    }"#;

    #[test]
    fn test_from_json_applies_defaults() {
        let config = MailboxConfig::from_json(MINIMAL).unwrap();
        assert_eq!(config.username, "bob");
        assert_eq!(config.port_number().unwrap(), 993);
        assert!(config.enable_auth);
        assert_eq!(config.folder, "INBOX");
        assert_eq!(config.seen_policy, SeenPolicy::BeforeExtraction);
        assert_eq!(config.connect_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_from_json_optional_fields() {
        let json = r#"{
            "username": "bob", "password": "pw", "host": "localhost",
            "port": 1143, "enable_auth": false,
            "folder": "Alerts", "seen_policy": "after_extraction",
            "connect_timeout_secs": 5
        }"#;
        let config = MailboxConfig::from_json(json).unwrap();
        assert_eq!(config.port, "1143");
        assert_eq!(config.folder, "Alerts");
        assert_eq!(config.seen_policy, SeenPolicy::AfterExtraction);
        assert_eq!(config.connect_timeout_secs, 5);
    }

    #[test]
    fn test_from_json_missing_required_field() {
        let json = r#"{"username": "bob", "password": "pw", "host": "h", "port": "993"}"#;
        assert!(matches!(
            MailboxConfig::from_json(json),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_port_number_bounds() {
        let config = MailboxConfig::new("u", "p", "h", " 65535 ", true);
        assert_eq!(config.port_number().unwrap(), 65535);

        for bad in ["0", "65536", "-1", "imap", ""] {
            let config = MailboxConfig::new("u", "p", "h", bad, true);
            assert_eq!(config.port_number(), Err(ValidationError::InvalidPort));
        }
    }

    #[test]
    fn test_password_override() {
        let config = MailboxConfig::new("u", "stored", "h", "993", true);
        let same = config.clone().with_password_override(None);
        assert_eq!(same.password, "stored");
        let empty = config.clone().with_password_override(Some(String::new()));
        assert_eq!(empty.password, "stored");
        let replaced = config.with_password_override(Some("from-env".to_string()));
        assert_eq!(replaced.password, "from-env");
    }

    #[test]
    fn test_debug_redacts_password() {
        let config = MailboxConfig::new("bob", "hunter2", "h", "993", true);
        let debug = format!("{config:?}");
        assert!(debug.contains("bob"));
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn test_load_missing_file() {
        let path = Path::new("/nonexistent/mailsift/config.json");
        assert!(matches!(
            MailboxConfig::load(path),
            Err(ConfigError::Read { .. })
        ));
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        let path = std::env::temp_dir().join(format!("mailsift-invalid-{}.json", std::process::id()));
        std::fs::write(
            &path,
            r#"{"username": "", "password": "x", "host": "", "port": "0", "enable_auth": true}"#,
        )
        .unwrap();

        let result = MailboxConfig::load(&path);
        std::fs::remove_file(&path).unwrap();

        let Err(ConfigError::Invalid(errors)) = result else {
            panic!("expected validation failure");
        };
        assert!(errors.contains(&ValidationError::EmptyHost));
        assert!(errors.contains(&ValidationError::EmptyUsername));
        assert!(errors.contains(&ValidationError::InvalidPort));
    }

    #[test]
    fn test_default_path_layout() {
        if let Ok(path) = MailboxConfig::default_path() {
            assert!(path.ends_with("mailsift/config.json"));
        }
    }
}
