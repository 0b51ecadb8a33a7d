//! `mailsift` - prints the plain-text body of every unread message in one
//! IMAP folder and marks those messages read.
//!
//! Usage: `mailsift [CONFIG_PATH]`. Without a path the per-user config file
//! is used (see [`MailboxConfig::default_path`]). The report goes to stdout,
//! logs go to stderr and are filtered with `RUST_LOG`.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use mailsift_core::{MailboxConfig, read_unread_mails};
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_FILTER: &str = "mailsift=info,mailsift_core=info,mailsift_imap=warn";

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let path = cli.config_path()?;
    debug!(path = %path.display(), "loading configuration");
    let config = MailboxConfig::load(&path)
        .with_context(|| format!("loading configuration from {}", path.display()))?;

    info!(host = %config.host, folder = %config.folder, "reading unread mail");
    let report = read_unread_mails(&config)
        .await
        .with_context(|| format!("reading unread mail from {}", config.host))?;

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(report.as_bytes())?;
    stdout.flush()?;
    Ok(())
}

#[derive(Debug, Parser)]
#[command(
    name = "mailsift",
    version,
    about = "Print the plain-text body of unread IMAP mail and mark it read"
)]
struct Cli {
    /// JSON account file; defaults to <config dir>/mailsift/config.json
    config: Option<PathBuf>,
}

impl Cli {
    fn config_path(self) -> anyhow::Result<PathBuf> {
        match self.config {
            Some(path) => Ok(path),
            None => Ok(MailboxConfig::default_path()?),
        }
    }
}
