//! Mailbox configuration.
//!
//! Loaded from JSON, optionally overridden from the environment, and
//! validated before any connection is attempted.

mod model;
mod validation;

pub use model::{ConfigError, MailboxConfig, PASSWORD_ENV, SeenPolicy};
pub use validation::{ValidationError, ValidationResult, validate_config};
