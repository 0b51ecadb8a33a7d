//! Unread-mail extraction over an open folder.

use tracing::{debug, info};

use crate::config::SeenPolicy;
use crate::error::Result;
use crate::folder::{BodyStructure, ContentKind, MailFolder, MessageRecord};
use crate::report::{MessageBlock, ReportBuffer};

/// Walks the unread messages of a folder and renders the plain-text ones.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnreadMailExtractor {
    policy: SeenPolicy,
}

impl UnreadMailExtractor {
    /// Creates an extractor with the given seen policy.
    #[must_use]
    pub const fn new(policy: SeenPolicy) -> Self {
        Self { policy }
    }

    /// The seen policy in effect.
    #[must_use]
    pub const fn policy(&self) -> SeenPolicy {
        self.policy
    }

    /// Renders every unread message of `folder` and marks each one seen.
    ///
    /// Messages are visited once, in the order the folder reports them.
    /// Only a multipart message whose first part is `text/plain` produces
    /// a block; every visited message is marked seen regardless. The folder
    /// is left open.
    ///
    /// # Errors
    ///
    /// Returns the first folder error, or [`crate::Error::Io`] if a plain
    /// text part cannot be decoded. No partial report is returned.
    pub async fn extract_unread<F: MailFolder>(&self, folder: &mut F) -> Result<String> {
        let unread = folder.search_unread().await?;
        debug!(count = unread.len(), "unread messages found");

        let mut report = ReportBuffer::new();
        for id in unread {
            if self.policy == SeenPolicy::BeforeExtraction {
                folder.mark_seen(id).await?;
            }

            let record = folder.fetch(id).await?;
            if let Some(content) = plain_text_content(&record)? {
                report.push(&MessageBlock {
                    from: &record.from,
                    to: &record.to,
                    cc: &record.cc,
                    subject: record.subject.as_deref(),
                    content: &content,
                });
            }

            if self.policy == SeenPolicy::AfterExtraction {
                folder.mark_seen(id).await?;
            }
        }

        info!(rendered = report.len(), "unread sweep finished");
        Ok(report.into_string())
    }
}

/// Text of the first part when the message is multipart and that part is
/// plain text. Later parts are never inspected.
fn plain_text_content(record: &MessageRecord) -> Result<Option<String>> {
    let first = match &record.body {
        BodyStructure::Single(_) => {
            debug!(id = %record.id, "skipping non-multipart message");
            return Ok(None);
        }
        BodyStructure::Multipart(parts) => parts.first(),
    };

    match first {
        Some(part) if part.kind() == &ContentKind::PlainText => {
            Ok(Some(part.read_content()?.text))
        }
        Some(part) => {
            debug!(id = %record.id, kind = %part.kind(), "skipping message, first part is not plain text");
            Ok(None)
        }
        None => Ok(None),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::folder::{BodyPart, MessageId};

    fn record(body: BodyStructure) -> MessageRecord {
        MessageRecord {
            id: MessageId::new(1),
            from: vec!["a@x.com".to_string()],
            to: Vec::new(),
            cc: Vec::new(),
            subject: None,
            seen: false,
            body,
        }
    }

    #[test]
    fn test_single_part_contributes_nothing() {
        let body = BodyStructure::Single(BodyPart::text(ContentKind::PlainText, "text"));
        assert_eq!(plain_text_content(&record(body)).unwrap(), None);
    }

    #[test]
    fn test_only_first_part_is_inspected() {
        let body = BodyStructure::Multipart(vec![
            BodyPart::text(ContentKind::Other("text/html".into()), "<p>x</p>"),
            BodyPart::text(ContentKind::PlainText, "x"),
        ]);
        assert_eq!(plain_text_content(&record(body)).unwrap(), None);

        let body = BodyStructure::Multipart(vec![
            BodyPart::text(ContentKind::PlainText, "first"),
            BodyPart::text(ContentKind::PlainText, "second"),
        ]);
        assert_eq!(
            plain_text_content(&record(body)).unwrap().as_deref(),
            Some("first")
        );
    }

    #[test]
    fn test_empty_multipart_contributes_nothing() {
        let body = BodyStructure::Multipart(Vec::new());
        assert_eq!(plain_text_content(&record(body)).unwrap(), None);
    }
}
