//! Report rendering.
//!
//! One block per rendered message:
//!
//! ```text
//! From: a@x.com,b@x.com
//! To: c@y.com
//! CC: d@y.com            (only when Cc is non-empty)
//! Subject: Hi            (only when a subject is present,
//!                         followed by an empty line)
//! <content>
//!
//!
//! ```

use std::fmt;

const BLOCK_SEPARATOR: &str = "\n\n\n";

/// One message rendered for the report.
#[derive(Debug, Clone, Copy)]
pub struct MessageBlock<'a> {
    /// Sender addresses.
    pub from: &'a [String],
    /// To addresses.
    pub to: &'a [String],
    /// Cc addresses; the CC line is omitted when empty.
    pub cc: &'a [String],
    /// Subject; the Subject line is omitted when absent.
    pub subject: Option<&'a str>,
    /// Body text, written verbatim.
    pub content: &'a str,
}

impl fmt::Display for MessageBlock<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "From: {}", self.from.join(","))?;
        writeln!(f, "To: {}", self.to.join(","))?;
        if !self.cc.is_empty() {
            writeln!(f, "CC: {}", self.cc.join(","))?;
        }
        if let Some(subject) = self.subject {
            write!(f, "Subject: {subject}\n\n")?;
        }
        write!(f, "{}{BLOCK_SEPARATOR}", self.content)
    }
}

/// Append-only report, blocks in the order they were pushed.
#[derive(Debug, Default, Clone)]
pub struct ReportBuffer {
    text: String,
    blocks: usize,
}

impl ReportBuffer {
    /// Creates an empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one block.
    pub fn push(&mut self, block: &MessageBlock<'_>) {
        use fmt::Write as _;
        // Writing into a String cannot fail.
        let _ = write!(self.text, "{block}");
        self.blocks += 1;
    }

    /// Number of blocks appended.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.blocks
    }

    /// True if nothing was appended.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.blocks == 0
    }

    /// The finished report.
    #[must_use]
    pub fn into_string(self) -> String {
        self.text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_full_block() {
        let from = strings(&["alice@x.com"]);
        let to = strings(&["bob@y.com", "carol@y.com"]);
        let cc = strings(&["dave@y.com"]);
        let block = MessageBlock {
            from: &from,
            to: &to,
            cc: &cc,
            subject: Some("Hi"),
            content: "hello there",
        };
        assert_eq!(
            block.to_string(),
            "From: alice@x.com\nTo: bob@y.com,carol@y.com\nCC: dave@y.com\nSubject: Hi\n\nhello there\n\n\n"
        );
    }

    #[test]
    fn test_optional_lines_omitted() {
        let from = strings(&["a@x.com"]);
        let block = MessageBlock {
            from: &from,
            to: &[],
            cc: &[],
            subject: None,
            content: "body",
        };
        assert_eq!(block.to_string(), "From: a@x.com\nTo: \nbody\n\n\n");
    }

    #[test]
    fn test_duplicates_kept_in_order() {
        let from = strings(&["a@x.com"]);
        let to = strings(&["z@y.com", "a@y.com", "z@y.com"]);
        let block = MessageBlock {
            from: &from,
            to: &to,
            cc: &[],
            subject: Some(""),
            content: "",
        };
        assert_eq!(
            block.to_string(),
            "From: a@x.com\nTo: z@y.com,a@y.com,z@y.com\nSubject: \n\n\n\n\n"
        );
    }

    #[test]
    fn test_report_buffer_appends_in_order() {
        let first = strings(&["first@x.com"]);
        let second = strings(&["second@x.com"]);
        let mut report = ReportBuffer::new();
        assert!(report.is_empty());

        for from in [&first, &second] {
            report.push(&MessageBlock {
                from,
                to: &[],
                cc: &[],
                subject: None,
                content: "c",
            });
        }

        assert_eq!(report.len(), 2);
        assert_eq!(
            report.into_string(),
            "From: first@x.com\nTo: \nc\n\n\nFrom: second@x.com\nTo: \nc\n\n\n"
        );
    }

    proptest! {
        #[test]
        fn address_lines_join_without_spaces(
            to in prop::collection::vec("[a-z]{1,8}@[a-z]{1,8}\\.com", 1..6),
        ) {
            let from = vec!["sender@x.com".to_string()];
            let block = MessageBlock {
                from: &from,
                to: &to,
                cc: &[],
                subject: None,
                content: "",
            };
            let rendered = block.to_string();
            let to_line = rendered.lines().nth(1).unwrap_or_default();
            let joined = to_line.strip_prefix("To: ").unwrap_or_default();
            prop_assert_eq!(joined.split(',').collect::<Vec<_>>(), to.iter().map(String::as_str).collect::<Vec<_>>());
            prop_assert!(!rendered.contains("CC:"));
        }
    }
}
