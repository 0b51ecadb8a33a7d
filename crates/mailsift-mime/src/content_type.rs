//! `Content-Type` values (RFC 2045 section 5).

use crate::error::{Error, Result};

/// A parsed `type/subtype; name=value ...` header value.
///
/// Type, subtype and parameter names are lowercased; parameter values keep
/// their case with quoting removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentType {
    essence: String,
    slash: usize,
    params: Vec<(String, String)>,
}

impl ContentType {
    /// What a part without a `Content-Type` header is.
    #[must_use]
    pub fn text_plain() -> Self {
        Self {
            essence: "text/plain".to_string(),
            slash: 4,
            params: Vec::new(),
        }
    }

    /// # Errors
    ///
    /// [`Error::InvalidContentType`] when either half of `type/subtype` is
    /// missing.
    pub fn parse(value: &str) -> Result<Self> {
        let mut segments = Segments::new(value);
        let head = segments.next().unwrap_or_default();

        let invalid = || Error::InvalidContentType(value.to_string());
        let (main, sub) = head.split_once('/').ok_or_else(invalid)?;
        let (main, sub) = (main.trim(), sub.trim());
        if main.is_empty() || sub.is_empty() {
            return Err(invalid());
        }

        let params = segments
            .filter_map(|segment| segment.split_once('='))
            .map(|(name, raw)| (name.trim().to_ascii_lowercase(), unquote(raw.trim())))
            .collect();

        Ok(Self {
            essence: format!("{main}/{sub}").to_ascii_lowercase(),
            slash: main.len(),
            params,
        })
    }

    /// Lowercased `type/subtype`.
    #[must_use]
    pub fn mime_type(&self) -> String {
        self.essence.clone()
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn main_type(&self) -> &str {
        &self.essence[..self.slash]
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn sub_type(&self) -> &str {
        &self.essence[self.slash + 1..]
    }

    /// First parameter called `name` (lowercase).
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn charset(&self) -> Option<&str> {
        self.param("charset")
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn boundary(&self) -> Option<&str> {
        self.param("boundary")
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn is_multipart(&self) -> bool {
        self.main_type() == "multipart"
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn is_text_plain(&self) -> bool {
        self.essence == "text/plain"
    }
}

/// `;`-separated segments of a header value. A `;` inside a quoted string
/// does not separate.
struct Segments<'a> {
    rest: Option<&'a str>,
}

impl<'a> Segments<'a> {
    const fn new(value: &'a str) -> Self {
        Self { rest: Some(value) }
    }
}

impl<'a> Iterator for Segments<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        loop {
            let rest = self.rest?;
            let mut quoted = false;
            let mut escaped = false;
            let cut = rest.char_indices().find_map(|(i, c)| {
                match c {
                    _ if escaped => escaped = false,
                    '\\' if quoted => escaped = true,
                    '"' => quoted = !quoted,
                    ';' if !quoted => return Some(i),
                    _ => {}
                }
                None
            });

            let segment = match cut {
                Some(i) => {
                    self.rest = Some(&rest[i + 1..]);
                    &rest[..i]
                }
                None => {
                    self.rest = None;
                    rest
                }
            };
            let segment = segment.trim();
            if !segment.is_empty() {
                return Some(segment);
            }
        }
    }
}

/// Strips surrounding quotes and resolves backslash escapes inside them.
fn unquote(raw: &str) -> String {
    match raw.strip_prefix('"').and_then(|inner| inner.strip_suffix('"')) {
        Some(inner) => {
            let mut escaped = false;
            inner
                .chars()
                .filter(|&c| {
                    let keep = escaped || c != '\\';
                    escaped = !escaped && c == '\\';
                    keep
                })
                .collect()
        }
        None => raw.to_string(),
    }
}
