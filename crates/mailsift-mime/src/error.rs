//! Parse and decode failures.

/// Result alias for this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Why a header, part or body could not be interpreted.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// `Content-Type` value without a usable `type/subtype`.
    #[error("bad Content-Type {0:?}")]
    InvalidContentType(String),

    /// Malformed quoted-printable data or RFC 2047 encoded word.
    #[error("bad encoding: {0}")]
    InvalidEncoding(String),

    #[error("bad base64: {0}")]
    #[allow(missing_docs)]
    Base64Decode(#[from] base64::DecodeError),

    /// `multipart/*` without a `boundary` parameter.
    #[error("multipart body has no boundary parameter")]
    MissingBoundary,

    /// No part could be found between the delimiters.
    #[error("bad multipart body: {0}")]
    InvalidMultipart(String),
}
