//! # mailsift-mime
//!
//! MIME parsing for messages fetched as raw RFC 5322 bytes.
//!
//! ## Scope
//!
//! - **Message parsing**: header/body split, top-level multipart splitting
//! - **Transfer decoding**: Base64 and Quoted-Printable
//! - **Header decoding**: RFC 2047 encoded words
//! - **Charsets**: every WHATWG encoding label, via `encoding_rs`
//!
//! ## Example
//!
//! ```ignore
//! use mailsift_mime::{Body, Message};
//!
//! let message = Message::parse(raw_bytes)?;
//! if let Body::Multipart(parts) = &message.body
//!     && let Some(first) = parts.first()
//! {
//!     if first.content_type()?.is_text_plain() {
//!         println!("{}", first.body_text()?);
//!     }
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod content_type;
mod error;
mod header;
mod message;

pub mod encoding;

pub use content_type::ContentType;
pub use error::{Error, Result};
pub use header::Headers;
pub use message::{Body, Message, Part, TransferEncoding};
