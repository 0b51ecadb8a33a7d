//! Sans-I/O parser for server responses.
//!
//! - **Lexer**: turns raw bytes into tokens (atoms, strings, literals, numbers)
//! - **Response parser**: builds [`Response`] values from tokens
//!
//! # Example
//!
//! ```
//! use mailsift_imap::parser::{Response, ResponseParser, UntaggedResponse};
//!
//! let response = ResponseParser::parse(b"* 4 EXISTS\r\n").unwrap();
//! assert_eq!(response, Response::Untagged(UntaggedResponse::Exists(4)));
//! ```

pub mod lexer;
pub mod response;

pub use lexer::{Lexer, Token};
pub use response::{Address, Envelope, FetchItem, Response, ResponseParser, UntaggedResponse};
