//! Everything that touches the socket: endpoint settings, the TCP/TLS
//! stream, response framing and the state-typed client on top.

mod client;
mod config;
mod framed;
mod stream;

pub use client::{Authenticated, Client, NotAuthenticated, Selected};
pub use config::{Config, Security};
pub use framed::{FramedStream, ResponseAccumulator};
pub use stream::{ImapStream, connect};
