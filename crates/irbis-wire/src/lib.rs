//! Wire-level plumbing for the IRBIS64 client protocol.
//!
//! The server speaks a text-framed TCP protocol with two character
//! encodings in play at once: a legacy single-byte code page for commands,
//! file names and control lines, and UTF-8 for record bodies and search
//! expressions. This crate owns that boundary: the encoding bridge, the
//! protocol delimiters and line helpers, the outbound [`ClientQuery`]
//! frame builder and the inbound [`ServerResponse`] cursor.

#![forbid(unsafe_code)]

pub mod command;
pub mod encoding;
pub mod format;
pub mod query;
pub mod response;
pub mod text;

pub use command::Command;
pub use encoding::{TextDecoder, from_ansi, from_utf, to_ansi, to_utf};
pub use format::prepare_format;
pub use query::ClientQuery;
pub use response::ServerResponse;
pub use text::*;
