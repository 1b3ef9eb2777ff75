//! A synchronous client for the IRBIS64 library automation server.
//!
//! The entry point is [`Connection`]: configure it (directly or from a
//! `key=value;` connection string), [`connect`](Connection::connect),
//! issue commands, [`disconnect`](Connection::disconnect) (or let `Drop`
//! do it). Every command is one blocking request/response exchange over
//! a fresh TCP connection.
//!
//! ```no_run
//! use irbis::{Connection, OrEmpty};
//!
//! fn main() -> irbis::Result<()> {
//!     let mut client = Connection::new();
//!     client.parse_connection_string("host=srv;user=librarian;pwd=secret;db=IBIS;")?;
//!     client.connect()?;
//!     for mfn in client.search("\"K=rust\"").or_empty() {
//!         let record = client.read_record(mfn)?;
//!         println!("{record}");
//!     }
//!     client.disconnect()?;
//!     Ok(())
//! }
//! ```
//!
//! A connection must not be shared between threads; open one connection
//! per concurrent worker instead.

#![forbid(unsafe_code)]

pub mod connection;
pub mod error;
pub mod workstation;

pub use connection::Connection;
pub use error::{Error, NETWORK_FAILURE, OrEmpty, describe_error};
pub use workstation::Workstation;

pub use irbis_rec::*;
pub use irbis_res::*;
pub use irbis_transport as transport;
pub use irbis_transport::{TcpTransport, Transport};
pub use irbis_wire as wire;

/// Client result type.
pub type Result<T> = std::result::Result<T, crate::Error>;
