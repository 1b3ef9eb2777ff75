//! The transport seam of the client.
//!
//! The server expects exactly one request per TCP connection: the client
//! connects, writes the framed query, reads the reply until the server
//! closes the socket, and is done. Sessions therefore hold a transport as
//! a *factory* for exchanges, never as a live socket.
//!
//! The whole seam is the single [`Transport::talk_to_server`] operation,
//! which lets tests substitute an in-memory mock and leaves room for a
//! tunneled implementation without touching the session layer.

#![forbid(unsafe_code)]

use std::io::{Read, Write};
use std::net::TcpStream;
use std::time::Duration;

/// Transport failures, surfaced to the session as the synthetic
/// network-failure code.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("i/o failure: {0}")]
    Io(#[from] std::io::Error),
}

/// One request/response exchange over some medium.
pub trait Transport {
    /// Delivers a framed query and returns the complete reply bytes.
    ///
    /// Implementations open and close whatever resources the exchange
    /// needs; no state survives between calls.
    fn talk_to_server(&mut self, query: &[u8]) -> Result<Vec<u8>, TransportError>;
}

/// Plain blocking TCP: connect, send, read to EOF, close.
#[derive(Debug, Clone)]
pub struct TcpTransport {
    host: String,
    port: u16,
    timeout: Option<Duration>,
}

impl TcpTransport {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        TcpTransport {
            host: host.into(),
            port,
            timeout: None,
        }
    }

    /// Applies a read/write timeout to every exchange.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

impl Transport for TcpTransport {
    fn talk_to_server(&mut self, query: &[u8]) -> Result<Vec<u8>, TransportError> {
        let mut stream = TcpStream::connect((self.host.as_str(), self.port))?;
        stream.set_read_timeout(self.timeout)?;
        stream.set_write_timeout(self.timeout)?;
        log::trace!("sending {} bytes to {}:{}", query.len(), self.host, self.port);
        stream.write_all(query)?;
        let mut answer = Vec::new();
        // The server signals the end of the reply by closing the socket.
        stream.read_to_end(&mut answer)?;
        log::trace!("received {} bytes", answer.len());
        Ok(answer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufRead, BufReader};
    use std::net::TcpListener;

    /// One-shot echo server speaking the length-prefixed framing.
    fn spawn_server(reply: &'static [u8]) -> (u16, std::thread::JoinHandle<Vec<u8>>) {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind test listener");
        let port = listener.local_addr().unwrap().port();
        let handle = std::thread::spawn(move || {
            let (stream, _) = listener.accept().expect("accept");
            let mut reader = BufReader::new(stream);
            let mut length_line = String::new();
            reader.read_line(&mut length_line).expect("length line");
            let length: usize = length_line.trim().parse().expect("numeric length");
            let mut body = vec![0u8; length];
            reader.read_exact(&mut body).expect("body");
            let mut stream = reader.into_inner();
            stream.write_all(reply).expect("reply");
            body
        });
        (port, handle)
    }

    #[test]
    fn exchange_round_trip() {
        let (port, handle) = spawn_server(b"pong");
        let mut transport = TcpTransport::new("127.0.0.1", port);
        let answer = transport.talk_to_server(b"5\nping\n").expect("exchange");
        assert_eq!(answer, b"pong");
        assert_eq!(handle.join().unwrap(), b"ping\n");
    }

    #[test]
    fn refused_connection_is_an_error() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);
        let mut transport = TcpTransport::new("127.0.0.1", port);
        assert!(transport.talk_to_server(b"2\nN\n").is_err());
    }
}
