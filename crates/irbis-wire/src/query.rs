//! Outbound request frames.

use crate::command::Command;
use crate::encoding::{to_ansi, to_utf};

/// Builder for one request frame.
///
/// A request is a fixed ten-line header followed by command-specific body
/// lines, each line in the encoding its command contract dictates, the
/// whole body prefixed by its byte length:
///
/// ```text
/// <length>\n
/// <command>\n<workstation>\n<command>\n<client>\n<query>\n<password>\n<user>\n\n\n\n
/// <body lines...>
/// ```
///
/// The `add_*` methods append bytes only; [`new_line`](Self::new_line)
/// terminates the current line, mirroring the line-at-a-time layout of
/// the command contracts.
pub struct ClientQuery {
    buffer: Vec<u8>,
}

impl ClientQuery {
    /// Starts a query with the full header for the given client identity.
    pub fn new(
        command: Command,
        workstation: char,
        client_id: u32,
        query_id: u32,
        username: &str,
        password: &str,
    ) -> Self {
        let mut query = ClientQuery {
            buffer: Vec::with_capacity(256),
        };
        query.add_ansi(command.as_str()).new_line();
        query.add_ansi(&workstation.to_string()).new_line();
        query.add_ansi(command.as_str()).new_line();
        query.add(i64::from(client_id)).new_line();
        query.add(i64::from(query_id)).new_line();
        query.add_ansi(password).new_line();
        query.add_ansi(username).new_line();
        query.new_line();
        query.new_line();
        query.new_line();
        query
    }

    /// Appends text in the legacy encoding.
    pub fn add_ansi(&mut self, text: &str) -> &mut Self {
        self.buffer.extend_from_slice(&to_ansi(text));
        self
    }

    /// Appends text as UTF-8.
    pub fn add_utf(&mut self, text: &str) -> &mut Self {
        self.buffer.extend_from_slice(&to_utf(text));
        self
    }

    /// Appends an integer in its ASCII decimal form.
    pub fn add(&mut self, value: i64) -> &mut Self {
        self.buffer.extend_from_slice(value.to_string().as_bytes());
        self
    }

    /// Appends a boolean as the protocol's `0`/`1`.
    pub fn add_flag(&mut self, value: bool) -> &mut Self {
        self.add(i64::from(value))
    }

    /// Terminates the current line.
    pub fn new_line(&mut self) -> &mut Self {
        self.buffer.push(b'\n');
        self
    }

    /// Bytes accumulated so far, header included.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// True when nothing has been written (never the case after `new`).
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Produces the framed request: the body length line, then the body.
    pub fn encode(&self) -> Vec<u8> {
        let mut packet = Vec::with_capacity(self.buffer.len() + 8);
        packet.extend_from_slice(self.buffer.len().to_string().as_bytes());
        packet.push(b'\n');
        packet.extend_from_slice(&self.buffer);
        packet
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ClientQuery {
        ClientQuery::new(Command::Nop, 'C', 123456, 7, "librarian", "secret")
    }

    #[test]
    fn header_is_ten_lines() {
        let query = sample();
        let body = query.encode();
        let text = String::from_utf8(body).unwrap();
        let (length, rest) = text.split_once('\n').unwrap();
        assert_eq!(length.parse::<usize>().unwrap(), rest.len());
        let lines: Vec<&str> = rest.split('\n').collect();
        assert_eq!(
            &lines[..10],
            &["N", "C", "N", "123456", "7", "secret", "librarian", "", "", ""]
        );
    }

    #[test]
    fn length_prefix_counts_body_bytes() {
        let mut query = sample();
        query.add_utf("Пушкин").new_line();
        let packet = query.encode();
        let newline = packet.iter().position(|&b| b == b'\n').unwrap();
        let announced: usize = std::str::from_utf8(&packet[..newline])
            .unwrap()
            .parse()
            .unwrap();
        assert_eq!(announced, packet.len() - newline - 1);
    }

    #[test]
    fn mixed_encodings_in_one_body() {
        let mut query = sample();
        query.add_ansi("IBIS").new_line();
        query.add_utf("название").new_line();
        // 4 ANSI bytes + newline + 16 UTF-8 bytes + newline on top of the header.
        let header_len = sample().len();
        assert_eq!(query.len(), header_len + 4 + 1 + 16 + 1);
    }
}
