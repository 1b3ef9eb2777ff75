//! Inbound response frames.

use crate::encoding::{from_ansi, from_utf};

/// Pull cursor over one server reply.
///
/// A reply opens with a ten-line header (command echo, client and query
/// identifiers, answer size, server version, interval, four reserved
/// lines), which the constructor consumes eagerly. Everything after it is
/// read on demand, one line at a time, in whichever encoding the command
/// contract dictates for that line.
///
/// Lines are terminated by `\r` (an immediately following `\n` is
/// swallowed) or by a bare `\n`; the header of some replies uses plain
/// `\n` while bodies use `\r\n`.
pub struct ServerResponse {
    buffer: Vec<u8>,
    offset: usize,
    ok: bool,
    /// Echo of the request command.
    pub command: String,
    /// Echo of the client identifier.
    pub client_id: u32,
    /// Echo of the query sequence number.
    pub query_id: u32,
    /// Size of the answer as announced by the server.
    pub answer_size: i32,
    /// Server version, meaningful on registration replies.
    pub server_version: String,
    /// Suggested keep-alive interval in minutes, meaningful on
    /// registration replies.
    pub interval: i32,
    /// Last return code obtained via [`get_return_code`](Self::get_return_code).
    pub return_code: i32,
}

impl ServerResponse {
    /// Wraps received bytes and consumes the reply header.
    pub fn from_bytes(buffer: Vec<u8>) -> Self {
        let ok = !buffer.is_empty();
        let mut response = ServerResponse {
            buffer,
            offset: 0,
            ok,
            command: String::new(),
            client_id: 0,
            query_id: 0,
            answer_size: 0,
            server_version: String::new(),
            interval: 0,
            return_code: 0,
        };
        if ok {
            response.command = response.read_ansi();
            response.client_id = response.read_integer() as u32;
            response.query_id = response.read_integer() as u32;
            response.answer_size = response.read_integer();
            response.server_version = response.read_ansi();
            response.interval = response.read_integer();
            for _ in 0..4 {
                response.get_line();
            }
        }
        response
    }

    /// A reply that carries nothing, produced on transport failure.
    pub fn empty() -> Self {
        Self::from_bytes(Vec::new())
    }

    /// Whether any bytes were received at all.
    pub fn ok(&self) -> bool {
        self.ok
    }

    /// Whether the cursor is past the last byte.
    pub fn eof(&self) -> bool {
        self.offset >= self.buffer.len()
    }

    /// Raw bytes of the next line; empty at end of input.
    pub fn get_line(&mut self) -> &[u8] {
        let start = self.offset;
        let mut end = start;
        while end < self.buffer.len() {
            match self.buffer[end] {
                b'\r' => {
                    self.offset = end + 1;
                    if self.buffer.get(self.offset) == Some(&b'\n') {
                        self.offset += 1;
                    }
                    return &self.buffer[start..end];
                }
                b'\n' => {
                    self.offset = end + 1;
                    return &self.buffer[start..end];
                }
                _ => end += 1,
            }
        }
        self.offset = end;
        &self.buffer[start..end]
    }

    /// Next line decoded from the legacy encoding.
    pub fn read_ansi(&mut self) -> String {
        let line = self.get_line();
        from_ansi(line)
    }

    /// Next line decoded as UTF-8.
    pub fn read_utf(&mut self) -> String {
        let line = self.get_line();
        from_utf(line)
    }

    /// Next line parsed as a signed decimal integer.
    ///
    /// An empty or non-numeric line yields 0; the reader stays tolerant
    /// and leaves strictness to the call site.
    pub fn read_integer(&mut self) -> i32 {
        let line = self.get_line();
        let text = std::str::from_utf8(line).unwrap_or("");
        text.trim().parse().unwrap_or(0)
    }

    /// All remaining lines in the legacy encoding.
    pub fn read_remaining_ansi_lines(&mut self) -> Vec<String> {
        let mut lines = Vec::new();
        while !self.eof() {
            lines.push(self.read_ansi());
        }
        lines
    }

    /// All remaining lines as UTF-8.
    pub fn read_remaining_utf_lines(&mut self) -> Vec<String> {
        let mut lines = Vec::new();
        while !self.eof() {
            lines.push(self.read_utf());
        }
        lines
    }

    /// Everything left, decoded from the legacy encoding in one piece.
    pub fn read_remaining_ansi_text(&mut self) -> String {
        let text = from_ansi(&self.buffer[self.offset..]);
        self.offset = self.buffer.len();
        text
    }

    /// Everything left, decoded as UTF-8 in one piece.
    pub fn read_remaining_utf_text(&mut self) -> String {
        let text = from_utf(&self.buffer[self.offset..]);
        self.offset = self.buffer.len();
        text
    }

    /// Reads the return-code line and remembers it.
    pub fn get_return_code(&mut self) -> i32 {
        self.return_code = self.read_integer();
        self.return_code
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reply(body: &str) -> ServerResponse {
        let mut bytes = b"K\n123\n7\n12\n64.2014\n10\n\n\n\n\n".to_vec();
        bytes.extend_from_slice(body.as_bytes());
        ServerResponse::from_bytes(bytes)
    }

    #[test]
    fn header_is_consumed() {
        let response = reply("");
        assert!(response.ok());
        assert_eq!(response.command, "K");
        assert_eq!(response.client_id, 123);
        assert_eq!(response.query_id, 7);
        assert_eq!(response.answer_size, 12);
        assert_eq!(response.server_version, "64.2014");
        assert_eq!(response.interval, 10);
        assert!(response.eof());
    }

    #[test]
    fn crlf_and_bare_terminators() {
        let mut response = reply("first\r\nsecond\rthird\nlast");
        assert_eq!(response.read_utf(), "first");
        assert_eq!(response.read_utf(), "second");
        assert_eq!(response.read_utf(), "third");
        assert_eq!(response.read_utf(), "last");
        assert!(response.eof());
        assert_eq!(response.get_line(), b"");
    }

    #[test]
    fn integers_tolerate_garbage() {
        let mut response = reply("-603\r\n\r\nnot a number\r\n");
        assert_eq!(response.read_integer(), -603);
        assert_eq!(response.read_integer(), 0);
        assert_eq!(response.read_integer(), 0);
    }

    #[test]
    fn return_code_is_remembered() {
        let mut response = reply("-3337\r\n");
        assert_eq!(response.get_return_code(), -3337);
        assert_eq!(response.return_code, -3337);
    }

    #[test]
    fn remaining_lines_and_text() {
        let mut response = reply("0\r\none\r\ntwo\r\n");
        response.get_return_code();
        assert_eq!(response.read_remaining_utf_lines(), vec!["one", "two"]);

        let mut response = reply("раз\r\nдва");
        assert_eq!(response.read_remaining_utf_text(), "раз\r\nдва");
        assert!(response.eof());
    }

    #[test]
    fn empty_response_is_not_ok() {
        let response = ServerResponse::empty();
        assert!(!response.ok());
        assert!(response.eof());
    }
}
