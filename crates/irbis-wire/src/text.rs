//! Protocol delimiters and small text helpers shared across the stack.

/// Two-byte delimiter between record lines on the wire (`0x1F 0x1E`).
pub const IRBIS_DELIMITER: &str = "\x1f\x1e";

/// Single-byte delimiter between record lines packed into one response
/// line (`0x1E`).
pub const SHORT_DELIMITER: &str = "\x1e";

/// Single-byte delimiter for embedded separators inside one response
/// line (`0x1F`).
pub const ALT_DELIMITER: &str = "\x1f";

/// Line delimiter used when exposing server text to callers.
pub const UNIX_DELIMITER: &str = "\n";

/// Terminator line of menus and plain-text record batches.
pub const STOP_MARKER: &str = "*****";

/// Most records a single search page can carry.
pub const MAX_PACKET: u32 = 32758;

/// Server-side format that renders a record back as its own field lines.
pub const ALL_FORMAT: &str = "&uf('+0')";

/// Folds ASCII digits into an unsigned integer.
///
/// The fold is `acc * 10 + (b - 48)`; the call site guarantees the slice
/// holds digits only, anything else produces garbage rather than a panic.
pub fn fast_parse(digits: &[u8]) -> u32 {
    digits.iter().fold(0u32, |acc, &b| {
        acc.wrapping_mul(10).wrapping_add(u32::from(b.wrapping_sub(b'0')))
    })
}

/// Splits server text on [`IRBIS_DELIMITER`] into owned lines.
pub fn irbis_to_lines(text: &str) -> Vec<String> {
    text.split(IRBIS_DELIMITER).map(str::to_owned).collect()
}

/// Joins lines with [`IRBIS_DELIMITER`], the inverse of
/// [`irbis_to_lines`].
pub fn irbis_join(lines: &[String]) -> String {
    lines.join(IRBIS_DELIMITER)
}

/// Replaces [`IRBIS_DELIMITER`] with plain `\n` for caller-facing text.
pub fn irbis_to_unix(text: &str) -> String {
    text.replace(IRBIS_DELIMITER, UNIX_DELIMITER)
}

/// Splits at the first occurrence of `separator`.
///
/// The tail is `None` when the separator is absent; the head is then the
/// whole input. Response lines lean on this for their `prefix#rest`
/// shape.
pub fn split2(text: &str, separator: char) -> (&str, Option<&str>) {
    match text.split_once(separator) {
        Some((head, tail)) => (head, Some(tail)),
        None => (text, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fast_parse_digits() {
        assert_eq!(fast_parse(b"0"), 0);
        assert_eq!(fast_parse(b"123"), 123);
        assert_eq!(fast_parse(b"32758"), 32758);
        assert_eq!(fast_parse(b""), 0);
    }

    #[test]
    fn lines_round_trip() {
        let lines = vec!["200#^aTitle".to_owned(), "0#1".to_owned(), String::new()];
        assert_eq!(irbis_to_lines(&irbis_join(&lines)), lines);
    }

    #[test]
    fn unix_conversion() {
        assert_eq!(irbis_to_unix("one\x1f\x1etwo\x1f\x1e"), "one\ntwo\n");
    }

    #[test]
    fn split2_shapes() {
        assert_eq!(split2("123#45", '#'), ("123", Some("45")));
        assert_eq!(split2("1#2#3", '#'), ("1", Some("2#3")));
        assert_eq!(split2("plain", '#'), ("plain", None));
        assert_eq!(split2("#tail", '#'), ("", Some("tail")));
    }
}
