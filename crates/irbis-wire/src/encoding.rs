//! The two text encodings of the protocol.
//!
//! Every request and response line carries exactly one of them: the
//! single-byte "ANSI" code page (Windows-1251) for commands, file names,
//! menus and control lines, or UTF-8 for bibliographic data, search
//! expressions and formatted output. Which one applies is a per-line
//! contract of each command, so the conversions are exposed as separate
//! function pairs rather than a single parameterized one.

use encoding_rs::WINDOWS_1251;

/// A byte-slice decoder, either [`from_ansi`] or [`from_utf`].
///
/// Readers that accept caller-chosen encodings (such as the ISO-2709
/// record reader) take one of these instead of a flag.
pub type TextDecoder = fn(&[u8]) -> String;

/// Encodes text into the legacy single-byte code page.
///
/// Characters outside the code page are substituted, matching the
/// tolerant posture of the protocol.
pub fn to_ansi(text: &str) -> Vec<u8> {
    WINDOWS_1251.encode(text).0.into_owned()
}

/// Decodes legacy single-byte bytes into text.
pub fn from_ansi(bytes: &[u8]) -> String {
    WINDOWS_1251.decode(bytes).0.into_owned()
}

/// Encodes text as UTF-8.
pub fn to_utf(text: &str) -> Vec<u8> {
    text.as_bytes().to_vec()
}

/// Decodes UTF-8 bytes into text, lossily.
pub fn from_utf(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ansi_round_trip() {
        let text = "Работа с ИРБИС64";
        assert_eq!(from_ansi(&to_ansi(text)), text);
    }

    #[test]
    fn ansi_is_single_byte() {
        assert_eq!(to_ansi("Миронов").len(), 7);
    }

    #[test]
    fn utf_round_trip() {
        let text = "поиск: \"заглавие\"";
        assert_eq!(from_utf(&to_utf(text)), text);
    }

    #[test]
    fn ascii_is_identical_in_both() {
        let text = "A, 6666, IBIS";
        assert_eq!(to_ansi(text), to_utf(text));
    }
}
