//! MNU menu files: flat code/comment pairs.

use irbis_wire::STOP_MARKER;

/// One menu entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MenuEntry {
    pub code: String,
    pub comment: String,
}

/// A parsed menu.
#[derive(Debug, Clone, Default)]
pub struct MenuFile {
    pub entries: Vec<MenuEntry>,
}

/// Characters trimmed from the end of a code on the relaxed lookup pass.
const CODE_TRAILER: &[char] = &['-', '=', ':'];

impl MenuFile {
    /// Parses menu lines by consuming code/comment pairs; an empty code
    /// or the stop marker ends the menu.
    pub fn parse(lines: &[String]) -> Self {
        let mut result = MenuFile::default();
        let mut pairs = lines.chunks_exact(2);
        for pair in &mut pairs {
            let code = pair[0].trim_end();
            if code.is_empty() || code.starts_with(STOP_MARKER) {
                break;
            }
            result.entries.push(MenuEntry {
                code: code.to_owned(),
                comment: pair[1].trim_end().to_owned(),
            });
        }
        result
    }

    /// Comment lookup: exact code first, then trimmed, then trimmed of
    /// its `-=:` trailer.
    pub fn get_value<'a>(&'a self, code: &str, default: &'a str) -> &'a str {
        let lookup = |wanted: &str| {
            self.entries
                .iter()
                .find(|entry| entry.code == wanted)
                .map(|entry| entry.comment.as_str())
        };
        lookup(code)
            .or_else(|| lookup(code.trim()))
            .or_else(|| lookup(code.trim().trim_end_matches(CODE_TRAILER)))
            .unwrap_or(default)
    }
}

impl std::fmt::Display for MenuFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for entry in &self.entries {
            writeln!(f, "{}", entry.code)?;
            writeln!(f, "{}", entry.comment)?;
        }
        writeln!(f, "{STOP_MARKER}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parse_stops_at_marker() {
        let menu = MenuFile::parse(&lines(&[
            "a", "The first comment", "b-", "The second comment", "*****", "ignored",
        ]));
        assert_eq!(menu.entries.len(), 2);
        assert_eq!(menu.entries[0].code, "a");
        assert_eq!(menu.entries[1].comment, "The second comment");
    }

    #[test]
    fn parse_stops_at_empty_code() {
        let menu = MenuFile::parse(&lines(&["a", "comment", "", "tail"]));
        assert_eq!(menu.entries.len(), 1);
    }

    #[test]
    fn lookup_relaxes_progressively() {
        let menu = MenuFile::parse(&lines(&["IBIS-", "Catalog", "*****"]));
        assert_eq!(menu.get_value("IBIS-", ""), "Catalog");
        assert_eq!(menu.get_value(" IBIS- ", ""), "Catalog");
        assert_eq!(menu.get_value("IBIS", ""), "");
        let menu = MenuFile::parse(&lines(&["RDR", "Readers", "*****"]));
        assert_eq!(menu.get_value("RDR=", ""), "Readers");
        assert_eq!(menu.get_value("NONE", "fallback"), "fallback");
    }
}
