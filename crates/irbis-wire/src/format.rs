//! Sanitizer for user-supplied format expressions.
//!
//! Formats travel as a single request line, so end-of-line comments and
//! stray control characters must be removed before they cross the wire.

/// Strips `/* ... end-of-line` comments that occur outside of literals.
///
/// Literals are delimited by `'`, `"` or `|`; a `/*` inside one is data.
/// The line terminator that ends a comment is left in place (the control
/// strip of [`prepare_format`] removes it).
pub fn remove_comments(text: &str) -> String {
    if !text.contains("/*") {
        return text.to_owned();
    }
    let mut result = String::with_capacity(text.len());
    let mut state = '\0';
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if state != '\0' {
            if c == state {
                state = '\0';
            }
            result.push(c);
            continue;
        }
        match c {
            '\'' | '"' | '|' => {
                state = c;
                result.push(c);
            }
            '/' if chars.peek() == Some(&'*') => {
                // Swallow up to, not including, the end of the line.
                while let Some(&next) = chars.peek() {
                    if next == '\r' || next == '\n' {
                        break;
                    }
                    chars.next();
                }
            }
            _ => result.push(c),
        }
    }
    result
}

/// Prepares a format for transmission: comments out, control characters
/// below space out.
pub fn prepare_format(text: &str) -> String {
    remove_comments(text)
        .chars()
        .filter(|&c| c >= ' ')
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_untouched() {
        assert_eq!(prepare_format("v200^a"), "v200^a");
    }

    #[test]
    fn comment_to_end_of_line() {
        assert_eq!(
            prepare_format("v100, '/* not comment', v200, /*comment\r\nv300"),
            "v100, '/* not comment', v200, v300"
        );
    }

    #[test]
    fn comment_inside_literals_kept() {
        assert_eq!(prepare_format("\"/*\" v100"), "\"/*\" v100");
        assert_eq!(prepare_format("|/*| v100"), "|/*| v100");
    }

    #[test]
    fn trailing_comment_without_newline() {
        assert_eq!(prepare_format("v100 /*tail"), "v100 ");
    }

    #[test]
    fn control_characters_stripped() {
        assert_eq!(prepare_format("v100\tv200\x1fv300"), "v100v200v300");
    }
}
