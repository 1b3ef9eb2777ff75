//! Parameter records for search, term and table requests.

use irbis_wire::{fast_parse, split2};

/// Parameters of an extended search request.
#[derive(Debug, Clone)]
pub struct SearchParameters {
    /// Database to search; empty means the session default.
    pub database: String,
    /// Search expression in the inverted-index language.
    pub expression: String,
    /// One-based index of the first record to return.
    pub first_record: u32,
    /// Number of records to return, 0 for the server page maximum.
    pub number_of_records: u32,
    /// Optional format applied to each found record.
    pub format: String,
    /// Lower MFN bound for sequential filtering, 0 for none.
    pub min_mfn: u32,
    /// Upper MFN bound for sequential filtering, 0 for none.
    pub max_mfn: u32,
    /// Optional sequential-search expression over the bounded range.
    pub sequential: String,
}

impl Default for SearchParameters {
    fn default() -> Self {
        SearchParameters {
            database: String::new(),
            expression: String::new(),
            first_record: 1,
            number_of_records: 0,
            format: String::new(),
            min_mfn: 0,
            max_mfn: 0,
            sequential: String::new(),
        }
    }
}

impl SearchParameters {
    pub fn with_expression(expression: impl Into<String>) -> Self {
        SearchParameters {
            expression: expression.into(),
            ..Default::default()
        }
    }
}

/// One line of a search reply: an MFN with an optional formatted tail.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FoundLine {
    pub mfn: u32,
    pub description: String,
}

impl FoundLine {
    /// Parses `mfn#description`; the description may be absent.
    pub fn parse(line: &str) -> Self {
        let (mfn, description) = split2(line, '#');
        FoundLine {
            mfn: fast_parse(mfn.as_bytes()),
            description: description.unwrap_or("").to_owned(),
        }
    }
}

/// Parameters of a term-read request.
#[derive(Debug, Clone)]
pub struct TermParameters {
    /// Database to read; empty means the session default.
    pub database: String,
    /// Term to start from.
    pub start_term: String,
    /// Number of terms to return.
    pub number_of_terms: u32,
    /// Walk the dictionary backward instead of forward.
    pub reverse_order: bool,
    /// Optional format applied to each term.
    pub format: String,
}

impl Default for TermParameters {
    fn default() -> Self {
        TermParameters {
            database: String::new(),
            start_term: String::new(),
            number_of_terms: 100,
            reverse_order: false,
            format: String::new(),
        }
    }
}

/// One dictionary term with its posting count.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TermInfo {
    /// Number of postings under the term.
    pub count: u32,
    /// Term text.
    pub text: String,
}

impl TermInfo {
    /// Parses one `count#text` line.
    pub fn parse_line(line: &str) -> Self {
        let (count, text) = split2(line, '#');
        TermInfo {
            count: fast_parse(count.as_bytes()),
            text: text.unwrap_or("").to_owned(),
        }
    }

    /// Parses a term-reply body, dropping empty lines.
    pub fn parse(lines: &[String]) -> Vec<Self> {
        lines
            .iter()
            .filter(|line| !line.is_empty())
            .map(|line| Self::parse_line(line))
            .collect()
    }
}

impl std::fmt::Display for TermInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}#{}", self.count, self.text)
    }
}

/// Parameters of a posting-read request.
#[derive(Debug, Clone)]
pub struct PostingParameters {
    /// Database to read; empty means the session default.
    pub database: String,
    /// One-based index of the first posting.
    pub first_posting: u32,
    /// Number of postings to return.
    pub number_of_postings: u32,
    /// Optional format applied to each posting.
    pub format: String,
    /// Terms to read postings for.
    pub terms: Vec<String>,
}

impl Default for PostingParameters {
    fn default() -> Self {
        PostingParameters {
            database: String::new(),
            first_posting: 1,
            number_of_postings: 100,
            format: String::new(),
            terms: Vec::new(),
        }
    }
}

/// One posting of a term.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TermPosting {
    pub mfn: u32,
    pub tag: u32,
    pub occurrence: u32,
    pub count: u32,
    /// Formatted text, present when the request carried a format.
    pub text: String,
}

impl TermPosting {
    /// Parses one `mfn#tag#occurrence#count#text` line.
    pub fn parse_line(line: &str) -> Self {
        let mut parts = line.splitn(5, '#');
        let mut number = || fast_parse(parts.next().unwrap_or("").as_bytes());
        let mfn = number();
        let tag = number();
        let occurrence = number();
        let count = number();
        TermPosting {
            mfn,
            tag,
            occurrence,
            count,
            text: parts.next().unwrap_or("").to_owned(),
        }
    }

    /// Parses a posting-reply body, dropping empty lines.
    pub fn parse(lines: &[String]) -> Vec<Self> {
        lines
            .iter()
            .filter(|line| !line.is_empty())
            .map(|line| Self::parse_line(line))
            .collect()
    }
}

/// Parameters of a table-rendering request.
#[derive(Debug, Clone, Default)]
pub struct TableDefinition {
    /// Database to render from; empty means the session default.
    pub database: String,
    /// Table file name.
    pub table: String,
    /// Mode line, server-defined.
    pub mode: String,
    /// Search expression selecting the record set.
    pub search_query: String,
    /// Lower MFN bound, 0 for none.
    pub min_mfn: u32,
    /// Upper MFN bound, 0 for none.
    pub max_mfn: u32,
    /// Optional sequential-search expression.
    pub sequential_query: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn found_line_parses() {
        assert_eq!(
            FoundLine::parse("42#Title text"),
            FoundLine {
                mfn: 42,
                description: "Title text".into()
            }
        );
        assert_eq!(FoundLine::parse("17").mfn, 17);
        assert!(FoundLine::parse("17").description.is_empty());
    }

    #[test]
    fn term_info_parses() {
        let terms = TermInfo::parse(&[
            "5#K=АЛГЕБРА".to_string(),
            String::new(),
            "12#K=АЛГОРИТМ".to_string(),
        ]);
        assert_eq!(terms.len(), 2);
        assert_eq!(terms[0].count, 5);
        assert_eq!(terms[0].text, "K=АЛГЕБРА");
        assert_eq!(terms[1].to_string(), "12#K=АЛГОРИТМ");
    }

    #[test]
    fn posting_parses_with_and_without_text() {
        let posting = TermPosting::parse_line("42#200#1#3#The title");
        assert_eq!(
            (posting.mfn, posting.tag, posting.occurrence, posting.count),
            (42, 200, 1, 3)
        );
        assert_eq!(posting.text, "The title");
        let bare = TermPosting::parse_line("42#200#1#3");
        assert!(bare.text.is_empty());
    }

    #[test]
    fn search_parameters_default_to_first_page() {
        let parameters = SearchParameters::with_expression("K=test");
        assert_eq!(parameters.first_record, 1);
        assert_eq!(parameters.number_of_records, 0);
        assert_eq!(parameters.expression, "K=test");
    }
}
