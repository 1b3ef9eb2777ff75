//! Global-correction settings and their transport encoding.

use irbis_wire::IRBIS_DELIMITER;

/// One correction statement.
///
/// The statement language itself is server-side; the client only carries
/// the five statement lines verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GblStatement {
    /// Operation, e.g. `ADD`, `DEL`, `REP`, `CHA`.
    pub command: String,
    pub parameter1: String,
    pub parameter2: String,
    pub format1: String,
    pub format2: String,
}

impl GblStatement {
    /// Serializes the statement, each line closed by the record
    /// delimiter.
    pub fn encode(&self) -> String {
        format!(
            "{}{d}{}{d}{}{d}{}{d}{}{d}",
            self.command,
            self.parameter1,
            self.parameter2,
            self.format1,
            self.format2,
            d = IRBIS_DELIMITER
        )
    }
}

/// Settings of one global-correction run.
#[derive(Debug, Clone, Default)]
pub struct GblSettings {
    /// Database to correct; empty means the session default.
    pub database: String,
    /// Rebuild index entries for corrected records.
    pub actualize: bool,
    /// Run the server-side autoin file after correction.
    pub autoin: bool,
    /// Apply formal control checks.
    pub formal_control: bool,
    /// Server-side correction file; when set, `statements` is ignored.
    pub filename: String,
    /// Statements to run when no file is named.
    pub statements: Vec<GblStatement>,
    /// Search expression selecting the record set.
    pub search_expression: String,
    /// One-based index of the first record.
    pub first_record: u32,
    /// Number of records to process, 0 for all.
    pub number_of_records: u32,
    /// Explicit MFN list; when empty the `min_mfn..=max_mfn` range is
    /// expanded instead.
    pub mfn_list: Vec<u32>,
    /// Lower bound of the implicit range.
    pub min_mfn: u32,
    /// Upper bound of the implicit range.
    pub max_mfn: u32,
}

impl GblSettings {
    /// The statement block as transmitted: a `!0` marker line, then the
    /// statements, every line closed by the record delimiter.
    pub fn encode_statements(&self) -> String {
        let mut result = String::from("!0");
        result.push_str(IRBIS_DELIMITER);
        for statement in &self.statements {
            result.push_str(&statement.encode());
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statement_encoding() {
        let statement = GblStatement {
            command: "ADD".into(),
            parameter1: "300".into(),
            parameter2: "*".into(),
            format1: "'note'".into(),
            format2: "XXXXX".into(),
        };
        assert_eq!(
            statement.encode(),
            "ADD\x1f\x1e300\x1f\x1e*\x1f\x1e'note'\x1f\x1eXXXXX\x1f\x1e"
        );
    }

    #[test]
    fn block_opens_with_marker() {
        let settings = GblSettings {
            statements: vec![GblStatement {
                command: "DEL".into(),
                parameter1: "910".into(),
                ..Default::default()
            }],
            ..Default::default()
        };
        let block = settings.encode_statements();
        assert!(block.starts_with("!0\x1f\x1eDEL\x1f\x1e910\x1f\x1e"));
        assert!(block.ends_with(IRBIS_DELIMITER));
    }
}
