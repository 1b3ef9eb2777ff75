//! Records with their field lines left unparsed.

use crate::record::RecordStatus;
use irbis_wire::{fast_parse, split2};

/// A record whose fields are kept as raw protocol lines.
///
/// Used for passthrough edits where only the header matters, such as
/// flipping the deletion bit without touching field content.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRecord {
    /// Name of the owning database.
    pub database: String,
    /// Masterfile number.
    pub mfn: u32,
    /// Version counter maintained by the server.
    pub version: u32,
    /// Status bits.
    pub status: RecordStatus,
    /// Field lines exactly as received, `tag#body` each.
    pub fields: Vec<String>,
}

impl RawRecord {
    /// Whether either deletion bit is set.
    pub fn is_deleted(&self) -> bool {
        self.status.is_deleted()
    }

    /// Serializes the record, terminating every line with `delimiter`.
    pub fn encode(&self, delimiter: &str) -> String {
        let mut result = String::new();
        result.push_str(&format!("{}#{}{}", self.mfn, self.status.bits(), delimiter));
        result.push_str(&format!("0#{}{}", self.version, delimiter));
        for field in &self.fields {
            result.push_str(field);
            result.push_str(delimiter);
        }
        result
    }

    /// Rebuilds the record from protocol lines; previous fields are
    /// discarded.
    pub fn decode(&mut self, lines: &[String]) {
        self.fields.clear();
        if lines.len() < 2 {
            return;
        }
        let (mfn, status) = split2(&lines[0], '#');
        self.mfn = fast_parse(mfn.as_bytes());
        self.status =
            RecordStatus::from_bits_truncate(fast_parse(status.unwrap_or("0").as_bytes()));
        let (_, version) = split2(&lines[1], '#');
        self.version = fast_parse(version.unwrap_or("0").as_bytes());
        for line in &lines[2..] {
            if !line.is_empty() {
                self.fields.push(line.clone());
            }
        }
    }
}

impl std::fmt::Display for RawRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.encode("\n"))
    }
}
