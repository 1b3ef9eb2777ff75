//! Parsed records and their status word.

use crate::field::RecordField;
use bitflags::bitflags;
use irbis_wire::{STOP_MARKER, fast_parse, split2};

bitflags! {
    /// Status bits of a master-file record.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
    pub struct RecordStatus: u32 {
        /// Marked deleted, still present in the master file.
        const LOGICALLY_DELETED = 1;
        /// Removed from the master file.
        const PHYSICALLY_DELETED = 2;
        /// Absent.
        const ABSENT = 4;
        /// Not yet reflected in the inverted index.
        const NON_ACTUALIZED = 8;
        /// The newest version of the record.
        const LAST_VERSION = 32;
        /// Locked for editing.
        const LOCKED = 64;
    }
}

impl RecordStatus {
    /// Deleted in either sense, logically or physically.
    pub fn is_deleted(self) -> bool {
        self.intersects(Self::LOGICALLY_DELETED | Self::PHYSICALLY_DELETED)
    }
}

/// A fully parsed master-file record.
///
/// A record is *unbound* while `database` is empty and `mfn`, `status`
/// and `version` are zero; fields may already be populated. Reading or
/// writing binds it to a database.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    /// Name of the owning database, empty for unbound records.
    pub database: String,
    /// Masterfile number, 0 for unbound records.
    pub mfn: u32,
    /// Version counter maintained by the server.
    pub version: u32,
    /// Status bits.
    pub status: RecordStatus,
    /// Fields in wire order.
    pub fields: Vec<RecordField>,
}

impl Record {
    pub fn new() -> Self {
        Record::default()
    }

    /// Appends an empty field and hands it out for chained assembly.
    pub fn add(&mut self, tag: u32) -> &mut RecordField {
        self.fields.push(RecordField::new(tag));
        self.fields.last_mut().expect("just pushed")
    }

    /// Appends a fixed field in one call.
    pub fn add_value(&mut self, tag: u32, value: impl Into<String>) -> &mut Self {
        self.fields.push(RecordField::with_value(tag, value));
        self
    }

    /// Drops all fields, keeping the binding.
    pub fn clear(&mut self) -> &mut Self {
        self.fields.clear();
        self
    }

    /// Unbinds the record so it can be written into another database.
    ///
    /// Fields are kept.
    pub fn reset(&mut self) -> &mut Self {
        self.database.clear();
        self.mfn = 0;
        self.version = 0;
        self.status = RecordStatus::default();
        self
    }

    /// Whether either deletion bit is set.
    pub fn is_deleted(&self) -> bool {
        self.status.is_deleted()
    }

    /// All fields carrying the given tag.
    pub fn fields_with_tag(&self, tag: u32) -> impl Iterator<Item = &RecordField> {
        self.fields.iter().filter(move |field| field.tag == tag)
    }

    /// First field carrying the given tag.
    pub fn first_field(&self, tag: u32) -> Option<&RecordField> {
        self.fields.iter().find(|field| field.tag == tag)
    }

    /// Value of the first field with the given tag.
    pub fn first_value(&self, tag: u32) -> Option<&str> {
        self.first_field(tag).map(|field| field.value.as_str())
    }

    /// Value of the first `code` subfield in the first `tag` field.
    pub fn first_subfield_value(&self, tag: u32, code: char) -> Option<&str> {
        self.first_field(tag)
            .and_then(|field| field.get_first_subfield_value(code))
    }

    /// Values of all `tag` fields.
    pub fn all_values(&self, tag: u32) -> Vec<&str> {
        self.fields_with_tag(tag)
            .map(|field| field.value.as_str())
            .collect()
    }

    /// Values of all `code` subfields across all `tag` fields.
    pub fn all_subfield_values(&self, tag: u32, code: char) -> Vec<&str> {
        self.fields_with_tag(tag)
            .flat_map(|field| {
                field
                    .subfields
                    .iter()
                    .filter(move |sf| sf.code == code)
                    .map(|sf| sf.value.as_str())
            })
            .collect()
    }

    /// Serializes the record, terminating every line with `delimiter`.
    ///
    /// The wire form uses the two-byte record delimiter; human-facing
    /// output uses `\n`.
    pub fn encode(&self, delimiter: &str) -> String {
        let mut result = String::new();
        result.push_str(&format!("{}#{}{}", self.mfn, self.status.bits(), delimiter));
        result.push_str(&format!("0#{}{}", self.version, delimiter));
        for field in &self.fields {
            result.push_str(&field.to_string());
            result.push_str(delimiter);
        }
        result
    }

    /// Rebuilds the record from protocol lines.
    ///
    /// The first line is `mfn#status`, the second `0#version`, each
    /// further non-empty line one field. Previous fields are discarded.
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
                self.fields.push(RecordField::decode(line));
            }
        }
    }

    /// Renders the record for a plain-text batch export: one field per
    /// line, closed by the stop marker.
    pub fn to_plain_text(&self) -> String {
        let mut result = String::new();
        for field in &self.fields {
            result.push_str(&field.to_string());
            result.push('\n');
        }
        result.push_str(STOP_MARKER);
        result.push('\n');
        result
    }

    /// Reads a plain-text batch back: `tag#body` lines per record, each
    /// record closed by the stop marker.
    ///
    /// The records come back unbound (no MFN, status or version; the
    /// batch format does not carry them). A trailing record without its
    /// marker is kept, empty lines are skipped.
    pub fn parse_plain_text(lines: &[String]) -> Vec<Record> {
        let mut result = Vec::new();
        let mut record = Record::new();
        for line in lines {
            let line = line.trim_end();
            if line.is_empty() {
                continue;
            }
            if line.starts_with(STOP_MARKER) {
                if !record.fields.is_empty() {
                    result.push(std::mem::take(&mut record));
                }
                continue;
            }
            record.fields.push(RecordField::decode(line));
        }
        if !record.fields.is_empty() {
            result.push(record);
        }
        result
    }
}

impl std::fmt::Display for Record {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.encode("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use irbis_wire::{IRBIS_DELIMITER, irbis_to_lines};
    use pretty_assertions::assert_eq;

    fn lines(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn decode_parses_header_and_fields() {
        let mut record = Record::new();
        record.decode(&lines(&[
            "42#0",
            "0#1",
            "200#^aHello^eWorld",
            "700#^aMironov",
            "",
        ]));
        assert_eq!(record.mfn, 42);
        assert_eq!(record.status, RecordStatus::default());
        assert_eq!(record.version, 1);
        assert_eq!(record.fields.len(), 2);
        assert_eq!(record.first_subfield_value(200, 'a'), Some("Hello"));
        assert_eq!(record.first_subfield_value(200, 'e'), Some("World"));
        assert_eq!(record.first_subfield_value(700, 'a'), Some("Mironov"));
    }

    #[test]
    fn encode_decode_round_trip() {
        let mut record = Record::new();
        record.mfn = 8;
        record.version = 2;
        record.add(700).add('a', "Миронов").add('b', "А. В.");
        record.add(200).add('a', "Работа с ИРБИС64");
        let encoded = record.encode(IRBIS_DELIMITER);
        let mut decoded = Record::new();
        decoded.decode(&irbis_to_lines(&encoded));
        assert_eq!(decoded, record);
    }

    #[test]
    fn status_drives_deleted() {
        let mut record = Record::new();
        assert!(!record.is_deleted());
        record.status = RecordStatus::LOGICALLY_DELETED;
        assert!(record.is_deleted());
        record.status = RecordStatus::PHYSICALLY_DELETED | RecordStatus::LAST_VERSION;
        assert!(record.is_deleted());
        record.status = RecordStatus::LOCKED;
        assert!(!record.is_deleted());
    }

    #[test]
    fn reset_unbinds_but_keeps_fields() {
        let mut record = Record::new();
        record.database = "IBIS".into();
        record.mfn = 5;
        record.version = 3;
        record.status = RecordStatus::LAST_VERSION;
        record.add_value(100, "x");
        record.reset();
        assert!(record.database.is_empty());
        assert_eq!(record.mfn, 0);
        assert_eq!(record.version, 0);
        assert_eq!(record.status, RecordStatus::default());
        assert_eq!(record.fields.len(), 1);
    }

    #[test]
    fn plain_text_export() {
        let mut record = Record::new();
        record.add_value(100, "value");
        record.add(200).add('a', "Title");
        assert_eq!(record.to_plain_text(), "100#value\n200#^aTitle\n*****\n");
    }

    #[test]
    fn plain_text_round_trip() {
        let mut first = Record::new();
        first.add_value(100, "value");
        first.add(200).add('a', "Title");
        let mut second = Record::new();
        second.add(700).add('a', "Миронов");

        let batch = format!("{}{}", first.to_plain_text(), second.to_plain_text());
        let batch_lines: Vec<String> = batch.lines().map(str::to_owned).collect();
        let parsed = Record::parse_plain_text(&batch_lines);
        assert_eq!(parsed, vec![first, second]);
    }

    #[test]
    fn plain_text_import_keeps_unterminated_tail() {
        let parsed = Record::parse_plain_text(&lines(&[
            "100#value",
            "*****",
            "",
            "200#^aLoose tail",
        ]));
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].first_value(100), Some("value"));
        assert_eq!(parsed[1].first_subfield_value(200, 'a'), Some("Loose tail"));
    }

    #[test]
    fn lookup_helpers() {
        let mut record = Record::new();
        record.add_value(300, "first note");
        record.add_value(300, "second note");
        record.add(910).add('a', "0").add('b', "1");
        record.add(910).add('a', "2");
        assert_eq!(record.all_values(300), vec!["first note", "second note"]);
        assert_eq!(record.all_subfield_values(910, 'a'), vec!["0", "2"]);
        assert_eq!(record.first_value(300), Some("first note"));
        assert_eq!(record.first_value(999), None);
    }
}
