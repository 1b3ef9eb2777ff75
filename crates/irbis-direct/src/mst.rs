//! The master (`.mst`) file: control record, record leaders, dictionary
//! entries and field slices.

use crate::DirectError;
use binrw::BinRead;
use irbis_rec::{Record, RecordField, RecordStatus};
use std::fs::File;
use std::io::{Cursor, Read, Seek, SeekFrom};
use std::path::Path;

/// Width of the record leader in bytes.
pub const MST_LEADER_SIZE: usize = 32;

/// The control record at offset 0 of the master file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, BinRead)]
#[br(big)]
pub struct MstControlRecord {
    /// Reserved control MFN.
    pub ctl_mfn: u32,
    /// MFN the next created record will get.
    pub next_mfn: u32,
    /// Low half of the next free offset.
    pub next_position_low: u32,
    /// High half of the next free offset.
    pub next_position_high: u32,
    /// Master-file type marker.
    pub mft_type: u32,
    /// Record count.
    pub rec_cnt: u32,
    pub reserv1: u32,
    pub reserv2: u32,
    /// Non-zero while the database is locked.
    pub blocked: u32,
}

impl MstControlRecord {
    /// Offset where the next record will be written.
    pub fn next_position(&self) -> u64 {
        (u64::from(self.next_position_high) << 32) | u64::from(self.next_position_low)
    }
}

/// Leader of one stored record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, BinRead)]
#[br(big)]
pub struct MstRecordLeader {
    /// MFN of the record.
    pub mfn: u32,
    /// Total length of the stored record, leader included.
    pub length: u32,
    /// Low half of the previous-version offset.
    pub previous_low: u32,
    /// High half of the previous-version offset.
    pub previous_high: u32,
    /// Offset of the field data from the record start.
    pub base: u32,
    /// Number of dictionary entries (and fields).
    pub nvf: u32,
    /// Version counter.
    pub version: u32,
    /// Record status bits.
    pub status: u32,
}

impl MstRecordLeader {
    /// Offset of the previous version of the record, 0 for none.
    pub fn previous_offset(&self) -> u64 {
        (u64::from(self.previous_high) << 32) | u64::from(self.previous_low)
    }
}

/// One dictionary entry: which tag lives where inside the record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, BinRead)]
#[br(big)]
pub struct MstDictionaryEntry {
    pub tag: u32,
    /// Offset of the field body from the data base.
    pub position: u32,
    /// Length of the field body in bytes.
    pub length: u32,
}

/// One stored field: tag plus its raw body text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MstField {
    pub tag: u32,
    pub text: String,
}

/// One stored record.
#[derive(Debug, Clone, Default)]
pub struct MstRecord {
    pub leader: MstRecordLeader,
    pub dictionary: Vec<MstDictionaryEntry>,
    pub fields: Vec<MstField>,
}

impl MstRecord {
    /// Converts the stored shape to the session-level record model.
    pub fn to_record(&self) -> Record {
        let mut record = Record::new();
        record.mfn = self.leader.mfn;
        record.version = self.leader.version;
        record.status = RecordStatus::from_bits_truncate(self.leader.status);
        for field in &self.fields {
            let mut parsed = RecordField::new(field.tag);
            parsed.decode_body(&field.text);
            record.fields.push(parsed);
        }
        record
    }
}

/// An open master file.
#[derive(Debug)]
pub struct MstFile {
    file: File,
    /// Control record read at open time.
    pub control: MstControlRecord,
}

impl MstFile {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, DirectError> {
        let mut file = File::open(path)?;
        let control = MstControlRecord::read(&mut file)?;
        Ok(MstFile { file, control })
    }

    /// Reads the record stored at the given offset (as obtained from the
    /// cross-reference file).
    pub fn read_record(&mut self, offset: u64) -> Result<MstRecord, DirectError> {
        self.file.seek(SeekFrom::Start(offset))?;
        let leader = MstRecordLeader::read(&mut self.file)?;

        let body_length = (leader.length as usize).saturating_sub(MST_LEADER_SIZE);
        let mut body = vec![0u8; body_length];
        self.file.read_exact(&mut body)?;
        let mut cursor = Cursor::new(&body);

        let mut dictionary = Vec::with_capacity(leader.nvf as usize);
        for _ in 0..leader.nvf {
            dictionary.push(MstDictionaryEntry::read(&mut cursor)?);
        }

        let mut fields = Vec::with_capacity(dictionary.len());
        let data_start = (leader.base as usize).saturating_sub(MST_LEADER_SIZE);
        for entry in &dictionary {
            let start = data_start + entry.position as usize;
            let end = start + entry.length as usize;
            let slice = body.get(start..end).ok_or_else(|| {
                DirectError::Binary(binrw::Error::AssertFail {
                    pos: offset,
                    message: "field slice out of record bounds".into(),
                })
            })?;
            fields.push(MstField {
                tag: entry.tag,
                text: String::from_utf8_lossy(slice).into_owned(),
            });
        }

        Ok(MstRecord {
            leader,
            dictionary,
            fields,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn push(bytes: &mut Vec<u8>, value: u32) {
        bytes.extend_from_slice(&value.to_be_bytes());
    }

    /// Lays out a master file with a control record and one record.
    fn build_fixture(fields: &[(u32, &str)]) -> (Vec<u8>, u64) {
        let mut file = Vec::new();
        // Control record: next mfn 2, one record, unlocked.
        for value in [0u32, 2, 36, 0, 0, 1, 0, 0, 0] {
            push(&mut file, value);
        }
        let record_offset = file.len() as u64;

        let mut data = Vec::new();
        let mut dictionary = Vec::new();
        for (tag, text) in fields {
            let position = data.len() as u32;
            data.extend_from_slice(text.as_bytes());
            push(&mut dictionary, *tag);
            push(&mut dictionary, position);
            push(&mut dictionary, text.len() as u32);
        }
        let base = (MST_LEADER_SIZE + dictionary.len()) as u32;
        let length = base + data.len() as u32;

        // Leader: mfn 1, version 1, last-version status.
        for value in [1u32, length, 0, 0, base, fields.len() as u32, 1, 32] {
            push(&mut file, value);
        }
        file.extend_from_slice(&dictionary);
        file.extend_from_slice(&data);
        (file, record_offset)
    }

    #[test]
    fn reads_control_and_record() {
        let (bytes, offset) = build_fixture(&[(100, "20260801"), (200, "^aTitle^eSubtitle")]);
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&bytes).unwrap();
        file.flush().unwrap();

        let mut mst = MstFile::open(file.path()).unwrap();
        assert_eq!(mst.control.next_mfn, 2);
        assert_eq!(mst.control.rec_cnt, 1);
        assert_eq!(mst.control.blocked, 0);

        let stored = mst.read_record(offset).unwrap();
        assert_eq!(stored.leader.mfn, 1);
        assert_eq!(stored.leader.nvf, 2);
        assert_eq!(stored.fields[0].text, "20260801");

        let record = stored.to_record();
        assert_eq!(record.mfn, 1);
        assert_eq!(record.status, RecordStatus::LAST_VERSION);
        assert_eq!(record.first_value(100), Some("20260801"));
        assert_eq!(record.first_subfield_value(200, 'e'), Some("Subtitle"));
    }

    #[test]
    fn previous_offset_combines_halves() {
        let leader = MstRecordLeader {
            previous_low: 0x10,
            previous_high: 0x2,
            ..Default::default()
        };
        assert_eq!(leader.previous_offset(), 0x2_0000_0010);
    }
}
