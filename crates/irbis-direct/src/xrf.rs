//! The cross-reference (`.xrf`) file: one fixed-width entry per MFN.

use crate::DirectError;
use binrw::BinRead;
use irbis_rec::RecordStatus;
use std::fs::File;
use std::io::{Seek, SeekFrom};
use std::path::Path;

/// Width of one entry in bytes.
pub const XRF_RECORD_SIZE: u64 = 12;

/// One cross-reference entry: where the record lives and what state it
/// is in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, BinRead)]
#[br(big)]
pub struct XrfRecord {
    /// Low half of the master-file offset.
    pub low: u32,
    /// High half of the master-file offset.
    pub high: u32,
    /// Record status bits.
    pub status: u32,
}

impl XrfRecord {
    /// Absolute offset of the record in the master file.
    pub fn offset(&self) -> u64 {
        (u64::from(self.high) << 32) | u64::from(self.low)
    }

    /// The status word as record status bits.
    pub fn record_status(&self) -> RecordStatus {
        RecordStatus::from_bits_truncate(self.status)
    }

    /// Deleted in either sense.
    pub fn is_deleted(&self) -> bool {
        self.record_status().is_deleted()
    }

    /// Locked for editing.
    pub fn is_locked(&self) -> bool {
        self.record_status().contains(RecordStatus::LOCKED)
    }
}

/// An open cross-reference file.
#[derive(Debug)]
pub struct XrfFile {
    file: File,
}

impl XrfFile {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, DirectError> {
        Ok(XrfFile {
            file: File::open(path)?,
        })
    }

    /// Reads the entry for the given MFN (entries start at MFN 1).
    pub fn read_record(&mut self, mfn: u32) -> Result<XrfRecord, DirectError> {
        if mfn == 0 {
            return Err(DirectError::OutOfRange(mfn));
        }
        let position = u64::from(mfn - 1) * XRF_RECORD_SIZE;
        let length = self.file.seek(SeekFrom::End(0))?;
        if position + XRF_RECORD_SIZE > length {
            return Err(DirectError::OutOfRange(mfn));
        }
        self.file.seek(SeekFrom::Start(position))?;
        Ok(XrfRecord::read(&mut self.file)?)
    }
}
