//! Readers for the server's direct-access database files.
//!
//! A database on disk is a pair of files: the cross-reference file
//! (`.xrf`), a fixed-width table mapping each MFN to the offset and
//! status of its record, and the master file (`.mst`), holding the
//! records themselves behind a control record. All integers in both
//! files are stored big-endian.

#![forbid(unsafe_code)]

pub mod mst;
pub mod xrf;

pub use mst::{MstControlRecord, MstDictionaryEntry, MstField, MstFile, MstRecord, MstRecordLeader};
pub use xrf::{XrfFile, XrfRecord};

/// Failures while reading direct-access files.
#[derive(Debug, thiserror::Error)]
pub enum DirectError {
    #[error("i/o failure: {0}")]
    Io(#[from] std::io::Error),
    #[error("bad file structure: {0}")]
    Binary(#[from] binrw::Error),
    #[error("MFN {0} is out of file range")]
    OutOfRange(u32),
}
