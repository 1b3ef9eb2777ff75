//! The bibliographic record model: subfields, fields (with embedded
//! nested fields), parsed and raw records, the line-based protocol
//! representation and a reader for binary ISO-2709 files.
//!
//! Records form a strict value-owned tree: a [`Record`] owns its
//! [`RecordField`]s, a field owns its [`SubField`]s. Embedded fields are
//! a view derived on demand from `'1'` subfields, never a separate
//! storage form.

#![forbid(unsafe_code)]

pub mod field;
pub mod iso;
pub mod raw_record;
pub mod record;
pub mod subfield;

pub use field::RecordField;
pub use iso::{IsoError, read_iso_record};
pub use raw_record::RawRecord;
pub use record::{Record, RecordStatus};
pub use subfield::SubField;
