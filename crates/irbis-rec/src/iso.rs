//! Reader for binary ISO-2709 record files.

use crate::record::Record;
use crate::subfield::SubField;
use irbis_wire::{TextDecoder, fast_parse};
use std::io::Read;

/// End-of-record byte.
pub const ISO_RECORD_DELIMITER: u8 = 0x1D;
/// End-of-field byte, also terminates the directory.
pub const ISO_FIELD_DELIMITER: u8 = 0x1E;
/// Subfield marker byte.
pub const ISO_SUBFIELD_DELIMITER: u8 = 0x1F;

/// Width of the record marker (leader).
const MARKER_LENGTH: usize = 24;
/// Number of indicator bytes opening a variable field.
const INDICATOR_LENGTH: usize = 2;

/// Failures while walking an ISO-2709 file.
#[derive(Debug, thiserror::Error)]
pub enum IsoError {
    #[error("i/o failure: {0}")]
    Io(#[from] std::io::Error),
    #[error("truncated record")]
    Truncated,
    #[error("missing record terminator")]
    BadTerminator,
    #[error("malformed record structure")]
    Malformed,
}

/// Reads the next record, decoding bytes with the supplied decoder
/// (legacy or UTF-8, the file's author decides).
///
/// Returns `Ok(None)` on a clean end of stream.
pub fn read_iso_record<R: Read>(
    reader: &mut R,
    decoder: TextDecoder,
) -> Result<Option<Record>, IsoError> {
    // The first five marker digits announce the total record length.
    let mut prefix = [0u8; 5];
    let mut have = 0;
    while have < prefix.len() {
        let n = reader.read(&mut prefix[have..])?;
        if n == 0 {
            if have == 0 {
                return Ok(None);
            }
            return Err(IsoError::Truncated);
        }
        have += n;
    }

    let record_length = fast_parse(&prefix) as usize;
    if record_length <= prefix.len() {
        return Err(IsoError::Malformed);
    }
    let mut chunk = vec![0u8; record_length];
    chunk[..prefix.len()].copy_from_slice(&prefix);
    reader
        .read_exact(&mut chunk[prefix.len()..])
        .map_err(|_| IsoError::Truncated)?;
    if chunk[record_length - 1] != ISO_RECORD_DELIMITER {
        return Err(IsoError::BadTerminator);
    }
    if record_length < MARKER_LENGTH {
        return Err(IsoError::Malformed);
    }

    // Marker digits at fixed offsets size the directory entries.
    let length_of_length = usize::from(chunk[20].wrapping_sub(b'0'));
    let length_of_offset = usize::from(chunk[21].wrapping_sub(b'0'));
    let additional = usize::from(chunk[22].wrapping_sub(b'0'));
    let entry_width = 3 + length_of_length + length_of_offset + additional;
    let base = fast_parse(&chunk[12..17]) as usize;
    if entry_width == 3 || base >= record_length {
        return Err(IsoError::Malformed);
    }

    let mut record = Record::new();
    let mut position = MARKER_LENGTH;
    while chunk.get(position) != Some(&ISO_FIELD_DELIMITER) {
        if position + entry_width > record_length {
            return Err(IsoError::Malformed);
        }
        let tag = fast_parse(&chunk[position..position + 3]);
        let field_length =
            fast_parse(&chunk[position + 3..position + 3 + length_of_length]) as usize;
        let field_offset = fast_parse(
            &chunk[position + 3 + length_of_length..position + entry_width - additional],
        ) as usize;
        position += entry_width;

        let start = base + field_offset;
        let end = start + field_length;
        if end > record_length || field_length == 0 {
            return Err(IsoError::Malformed);
        }
        // Every field carries its terminator byte inside its length.
        let body = &chunk[start..end - 1];

        let field = record.add(tag);
        if tag < 10 {
            field.value = decoder(body);
        } else {
            if body.len() < INDICATOR_LENGTH {
                continue;
            }
            let mut parts = body[INDICATOR_LENGTH..].split(|&b| b == ISO_SUBFIELD_DELIMITER);
            if let Some(head) = parts.next() {
                field.value = decoder(head);
            }
            for part in parts {
                if part.is_empty() {
                    continue;
                }
                let code = char::from(part[0]).to_ascii_lowercase();
                field.subfields.push(SubField::new(code, decoder(&part[1..])));
            }
        }
    }

    Ok(Some(record))
}

#[cfg(test)]
mod tests {
    use super::*;
    use irbis_wire::from_utf;
    use std::io::Cursor;

    /// Assembles a minimal ISO-2709 record from tag/body pairs.
    fn build(fields: &[(u32, &[u8])]) -> Vec<u8> {
        let mut directory = Vec::new();
        let mut data = Vec::new();
        for (tag, body) in fields {
            let offset = data.len();
            data.extend_from_slice(body);
            data.push(ISO_FIELD_DELIMITER);
            directory.extend_from_slice(format!("{tag:03}").as_bytes());
            directory.extend_from_slice(format!("{:04}", body.len() + 1).as_bytes());
            directory.extend_from_slice(format!("{offset:05}").as_bytes());
        }
        directory.push(ISO_FIELD_DELIMITER);

        let base = MARKER_LENGTH + directory.len();
        let total = base + data.len() + 1;
        let mut marker = format!("{total:05}").into_bytes();
        marker.resize(12, b' ');
        marker.extend_from_slice(format!("{base:05}").as_bytes());
        marker.resize(20, b' ');
        marker.extend_from_slice(b"450");
        marker.resize(MARKER_LENGTH, b' ');

        let mut record = marker;
        record.extend_from_slice(&directory);
        record.extend_from_slice(&data);
        record.push(ISO_RECORD_DELIMITER);
        record
    }

    #[test]
    fn reads_fixed_and_variable_fields() {
        let bytes = build(&[
            (1, b"RU\\NLR\\12345"),
            (200, b"10\x1FaTitle\x1FeSubtitle"),
        ]);
        let mut cursor = Cursor::new(bytes);
        let record = read_iso_record(&mut cursor, from_utf).unwrap().unwrap();
        assert_eq!(record.fields.len(), 2);
        assert_eq!(record.first_value(1), Some("RU\\NLR\\12345"));
        assert_eq!(record.first_subfield_value(200, 'a'), Some("Title"));
        assert_eq!(record.first_subfield_value(200, 'e'), Some("Subtitle"));
        assert!(
            read_iso_record(&mut cursor, from_utf).unwrap().is_none(),
            "stream holds exactly one record"
        );
    }

    #[test]
    fn rejects_missing_terminator() {
        let mut bytes = build(&[(1, b"x")]);
        *bytes.last_mut().unwrap() = b'?';
        let mut cursor = Cursor::new(bytes);
        assert!(matches!(
            read_iso_record(&mut cursor, from_utf),
            Err(IsoError::BadTerminator)
        ));
    }

    #[test]
    fn rejects_truncated_stream() {
        let bytes = build(&[(1, b"x")]);
        let mut cursor = Cursor::new(&bytes[..bytes.len() - 3]);
        assert!(matches!(
            read_iso_record(&mut cursor, from_utf),
            Err(IsoError::Truncated)
        ));
    }
}
