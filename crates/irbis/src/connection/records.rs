//! Record reading, writing and formatting commands.

use super::{Connection, READABLE_RECORD_CODES, add_format_line};
use crate::Result;
use irbis_rec::{RawRecord, Record, RecordStatus};
use irbis_wire::{
    ALL_FORMAT, ALT_DELIMITER, Command, IRBIS_DELIMITER, SHORT_DELIMITER, irbis_to_unix, split2,
};

impl Connection {
    /// Reads one record from the default database.
    pub fn read_record(&mut self, mfn: u32) -> Result<Record> {
        self.read_record_version(mfn, 0)
    }

    /// Reads a specific stored version of a record.
    ///
    /// Asking for a non-zero version makes the server lock the record;
    /// the lock is released here before the record is returned.
    pub fn read_record_version(&mut self, mfn: u32, version: u32) -> Result<Record> {
        self.require_connected()?;
        let database = self.database.clone();
        let mut query = self.query(Command::ReadRecord);
        query.add_ansi(&database).new_line();
        query.add(i64::from(mfn)).new_line();
        query.add(i64::from(version)).new_line();
        let mut response = self.execute(&query)?;
        self.check_return_code(&mut response, READABLE_RECORD_CODES)?;
        let lines = response.read_remaining_utf_lines();
        let mut record = Record::new();
        record.decode(&lines);
        record.database = database.clone();
        if version != 0 {
            self.unlock_records(&database, &[mfn])?;
        }
        Ok(record)
    }

    /// Reads one record without parsing its fields.
    pub fn read_raw_record(&mut self, mfn: u32) -> Result<RawRecord> {
        self.require_connected()?;
        let database = self.database.clone();
        let mut query = self.query(Command::ReadRecord);
        query.add_ansi(&database).new_line();
        query.add(i64::from(mfn)).new_line();
        query.add(0).new_line();
        let mut response = self.execute(&query)?;
        self.check_return_code(&mut response, READABLE_RECORD_CODES)?;
        let lines = response.read_remaining_utf_lines();
        let mut record = RawRecord::default();
        record.decode(&lines);
        record.database = database;
        Ok(record)
    }

    /// Reads a batch of records in one exchange.
    pub fn read_records(&mut self, mfns: &[u32]) -> Result<Vec<Record>> {
        self.require_connected()?;
        match mfns {
            [] => Ok(Vec::new()),
            [one] => Ok(vec![self.read_record(*one)?]),
            many => {
                let database = self.database.clone();
                let mut query = self.query(Command::Format);
                query.add_ansi(&database).new_line();
                query.add_ansi(ALL_FORMAT).new_line();
                query.add(many.len() as i64).new_line();
                for mfn in many {
                    query.add(i64::from(*mfn)).new_line();
                }
                let mut response = self.execute(&query)?;
                self.check_return_code(&mut response, &[])?;
                let mut records = Vec::with_capacity(many.len());
                for line in response.read_remaining_utf_lines() {
                    if line.is_empty() {
                        continue;
                    }
                    // Each line is `mfn#chunk\x1Fchunk...`; the chunk
                    // before the first separator is not record content.
                    let (_, body) = split2(&line, '#');
                    let chunks: Vec<String> = body
                        .unwrap_or("")
                        .split(ALT_DELIMITER)
                        .skip(1)
                        .map(str::to_owned)
                        .collect();
                    let mut record = Record::new();
                    record.decode(&chunks);
                    record.database = database.clone();
                    records.push(record);
                }
                Ok(records)
            }
        }
    }

    /// Writes one record and refreshes it from the server's reply.
    ///
    /// Returns the new maximum MFN. `lock` keeps the record locked after
    /// the write, `actualize` updates the inverted index, `dont_parse`
    /// skips refreshing the in-memory record.
    pub fn write_record(
        &mut self,
        record: &mut Record,
        lock: bool,
        actualize: bool,
        dont_parse: bool,
    ) -> Result<u32> {
        self.require_connected()?;
        let database = self.pick_database(&record.database);
        let mut query = self.query(Command::WriteRecord);
        query.add_ansi(&database).new_line();
        query.add_flag(lock).new_line();
        query.add_flag(actualize).new_line();
        query.add_utf(&record.encode(IRBIS_DELIMITER)).new_line();
        let mut response = self.execute(&query)?;
        let code = self.check_return_code(&mut response, &[])?;
        if !dont_parse {
            // The reply packs the whole record into two lines: the
            // header, then everything else joined on the short delimiter.
            let temp = response.read_remaining_utf_lines();
            if temp.len() > 1 {
                let mut lines = vec![temp[0].clone()];
                lines.extend(temp[1].split(SHORT_DELIMITER).map(str::to_owned));
                record.decode(&lines);
                record.database = database;
            }
        }
        Ok(code as u32)
    }

    /// Writes an unparsed record back, returning the new maximum MFN.
    pub fn write_raw_record(
        &mut self,
        record: &mut RawRecord,
        lock: bool,
        actualize: bool,
    ) -> Result<u32> {
        self.require_connected()?;
        let database = self.pick_database(&record.database);
        let mut query = self.query(Command::WriteRecord);
        query.add_ansi(&database).new_line();
        query.add_flag(lock).new_line();
        query.add_flag(actualize).new_line();
        query.add_utf(&record.encode(IRBIS_DELIMITER)).new_line();
        let mut response = self.execute(&query)?;
        let code = self.check_return_code(&mut response, &[])?;
        Ok(code as u32)
    }

    /// Writes a batch of records, refreshing each from the reply.
    pub fn write_records(
        &mut self,
        records: &mut [Record],
        lock: bool,
        actualize: bool,
    ) -> Result<()> {
        self.require_connected()?;
        match records {
            [] => Ok(()),
            [one] => {
                self.write_record(one, lock, actualize, false)?;
                Ok(())
            }
            many => {
                let mut query = self.query(Command::WriteRecords);
                query.add_flag(lock).new_line();
                query.add_flag(actualize).new_line();
                for record in many.iter() {
                    let database = self.pick_database(&record.database);
                    let line = format!(
                        "{}{}{}",
                        database,
                        IRBIS_DELIMITER,
                        record.encode(IRBIS_DELIMITER)
                    );
                    query.add_utf(&line).new_line();
                }
                let mut response = self.execute(&query)?;
                self.check_return_code(&mut response, &[])?;
                let lines = response.read_remaining_utf_lines();
                for (line, record) in lines.iter().zip(many.iter_mut()) {
                    if line.is_empty() {
                        continue;
                    }
                    let chunks: Vec<String> =
                        line.split(SHORT_DELIMITER).map(str::to_owned).collect();
                    record.decode(&chunks);
                }
                Ok(())
            }
        }
    }

    /// Marks a record logically deleted.
    ///
    /// A record that is missing or already deleted leaves the database
    /// unchanged; the two cases are not distinguished here. Callers that
    /// need the distinction read the record first.
    pub fn delete_record(&mut self, mfn: u32) -> Result<()> {
        let mut record = self.read_raw_record(mfn)?;
        if !record.is_deleted() {
            record.status |= RecordStatus::LOGICALLY_DELETED;
            self.write_raw_record(&mut record, false, true)?;
        }
        Ok(())
    }

    /// Clears the logical-deletion mark of a record.
    pub fn undelete_record(&mut self, mfn: u32) -> Result<()> {
        let mut record = self.read_raw_record(mfn)?;
        if record.status.contains(RecordStatus::LOGICALLY_DELETED) {
            record.status &= !RecordStatus::LOGICALLY_DELETED;
            self.write_raw_record(&mut record, false, true)?;
        }
        Ok(())
    }

    /// Formats one stored record.
    pub fn format_record(&mut self, format: &str, mfn: u32) -> Result<String> {
        self.require_connected()?;
        let database = self.database.clone();
        let mut query = self.query(Command::Format);
        query.add_ansi(&database).new_line();
        add_format_line(&mut query, format);
        query.add(1).new_line();
        query.add(i64::from(mfn)).new_line();
        let mut response = self.execute(&query)?;
        self.check_return_code(&mut response, &[])?;
        Ok(response.read_remaining_utf_text().trim().to_owned())
    }

    /// Formats a client-side record that need not be stored.
    pub fn format_record_with(&mut self, format: &str, record: &Record) -> Result<String> {
        self.require_connected()?;
        let database = self.pick_database(&record.database);
        let mut query = self.query(Command::Format);
        query.add_ansi(&database).new_line();
        add_format_line(&mut query, format);
        query.add(-2).new_line();
        query.add_utf(&record.encode(IRBIS_DELIMITER)).new_line();
        let mut response = self.execute(&query)?;
        self.check_return_code(&mut response, &[])?;
        Ok(response.read_remaining_utf_text().trim().to_owned())
    }

    /// Formats a batch of stored records; the result is parallel to
    /// `mfns`.
    pub fn format_records(&mut self, format: &str, mfns: &[u32]) -> Result<Vec<String>> {
        self.require_connected()?;
        match mfns {
            [] => Ok(Vec::new()),
            [one] => Ok(vec![self.format_record(format, *one)?]),
            many => {
                let database = self.database.clone();
                let mut query = self.query(Command::Format);
                query.add_ansi(&database).new_line();
                add_format_line(&mut query, format);
                query.add(many.len() as i64).new_line();
                for mfn in many {
                    query.add(i64::from(*mfn)).new_line();
                }
                let mut response = self.execute(&query)?;
                self.check_return_code(&mut response, &[])?;
                let mut result = Vec::with_capacity(many.len());
                for line in response.read_remaining_utf_lines() {
                    if line.is_empty() {
                        continue;
                    }
                    let (_, text) = split2(&line, '#');
                    result.push(irbis_to_unix(text.unwrap_or("")));
                }
                Ok(result)
            }
        }
    }
}
