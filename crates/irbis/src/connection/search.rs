//! Search, dictionary and posting commands.

use super::{Connection, TERM_EDGE_CODES, add_format_line};
use crate::Result;
use irbis_rec::Record;
use irbis_res::{
    FoundLine, PostingParameters, SearchParameters, TermInfo, TermParameters, TermPosting,
};
use irbis_wire::{ALL_FORMAT, ALT_DELIMITER, Command, fast_parse, split2};

/// Terms fetched per page while enumerating a prefix.
const TERM_PAGE: u32 = 512;

impl Connection {
    /// Runs a search, returning the matching MFNs of the first result
    /// page.
    pub fn search(&mut self, expression: &str) -> Result<Vec<u32>> {
        self.require_connected()?;
        let database = self.database.clone();
        let mut query = self.query(Command::Search);
        query.add_ansi(&database).new_line();
        query.add_utf(expression).new_line();
        query.add(0).new_line();
        query.add(1).new_line();
        let mut response = self.execute(&query)?;
        self.check_return_code(&mut response, &[])?;
        let _total = response.read_integer();
        let mut result = Vec::new();
        while !response.eof() {
            let line = response.read_utf();
            if line.is_empty() {
                continue;
            }
            let (head, _) = split2(&line, '#');
            let mfn = fast_parse(head.as_bytes());
            if mfn != 0 {
                result.push(mfn);
            }
        }
        Ok(result)
    }

    /// Runs a fully parameterized search.
    pub fn search_ex(&mut self, parameters: &SearchParameters) -> Result<Vec<FoundLine>> {
        self.require_connected()?;
        let database = self.pick_database(&parameters.database);
        let mut query = self.query(Command::Search);
        query.add_ansi(&database).new_line();
        query.add_utf(&parameters.expression).new_line();
        query.add(i64::from(parameters.number_of_records)).new_line();
        query.add(i64::from(parameters.first_record)).new_line();
        add_format_line(&mut query, &parameters.format);
        query.add(i64::from(parameters.min_mfn)).new_line();
        query.add(i64::from(parameters.max_mfn)).new_line();
        query.add_utf(&parameters.sequential).new_line();
        let mut response = self.execute(&query)?;
        self.check_return_code(&mut response, &[])?;
        let _total = response.read_integer();
        let mut result = Vec::new();
        while !response.eof() {
            let line = response.read_utf();
            if !line.is_empty() {
                result.push(FoundLine::parse(&line));
            }
        }
        Ok(result)
    }

    /// Returns only the hit count of a search.
    pub fn search_count(&mut self, expression: &str) -> Result<u32> {
        self.require_connected()?;
        let database = self.database.clone();
        let mut query = self.query(Command::Search);
        query.add_ansi(&database).new_line();
        query.add_utf(expression).new_line();
        query.add(0).new_line();
        query.add(0).new_line();
        let mut response = self.execute(&query)?;
        self.check_return_code(&mut response, &[])?;
        Ok(response.read_integer() as u32)
    }

    /// Collects every matching MFN, paging past the single-response
    /// limit.
    ///
    /// The first page announces the total; subsequent pages are fetched
    /// from the next unseen position until the total is reached or a
    /// page comes back empty. A page failure after the first returns
    /// what was collected.
    pub fn search_all(&mut self, expression: &str) -> Result<Vec<u32>> {
        self.require_connected()?;
        let database = self.database.clone();
        let mut result: Vec<u32> = Vec::new();
        let mut first_record: u32 = 1;
        let mut total: u32 = 0;
        loop {
            let mut query = self.query(Command::Search);
            query.add_ansi(&database).new_line();
            query.add_utf(expression).new_line();
            query.add(0).new_line();
            query.add(i64::from(first_record)).new_line();
            let mut response = self.execute(&query)?;
            if let Err(error) = self.check_return_code(&mut response, &[]) {
                if first_record == 1 {
                    return Err(error);
                }
                log::warn!("pagination aborted: {error}");
                break;
            }
            if first_record == 1 {
                total = response.read_integer() as u32;
                if total == 0 {
                    break;
                }
            } else {
                let _ = response.read_integer();
            }
            let mut page = Vec::new();
            while !response.eof() {
                let line = response.read_utf();
                if line.is_empty() {
                    continue;
                }
                let (head, _) = split2(&line, '#');
                let mfn = fast_parse(head.as_bytes());
                if mfn != 0 {
                    page.push(mfn);
                }
            }
            if page.is_empty() {
                break;
            }
            first_record += page.len() as u32;
            result.extend(page);
            if first_record >= total {
                break;
            }
        }
        Ok(result)
    }

    /// Searches and decodes the found records in one pass.
    pub fn search_read(&mut self, expression: &str, limit: u32) -> Result<Vec<Record>> {
        let database = self.database.clone();
        let parameters = SearchParameters {
            expression: expression.to_owned(),
            format: ALL_FORMAT.to_owned(),
            number_of_records: limit,
            ..Default::default()
        };
        let found = self.search_ex(&parameters)?;
        let mut records = Vec::with_capacity(found.len());
        for line in found {
            // The formatted tail carries the record lines behind the
            // first separator chunk.
            let chunks: Vec<String> = line
                .description
                .split(ALT_DELIMITER)
                .skip(1)
                .map(str::to_owned)
                .collect();
            if chunks.is_empty() {
                continue;
            }
            let mut record = Record::new();
            record.decode(&chunks);
            record.database = database.clone();
            records.push(record);
        }
        Ok(records)
    }

    /// Reads a run of dictionary terms.
    pub fn read_terms(&mut self, parameters: &TermParameters) -> Result<Vec<TermInfo>> {
        self.require_connected()?;
        let database = self.pick_database(&parameters.database);
        let command = if parameters.reverse_order {
            Command::ReadTermsReverse
        } else {
            Command::ReadTerms
        };
        let mut query = self.query(command);
        query.add_ansi(&database).new_line();
        query.add_utf(&parameters.start_term).new_line();
        query.add(i64::from(parameters.number_of_terms)).new_line();
        add_format_line(&mut query, &parameters.format);
        let mut response = self.execute(&query)?;
        self.check_return_code(&mut response, TERM_EDGE_CODES)?;
        let lines = response.read_remaining_utf_lines();
        Ok(TermInfo::parse(&lines))
    }

    /// Reads postings for one or more terms.
    pub fn read_postings(
        &mut self,
        parameters: &PostingParameters,
    ) -> Result<Vec<TermPosting>> {
        self.require_connected()?;
        let database = self.pick_database(&parameters.database);
        let mut query = self.query(Command::ReadPostings);
        query.add_ansi(&database).new_line();
        query.add(i64::from(parameters.number_of_postings)).new_line();
        query.add(i64::from(parameters.first_posting)).new_line();
        add_format_line(&mut query, &parameters.format);
        for term in &parameters.terms {
            query.add_utf(term).new_line();
        }
        let mut response = self.execute(&query)?;
        self.check_return_code(&mut response, TERM_EDGE_CODES)?;
        let lines = response.read_remaining_utf_lines();
        Ok(TermPosting::parse(&lines))
    }

    /// Enumerates dictionary terms under a prefix, prefix stripped.
    ///
    /// The dictionary stores terms uppercased, so the prefix is
    /// uppercased before the walk. Pages overlap by one term (the next
    /// page starts at the last seen term); the duplicate boundary
    /// element is skipped. Enumeration stops at the first term outside
    /// the prefix.
    pub fn list_terms(&mut self, prefix: &str) -> Result<Vec<String>> {
        self.require_connected()?;
        let prefix = prefix.to_uppercase();
        let mut result = Vec::new();
        let mut start_term = prefix.clone();
        let mut last_term = String::new();
        'pages: loop {
            let parameters = TermParameters {
                start_term: start_term.clone(),
                number_of_terms: TERM_PAGE,
                ..Default::default()
            };
            let terms = self.read_terms(&parameters)?;
            if terms.is_empty() {
                break;
            }
            for (index, term) in terms.iter().enumerate() {
                if index == 0 && term.text == last_term {
                    continue;
                }
                match term.text.strip_prefix(&prefix) {
                    Some(stripped) => result.push(stripped.to_owned()),
                    None => break 'pages,
                }
            }
            let tail = terms.last().expect("non-empty page").text.clone();
            if tail == last_term {
                break;
            }
            last_term = tail.clone();
            start_term = tail;
        }
        Ok(result)
    }
}
