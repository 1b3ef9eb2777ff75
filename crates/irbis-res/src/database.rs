//! Database descriptions, from the catalog menu or from the server.

use crate::menu::MenuFile;
use irbis_wire::{SHORT_DELIMITER, split2};

/// Description of one database.
#[derive(Debug, Clone, Default)]
pub struct DatabaseInfo {
    /// Short database name.
    pub name: String,
    /// Human-readable description.
    pub description: String,
    /// Whether the catalog menu marks the database read-only.
    pub read_only: bool,
    /// MFNs of logically deleted records.
    pub logically_deleted: Vec<u32>,
    /// MFNs of physically deleted records.
    pub physically_deleted: Vec<u32>,
    /// MFNs of records marked absent.
    pub absent: Vec<u32>,
    /// MFNs of records missing from the index.
    pub non_actualized: Vec<u32>,
    /// MFNs of locked records (distinct from the whole-database lock).
    pub locked_records: Vec<u32>,
    /// Highest MFN plus one.
    pub max_mfn: u32,
    /// Whether the whole database is locked.
    pub database_locked: bool,
}

/// Splits one response line into MFNs.
fn parse_mfn_list(line: &str) -> Vec<u32> {
    line.split(SHORT_DELIMITER)
        .filter_map(|item| item.parse().ok())
        .collect()
}

impl DatabaseInfo {
    /// Parses the record-list reply of the database-info command: five
    /// MFN lists in record-status order, then the MFN counter and the
    /// database lock bit.
    pub fn parse_response(name: &str, lines: &[String]) -> Self {
        let mut result = DatabaseInfo {
            name: name.to_owned(),
            ..Default::default()
        };
        let mut lines = lines.iter();
        let mut next = || lines.next().map(String::as_str).unwrap_or("");
        result.logically_deleted = parse_mfn_list(next());
        result.physically_deleted = parse_mfn_list(next());
        result.absent = parse_mfn_list(next());
        result.non_actualized = parse_mfn_list(next());
        result.locked_records = parse_mfn_list(next());
        result.max_mfn = next().parse().unwrap_or(0);
        result.database_locked = next().parse().unwrap_or(0) != 0;
        result
    }

    /// Deleted records of either kind, in no particular order.
    pub fn deleted_records(&self) -> Vec<u32> {
        let mut result = self.logically_deleted.clone();
        result.extend_from_slice(&self.physically_deleted);
        result
    }

    /// Folds the catalog menu into database descriptions.
    ///
    /// A leading `-` on the name marks the database read-only.
    pub fn parse_menu(menu: &MenuFile) -> Vec<Self> {
        menu.entries
            .iter()
            .map(|entry| {
                let (read_only, name) = match entry.code.strip_prefix('-') {
                    Some(rest) => (true, rest),
                    None => (false, entry.code.as_str()),
                };
                // The comment may carry a trailing record count.
                let (description, _) = split2(&entry.comment, '#');
                DatabaseInfo {
                    name: name.to_owned(),
                    description: description.trim().to_owned(),
                    read_only,
                    ..Default::default()
                }
            })
            .collect()
    }
}

impl std::fmt::Display for DatabaseInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.description.is_empty() {
            f.write_str(&self.name)
        } else {
            write!(f, "{} - {}", self.name, self.description)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parse_response_lists() {
        let info = DatabaseInfo::parse_response(
            "IBIS",
            &lines(&["1\x1e2\x1e3", "4", "7", "", "5\x1e6", "1000", "1"]),
        );
        assert_eq!(info.name, "IBIS");
        assert_eq!(info.logically_deleted, vec![1, 2, 3]);
        assert_eq!(info.physically_deleted, vec![4]);
        assert_eq!(info.absent, vec![7]);
        assert!(info.non_actualized.is_empty());
        assert_eq!(info.locked_records, vec![5, 6]);
        assert_eq!(info.max_mfn, 1000);
        assert!(info.database_locked);
        assert_eq!(info.deleted_records(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn parse_response_tolerates_short_replies() {
        let info = DatabaseInfo::parse_response("IBIS", &lines(&["", "", ""]));
        assert!(info.logically_deleted.is_empty());
        assert!(info.locked_records.is_empty());
        assert_eq!(info.max_mfn, 0);
        assert!(!info.database_locked);
    }

    #[test]
    fn parse_menu_flags_read_only() {
        let menu = MenuFile::parse(&lines(&[
            "IBIS",
            "The catalog",
            "-RDR",
            "Readers#42",
            "*****",
        ]));
        let infos = DatabaseInfo::parse_menu(&menu);
        assert_eq!(infos.len(), 2);
        assert!(!infos[0].read_only);
        assert_eq!(infos[0].description, "The catalog");
        assert!(infos[1].read_only);
        assert_eq!(infos[1].name, "RDR");
        assert_eq!(infos[1].description, "Readers");
        assert_eq!(infos[1].to_string(), "RDR - Readers");
    }
}
