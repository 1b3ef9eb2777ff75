//! Server file specifications: `path.database.filename`.

/// Addresses one file on the server.
///
/// The numeric path selects the storage area; database-scoped areas (2
/// and up) need the database name, the system areas leave it empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileSpecification {
    /// Storage area code.
    pub path: u32,
    /// Database name for database-scoped areas.
    pub database: String,
    /// File name inside the area.
    pub filename: String,
    /// Inline content for write requests.
    pub content: Option<String>,
}

impl FileSpecification {
    /// General server files.
    pub const SYSTEM: u32 = 0;
    /// Per-installation data files.
    pub const DATA: u32 = 1;
    /// Master-file area of a database.
    pub const MASTER_FILE: u32 = 2;
    /// Inverted-file area of a database.
    pub const INVERTED_FILE: u32 = 3;
    /// Parameter files of a database.
    pub const PARAMETER: u32 = 10;
    /// Full-text area of a database.
    pub const FULL_TEXT: u32 = 11;
    /// Internal resources of a database.
    pub const INTERNAL_RESOURCE: u32 = 12;

    /// A file in the master-file area of `database`.
    pub fn master_file(database: impl Into<String>, filename: impl Into<String>) -> Self {
        FileSpecification {
            path: Self::MASTER_FILE,
            database: database.into(),
            filename: filename.into(),
            content: None,
        }
    }

    /// A system file outside any database.
    pub fn system(filename: impl Into<String>) -> Self {
        FileSpecification {
            path: Self::SYSTEM,
            database: String::new(),
            filename: filename.into(),
            content: None,
        }
    }

    /// Attaches inline content, turning the specification into a write.
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }
}

impl std::fmt::Display for FileSpecification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.path, self.database, self.filename)?;
        if let Some(content) = &self.content {
            write!(f, "&{content}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_wire_form() {
        let spec = FileSpecification::master_file("IBIS", "brief.pft");
        assert_eq!(spec.to_string(), "2.IBIS.brief.pft");
        let spec = FileSpecification::system("dbnam2.mnu");
        assert_eq!(spec.to_string(), "0..dbnam2.mnu");
    }

    #[test]
    fn content_marks_a_write() {
        let spec = FileSpecification::master_file("IBIS", "test.txt").with_content("line");
        assert_eq!(spec.to_string(), "2.IBIS.test.txt&line");
    }
}
