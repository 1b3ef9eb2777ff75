//! Server command codes.

/// Commands understood by the server, sent as a short legacy-encoded
/// string on the first (and third) header line of every request.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Command {
    /// Register the client (log in).
    Register,
    /// Unregister the client (log out).
    Unregister,
    /// Keep the server-side session alive.
    Nop,
    /// Server version and license counters.
    ServerInfo,
    /// Server statistics with the list of running clients.
    ServerStat,
    /// List of server worker processes.
    ProcessList,
    /// List of known user accounts.
    UserList,
    /// Restart the server process.
    RestartServer,
    /// Database record counters and lock state.
    DatabaseInfo,
    /// Highest MFN of a database.
    MaxMfn,
    /// Create a database.
    CreateDatabase,
    /// Delete a database.
    DeleteDatabase,
    /// Truncate a database, keeping its shape.
    TruncateDatabase,
    /// Drop the whole-database lock.
    UnlockDatabase,
    /// Drop per-record locks.
    UnlockRecords,
    /// Rebuild the master file.
    ReloadMasterFile,
    /// Rebuild the dictionary.
    ReloadDictionary,
    /// Create the dictionary from scratch.
    CreateDictionary,
    /// Rebuild index entries for one record (or the whole database).
    ActualizeRecord,
    /// Read one record.
    ReadRecord,
    /// Write one record.
    WriteRecord,
    /// Write a batch of records.
    WriteRecords,
    /// Search the inverted index.
    Search,
    /// Read dictionary terms forward from a start term.
    ReadTerms,
    /// Read dictionary terms backward from a start term.
    ReadTermsReverse,
    /// Read postings of dictionary terms.
    ReadPostings,
    /// Execute a format over records.
    Format,
    /// Run a global correction batch.
    GlobalCorrection,
    /// Render a table.
    PrintTable,
    /// Read or write a server text file.
    TextFile,
    /// Enumerate server files by specification.
    ListFiles,
    /// Merge lines into the server INI profile.
    UpdateIniFile,
}

impl Command {
    /// The wire form of the command.
    pub fn as_str(self) -> &'static str {
        use Command::*;
        match self {
            Register => "A",
            Unregister => "B",
            Nop => "N",
            ServerInfo => "1",
            ServerStat => "+1",
            ProcessList => "+3",
            UserList => "+9",
            RestartServer => "+8",
            DatabaseInfo => "0",
            MaxMfn => "O",
            CreateDatabase => "T",
            DeleteDatabase => "W",
            TruncateDatabase => "S",
            UnlockDatabase => "U",
            UnlockRecords => "Q",
            ReloadMasterFile => "X",
            ReloadDictionary => "Y",
            CreateDictionary => "Z",
            ActualizeRecord => "F",
            ReadRecord => "C",
            WriteRecord => "D",
            WriteRecords => "6",
            Search => "K",
            ReadTerms => "H",
            ReadTermsReverse => "P",
            ReadPostings => "I",
            Format => "G",
            GlobalCorrection => "5",
            PrintTable => "7",
            TextFile => "L",
            ListFiles => "!",
            UpdateIniFile => "8",
        }
    }
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_forms() {
        assert_eq!(Command::Register.as_str(), "A");
        assert_eq!(Command::ServerStat.as_str(), "+1");
        assert_eq!(Command::WriteRecords.as_str(), "6");
        assert_eq!(Command::ListFiles.as_str(), "!");
        assert_eq!(Command::Search.to_string(), "K");
    }
}
