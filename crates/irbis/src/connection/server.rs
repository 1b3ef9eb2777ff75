//! Administrative, database and file commands.

use super::Connection;
use crate::Result;
use irbis_res::{
    DatabaseInfo, FileSpecification, GblSettings, IniFile, MenuFile, ProcessInfo, ServerStat,
    TableDefinition, TreeFile, UserInfo, VersionInfo,
};
use irbis_wire::{Command, irbis_to_lines, irbis_to_unix};

impl Connection {
    /// Pings the server to keep the session alive.
    pub fn no_op(&mut self) -> Result<()> {
        self.require_connected()?;
        let query = self.query(Command::Nop);
        self.execute(&query)?;
        Ok(())
    }

    /// Fetches version and license counters.
    pub fn get_server_version(&mut self) -> Result<VersionInfo> {
        self.require_connected()?;
        let query = self.query(Command::ServerInfo);
        let mut response = self.execute(&query)?;
        self.check_return_code(&mut response, &[])?;
        let lines = response.read_remaining_ansi_lines();
        Ok(VersionInfo::parse(&lines))
    }

    /// Fetches server statistics with the running-client list.
    pub fn get_server_stat(&mut self) -> Result<ServerStat> {
        self.require_connected()?;
        let query = self.query(Command::ServerStat);
        let mut response = self.execute(&query)?;
        self.check_return_code(&mut response, &[])?;
        let lines = response.read_remaining_ansi_lines();
        Ok(ServerStat::parse(&lines))
    }

    /// Lists server worker processes.
    pub fn list_processes(&mut self) -> Result<Vec<ProcessInfo>> {
        self.require_connected()?;
        let query = self.query(Command::ProcessList);
        let mut response = self.execute(&query)?;
        self.check_return_code(&mut response, &[])?;
        let lines = response.read_remaining_ansi_lines();
        Ok(ProcessInfo::parse(&lines))
    }

    /// Lists user accounts known to the server.
    pub fn get_user_list(&mut self) -> Result<Vec<UserInfo>> {
        self.require_connected()?;
        let query = self.query(Command::UserList);
        let mut response = self.execute(&query)?;
        self.check_return_code(&mut response, &[])?;
        let lines = response.read_remaining_ansi_lines();
        Ok(UserInfo::parse(&lines))
    }

    /// Restarts the server process.
    pub fn restart_server(&mut self) -> Result<()> {
        self.require_connected()?;
        let query = self.query(Command::RestartServer);
        let mut response = self.execute(&query)?;
        self.check_return_code(&mut response, &[])?;
        Ok(())
    }

    /// Fetches record counters and lock state of a database.
    pub fn get_database_info(&mut self, database: &str) -> Result<DatabaseInfo> {
        self.require_connected()?;
        let database = self.pick_database(database);
        let mut query = self.query(Command::DatabaseInfo);
        query.add_ansi(&database).new_line();
        let mut response = self.execute(&query)?;
        self.check_return_code(&mut response, &[])?;
        let lines = response.read_remaining_ansi_lines();
        Ok(DatabaseInfo::parse_response(&database, &lines))
    }

    /// The current highest MFN of a database, plus one.
    pub fn get_max_mfn(&mut self, database: &str) -> Result<u32> {
        self.require_connected()?;
        let database = self.pick_database(database);
        let mut query = self.query(Command::MaxMfn);
        query.add_ansi(&database).new_line();
        let mut response = self.execute(&query)?;
        let code = self.check_return_code(&mut response, &[])?;
        Ok(code as u32)
    }

    /// Creates a database (administrator only).
    pub fn create_database(
        &mut self,
        database: &str,
        description: &str,
        reader_access: bool,
    ) -> Result<()> {
        self.require_connected()?;
        let mut query = self.query(Command::CreateDatabase);
        query.add_ansi(database).new_line();
        query.add_ansi(description).new_line();
        query.add_flag(reader_access).new_line();
        let mut response = self.execute(&query)?;
        self.check_return_code(&mut response, &[])?;
        Ok(())
    }

    /// Deletes a database (administrator only).
    pub fn delete_database(&mut self, database: &str) -> Result<()> {
        self.database_command(Command::DeleteDatabase, database)
    }

    /// Removes every record of a database, keeping its shape.
    pub fn truncate_database(&mut self, database: &str) -> Result<()> {
        self.database_command(Command::TruncateDatabase, database)
    }

    /// Drops the whole-database lock.
    pub fn unlock_database(&mut self, database: &str) -> Result<()> {
        self.database_command(Command::UnlockDatabase, database)
    }

    /// Rebuilds the master file of a database.
    pub fn reload_master_file(&mut self, database: &str) -> Result<()> {
        self.database_command(Command::ReloadMasterFile, database)
    }

    /// Rebuilds the dictionary of a database.
    pub fn reload_dictionary(&mut self, database: &str) -> Result<()> {
        self.database_command(Command::ReloadDictionary, database)
    }

    /// Creates the dictionary of a database from scratch.
    pub fn create_dictionary(&mut self, database: &str) -> Result<()> {
        self.database_command(Command::CreateDictionary, database)
    }

    fn database_command(&mut self, command: Command, database: &str) -> Result<()> {
        self.require_connected()?;
        let database = self.pick_database(database);
        let mut query = self.query(command);
        query.add_ansi(&database).new_line();
        let mut response = self.execute(&query)?;
        self.check_return_code(&mut response, &[])?;
        Ok(())
    }

    /// Drops the edit locks of the given records.
    pub fn unlock_records(&mut self, database: &str, mfns: &[u32]) -> Result<()> {
        self.require_connected()?;
        if mfns.is_empty() {
            return Ok(());
        }
        let database = self.pick_database(database);
        let mut query = self.query(Command::UnlockRecords);
        query.add_ansi(&database).new_line();
        for mfn in mfns {
            query.add(i64::from(*mfn)).new_line();
        }
        let mut response = self.execute(&query)?;
        self.check_return_code(&mut response, &[])?;
        Ok(())
    }

    /// Rebuilds index entries for one record so its content becomes
    /// searchable.
    pub fn actualize_record(&mut self, database: &str, mfn: u32) -> Result<()> {
        self.require_connected()?;
        let database = self.pick_database(database);
        let mut query = self.query(Command::ActualizeRecord);
        query.add_ansi(&database).new_line();
        query.add(i64::from(mfn)).new_line();
        let mut response = self.execute(&query)?;
        self.check_return_code(&mut response, &[])?;
        Ok(())
    }

    /// Rebuilds index entries for every record of a database.
    pub fn actualize_database(&mut self, database: &str) -> Result<()> {
        self.actualize_record(database, 0)
    }

    /// Reads a server text file; missing files come back empty.
    pub fn read_text_file(&mut self, specification: &FileSpecification) -> Result<String> {
        self.require_connected()?;
        let mut query = self.query(Command::TextFile);
        query.add_ansi(&specification.to_string()).new_line();
        let mut response = self.execute(&query)?;
        // The file content arrives directly, without a return code.
        let content = response.read_ansi();
        Ok(irbis_to_unix(&content))
    }

    /// Writes a server text file; the content rides in the
    /// specification.
    pub fn write_text_file(&mut self, specification: &FileSpecification) -> Result<()> {
        self.require_connected()?;
        let mut query = self.query(Command::TextFile);
        query.add_ansi(&specification.to_string()).new_line();
        self.execute(&query)?;
        Ok(())
    }

    /// Enumerates server files matching the given specifications
    /// (wildcards allowed).
    pub fn list_files(&mut self, specifications: &[FileSpecification]) -> Result<Vec<String>> {
        self.require_connected()?;
        if specifications.is_empty() {
            return Ok(Vec::new());
        }
        let mut query = self.query(Command::ListFiles);
        for specification in specifications {
            query.add_ansi(&specification.to_string()).new_line();
        }
        let mut response = self.execute(&query)?;
        let mut result = Vec::new();
        for line in response.read_remaining_ansi_lines() {
            for name in irbis_to_lines(&line) {
                if !name.is_empty() {
                    result.push(name);
                }
            }
        }
        Ok(result)
    }

    /// Merges lines into the server-side INI profile of the current
    /// user.
    pub fn update_ini_file(&mut self, lines: &[String]) -> Result<()> {
        self.require_connected()?;
        if lines.is_empty() {
            return Ok(());
        }
        let mut query = self.query(Command::UpdateIniFile);
        for line in lines {
            query.add_ansi(line).new_line();
        }
        self.execute(&query)?;
        Ok(())
    }

    /// Reads and parses a server menu file.
    pub fn read_menu_file(&mut self, specification: &FileSpecification) -> Result<MenuFile> {
        let content = self.read_text_file(specification)?;
        let lines: Vec<String> = content.lines().map(str::to_owned).collect();
        Ok(MenuFile::parse(&lines))
    }

    /// Reads and parses a server INI file.
    pub fn read_ini_file(&mut self, specification: &FileSpecification) -> Result<IniFile> {
        let content = self.read_text_file(specification)?;
        let lines: Vec<String> = content.lines().map(str::to_owned).collect();
        Ok(IniFile::parse(&lines))
    }

    /// Reads and parses a server tree file.
    pub fn read_tree_file(&mut self, specification: &FileSpecification) -> Result<TreeFile> {
        let content = self.read_text_file(specification)?;
        let lines: Vec<String> = content.lines().map(str::to_owned).collect();
        Ok(TreeFile::parse(&lines)?)
    }

    /// Lists databases from a catalog menu, `dbnam2.mnu` by default.
    pub fn list_databases(&mut self, menu_name: &str) -> Result<Vec<DatabaseInfo>> {
        let name = if menu_name.is_empty() {
            "dbnam2.mnu"
        } else {
            menu_name
        };
        let menu = self.read_menu_file(&FileSpecification::system(name))?;
        Ok(DatabaseInfo::parse_menu(&menu))
    }

    /// Runs a global correction batch and returns the server protocol
    /// lines.
    pub fn global_correction(&mut self, settings: &GblSettings) -> Result<Vec<String>> {
        self.require_connected()?;
        let database = self.pick_database(&settings.database);
        let mut query = self.query(Command::GlobalCorrection);
        query.add_ansi(&database).new_line();
        query.add_flag(settings.actualize).new_line();
        if settings.filename.is_empty() {
            query.add_utf(&settings.encode_statements()).new_line();
        } else {
            query.add_ansi(&format!("@{}", settings.filename)).new_line();
        }
        query.add_utf(&settings.search_expression).new_line();
        query.add(i64::from(settings.first_record)).new_line();
        query.add(i64::from(settings.number_of_records)).new_line();
        if settings.mfn_list.is_empty() {
            let count = settings.max_mfn.saturating_sub(settings.min_mfn) + 1;
            query.add(i64::from(count)).new_line();
            for mfn in settings.min_mfn..=settings.max_mfn {
                query.add(i64::from(mfn)).new_line();
            }
        } else {
            query.add(settings.mfn_list.len() as i64).new_line();
            for mfn in &settings.mfn_list {
                query.add(i64::from(*mfn)).new_line();
            }
        }
        if !settings.formal_control {
            query.add_ansi("*").new_line();
        }
        if !settings.autoin {
            query.add_ansi("&").new_line();
        }
        let mut response = self.execute(&query)?;
        self.check_return_code(&mut response, &[])?;
        Ok(response.read_remaining_ansi_lines())
    }

    /// Renders a table over a record set.
    pub fn print_table(&mut self, definition: &TableDefinition) -> Result<String> {
        self.require_connected()?;
        let database = self.pick_database(&definition.database);
        let mut query = self.query(Command::PrintTable);
        query.add_ansi(&database).new_line();
        query.add_ansi(&definition.table).new_line();
        // Placeholder for the header list, unused by current servers.
        query.new_line();
        query.add_ansi(&definition.mode).new_line();
        query.add_utf(&definition.search_query).new_line();
        query.add(i64::from(definition.min_mfn)).new_line();
        query.add(i64::from(definition.max_mfn)).new_line();
        query.add_utf(&definition.sequential_query).new_line();
        // Placeholder for the MFN list.
        query.new_line();
        let mut response = self.execute(&query)?;
        Ok(response.read_remaining_utf_text())
    }
}
