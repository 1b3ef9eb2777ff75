use clap::{Parser, Subcommand};
use irbis::{Connection, Workstation};

#[derive(Parser)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Whole configuration as a `key=value;` connection string;
    /// individual flags override its elements.
    #[arg(long)]
    pub connection_string: Option<String>,

    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,
    #[arg(long, default_value_t = 6666)]
    pub port: u16,

    #[arg(short, long, default_value = "")]
    pub username: String,
    #[arg(short, long, default_value = "")]
    pub password: String,

    /// Default database.
    #[arg(short, long, default_value = "IBIS")]
    pub database: String,

    /// Workstation role letter (A, C, M, R, B or K).
    #[arg(long, default_value = "C")]
    pub workstation: char,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Prints the server version and license counters.
    Version,
    /// Prints the databases of the server catalog menu.
    Databases,
    /// Prints the highest MFN of the database.
    MaxMfn,
    /// Searches and prints matching MFNs.
    Search {
        /// Search expression in the inverted-index language.
        expression: String,
    },
    /// Reads a record and prints its fields.
    Read {
        /// Masterfile number of the record.
        mfn: u32,
    },
    /// Formats a record with a server-side format.
    Format {
        /// Format expression, or `@name` for a server format file.
        format: String,
        /// Masterfile number of the record.
        mfn: u32,
    },
    /// Lists dictionary terms under a prefix.
    Terms {
        /// Term prefix, e.g. `K=`.
        prefix: String,
    },
}

impl Cli {
    pub fn make_connection(&self) -> irbis::Result<Connection> {
        let mut connection = Connection::new();
        if let Some(text) = &self.connection_string {
            connection.parse_connection_string(text)?;
        } else {
            connection.host = self.host.clone();
            connection.port = self.port;
            connection.username = self.username.clone();
            connection.password = self.password.clone();
            connection.database = self.database.clone();
            connection.workstation = Workstation::try_from(self.workstation)?;
        }
        Ok(connection)
    }
}
