//! The session: client identity, lifecycle state machine, and the
//! transport-facing plumbing every command shares.
//!
//! A [`Connection`] is strictly single-user: commands run one at a time
//! on the calling thread, each over its own short-lived socket. To issue
//! requests in parallel, create one connection per worker; the type is
//! deliberately not shareable instead of carrying locks.

use crate::Result;
use crate::error::{Error, NETWORK_FAILURE};
use crate::workstation::Workstation;
use irbis_res::IniFile;
use irbis_transport::{TcpTransport, Transport};
use irbis_wire::{ClientQuery, Command, ServerResponse, prepare_format};
use rand::Rng;

mod records;
mod search;
mod server;

/// Return codes tolerated by record reads; deleted, versioned and locked
/// records still produce a usable body.
pub(crate) const READABLE_RECORD_CODES: &[i32] = &[-201, -600, -602, -603];

/// Return codes tolerated by term reads; walking off either end of the
/// dictionary is an answer, not a failure.
pub(crate) const TERM_EDGE_CODES: &[i32] = &[-202, -203, -204];

/// Registration attempts before a client-identifier collision becomes a
/// hard failure.
const MAX_REGISTRATION_ATTEMPTS: usize = 5;

/// A client session against one server.
pub struct Connection {
    /// Server host name or address.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Account name used for registration.
    pub username: String,
    /// Account password.
    pub password: String,
    /// Default database for commands that take one.
    pub database: String,
    /// Role the session registers under.
    pub workstation: Workstation,

    connected: bool,
    client_id: u32,
    query_id: u32,
    server_version: String,
    interval: i32,
    ini: IniFile,
    last_error: i32,
    transport: Option<Box<dyn Transport>>,
}

impl Connection {
    /// A blank session pointing at a local server with the stock
    /// catalog database.
    pub fn new() -> Self {
        Connection {
            host: "127.0.0.1".to_owned(),
            port: 6666,
            username: String::new(),
            password: String::new(),
            database: "IBIS".to_owned(),
            workstation: Workstation::default(),
            connected: false,
            client_id: 0,
            query_id: 0,
            server_version: String::new(),
            interval: 0,
            ini: IniFile::default(),
            last_error: 0,
            transport: None,
        }
    }

    /// Substitutes the transport; used by tests and tunneled setups.
    /// Without one, every exchange opens a fresh TCP connection to
    /// `host:port`.
    pub fn with_transport(mut self, transport: Box<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Whether the session is registered with the server.
    pub fn connected(&self) -> bool {
        self.connected
    }

    /// The client identifier drawn at registration.
    pub fn client_id(&self) -> u32 {
        self.client_id
    }

    /// The sequence number the next exchange will carry.
    pub fn query_id(&self) -> u32 {
        self.query_id
    }

    /// The last return code received, or [`NETWORK_FAILURE`] after a
    /// transport failure.
    pub fn last_error(&self) -> i32 {
        self.last_error
    }

    /// Server version reported at registration.
    pub fn server_version(&self) -> &str {
        &self.server_version
    }

    /// Keep-alive interval in minutes suggested at registration.
    pub fn interval(&self) -> i32 {
        self.interval
    }

    /// The INI profile handed out at registration.
    pub fn ini(&self) -> &IniFile {
        &self.ini
    }

    /// Turns the last negative return code into an error; a convenience
    /// for callers using the soft-failure style.
    pub fn throw_on_error(&self) -> Result<()> {
        if self.last_error < 0 {
            Err(Error::protocol(self.last_error))
        } else {
            Ok(())
        }
    }

    /// Registers the client. Idempotent while connected.
    ///
    /// A `-3337` reply means another session holds the drawn client
    /// identifier; the identity is dropped, redrawn and registration is
    /// retried, a bounded number of times.
    pub fn connect(&mut self) -> Result<()> {
        if self.connected {
            return Ok(());
        }
        if self.host.is_empty() {
            return Err(Error::Incomplete("host"));
        }
        if self.port == 0 {
            return Err(Error::Incomplete("port"));
        }
        if self.username.is_empty() {
            return Err(Error::Incomplete("username"));
        }
        if self.password.is_empty() {
            return Err(Error::Incomplete("password"));
        }

        let mut rng = rand::thread_rng();
        for attempt in 1..=MAX_REGISTRATION_ATTEMPTS {
            self.query_id = 1;
            self.client_id = rng.gen_range(100_000..=999_999);
            let mut query = self.query(Command::Register);
            query.add_ansi(&self.username).new_line();
            query.add_ansi(&self.password).new_line();

            let mut response = self.execute(&query)?;
            let code = response.get_return_code();
            self.last_error = code;
            if code == -3337 {
                log::debug!(
                    "client id {} already registered, redrawing (attempt {attempt})",
                    self.client_id
                );
                continue;
            }
            if code < 0 {
                log::warn!("registration refused with code {code}");
                return Err(Error::protocol(code));
            }

            self.connected = true;
            self.server_version = response.server_version.clone();
            self.interval = response.interval;
            let lines = response.read_remaining_ansi_lines();
            self.ini = IniFile::parse(&lines);
            log::debug!(
                "registered as {} (client id {}, server {})",
                self.username,
                self.client_id,
                self.server_version
            );
            return Ok(());
        }
        log::warn!("registration kept colliding, giving up");
        Err(Error::protocol(-3337))
    }

    /// Unregisters the client.
    ///
    /// The farewell frame is best-effort: the session is marked
    /// disconnected even when the server is already gone. Safe to call
    /// repeatedly.
    pub fn disconnect(&mut self) -> Result<()> {
        if !self.connected {
            return Ok(());
        }
        let mut query = self.query(Command::Unregister);
        query.add_ansi(&self.username).new_line();
        if let Err(error) = self.execute(&query) {
            log::warn!("farewell frame failed, disconnecting anyway: {error}");
        }
        self.connected = false;
        log::debug!("disconnected");
        Ok(())
    }

    /// Starts a query frame with the session header.
    pub(crate) fn query(&self, command: Command) -> ClientQuery {
        ClientQuery::new(
            command,
            self.workstation.code(),
            self.client_id,
            self.query_id,
            &self.username,
            &self.password,
        )
    }

    /// Runs one exchange.
    ///
    /// The query counter advances only when the exchange raised no
    /// transport failure, so serial numbering skips failed attempts. A
    /// failure records the synthetic network code and leaves `connected`
    /// untouched; a later disconnect still sends its best-effort frame.
    pub(crate) fn execute(&mut self, query: &ClientQuery) -> Result<ServerResponse> {
        let packet = query.encode();
        let answer = match self.transport.as_mut() {
            Some(transport) => transport.talk_to_server(&packet),
            None => TcpTransport::new(self.host.as_str(), self.port).talk_to_server(&packet),
        };
        match answer {
            Ok(buffer) => {
                self.query_id += 1;
                let response = ServerResponse::from_bytes(buffer);
                if !response.ok() {
                    self.last_error = NETWORK_FAILURE;
                    return Err(Error::EmptyResponse);
                }
                Ok(response)
            }
            Err(error) => {
                self.last_error = NETWORK_FAILURE;
                log::warn!("exchange failed: {error}");
                Err(error.into())
            }
        }
    }

    /// Reads the return code, records it, and applies the command's
    /// whitelist of tolerated negative codes.
    pub(crate) fn check_return_code(
        &mut self,
        response: &mut ServerResponse,
        allowed: &[i32],
    ) -> Result<i32> {
        let code = response.get_return_code();
        self.last_error = code;
        if code < 0 && !allowed.contains(&code) {
            log::debug!("command refused with code {code}");
            return Err(Error::protocol(code));
        }
        Ok(code)
    }

    /// Guards every post-registration command.
    pub(crate) fn require_connected(&self) -> Result<()> {
        if self.connected {
            Ok(())
        } else {
            Err(Error::NotConnected)
        }
    }

    /// The database a command should address.
    pub(crate) fn pick_database(&self, wanted: &str) -> String {
        if wanted.is_empty() {
            self.database.clone()
        } else {
            wanted.to_owned()
        }
    }

    /// Applies the configuration from a `key=value;` connection string.
    ///
    /// Keys are case-insensitive and may repeat; unknown keys are a hard
    /// failure rather than silently ignored configuration.
    pub fn parse_connection_string(&mut self, text: &str) -> Result<()> {
        for item in text.split(';') {
            let item = item.trim();
            if item.is_empty() {
                continue;
            }
            let Some((key, value)) = item.split_once('=') else {
                return Err(Error::ConnectionString(item.to_owned()));
            };
            let value = value.trim();
            match key.trim().to_ascii_lowercase().as_str() {
                "host" | "server" | "address" => self.host = value.to_owned(),
                "port" => {
                    self.port = value
                        .parse()
                        .map_err(|_| Error::ConnectionString(item.to_owned()))?;
                }
                "user" | "username" | "name" | "login" => self.username = value.to_owned(),
                "pwd" | "password" => self.password = value.to_owned(),
                "db" | "database" | "catalog" => self.database = value.to_owned(),
                "arm" | "workstation" => {
                    let code = value
                        .chars()
                        .next()
                        .ok_or_else(|| Error::ConnectionString(item.to_owned()))?;
                    self.workstation = Workstation::try_from(code)?;
                }
                _ => return Err(Error::ConnectionString(item.to_owned())),
            }
        }
        Ok(())
    }

    /// Renders the configuration back into a connection string.
    pub fn to_connection_string(&self) -> String {
        format!(
            "host={};port={};username={};password={};database={};arm={};",
            self.host, self.port, self.username, self.password, self.database, self.workstation
        )
    }
}

impl Default for Connection {
    fn default() -> Self {
        Connection::new()
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        if self.connected {
            let _ = self.disconnect();
        }
    }
}

/// Appends a format line under the prefix rules: `@name` references a
/// server-side format file and stays in the legacy encoding, `!...`
/// is an inline format sent as UTF-8, anything else gets the `!` prefix.
pub(crate) fn add_format_line(query: &mut ClientQuery, format: &str) {
    let prepared = prepare_format(format);
    if prepared.is_empty() {
        query.new_line();
    } else if prepared.starts_with('@') {
        query.add_ansi(&prepared).new_line();
    } else if prepared.starts_with('!') {
        query.add_utf(&prepared).new_line();
    } else {
        query.add_utf(&format!("!{prepared}")).new_line();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connection_string_round_trip() {
        let mut connection = Connection::new();
        connection
            .parse_connection_string("host=srv;port=5555;user=u;pwd=p;db=CAT;arm=A")
            .unwrap();
        assert_eq!(connection.host, "srv");
        assert_eq!(connection.port, 5555);
        assert_eq!(connection.username, "u");
        assert_eq!(connection.password, "p");
        assert_eq!(connection.database, "CAT");
        assert_eq!(connection.workstation, Workstation::Administrator);
        assert_eq!(
            connection.to_connection_string(),
            "host=srv;port=5555;username=u;password=p;database=CAT;arm=A;"
        );
    }

    #[test]
    fn connection_string_rejects_unknown_keys() {
        let mut connection = Connection::new();
        let result = connection.parse_connection_string("host=srv;foo=bar;");
        assert!(matches!(result, Err(Error::ConnectionString(item)) if item == "foo=bar"));
        let result = connection.parse_connection_string("port=notanumber;");
        assert!(matches!(result, Err(Error::ConnectionString(_))));
    }

    #[test]
    fn connect_requires_credentials() {
        let mut connection = Connection::new();
        connection.username = "u".into();
        assert!(matches!(
            connection.connect(),
            Err(Error::Incomplete("password"))
        ));
    }

    #[test]
    fn commands_demand_registration() {
        let mut connection = Connection::new();
        assert!(matches!(
            connection.get_max_mfn(""),
            Err(Error::NotConnected)
        ));
        assert!(matches!(connection.search("K=x"), Err(Error::NotConnected)));
    }
}
