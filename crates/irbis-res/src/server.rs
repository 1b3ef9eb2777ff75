//! Server-side information structures.

/// Version and license counters of the server.
#[derive(Debug, Clone, Default)]
pub struct VersionInfo {
    /// Licensee organization.
    pub organization: String,
    /// Version proper, e.g. `64.2014`.
    pub version: String,
    /// Licensed connection limit.
    pub max_clients: u32,
    /// Connections currently in use.
    pub connected_clients: u32,
}

impl VersionInfo {
    /// Parses the version reply; older servers omit the organization
    /// line.
    pub fn parse(lines: &[String]) -> Self {
        let mut result = VersionInfo::default();
        match lines {
            [version, connected, max, ..] if lines.len() == 3 => {
                result.version = version.clone();
                result.connected_clients = connected.parse().unwrap_or(0);
                result.max_clients = max.parse().unwrap_or(0);
            }
            [organization, version, connected, max, ..] => {
                result.organization = organization.clone();
                result.version = version.clone();
                result.connected_clients = connected.parse().unwrap_or(0);
                result.max_clients = max.parse().unwrap_or(0);
            }
            _ => {}
        }
        result
    }
}

impl std::fmt::Display for VersionInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ({}/{})",
            self.version, self.connected_clients, self.max_clients
        )
    }
}

/// One connected client, as listed by the statistics command.
#[derive(Debug, Clone, Default)]
pub struct ClientInfo {
    pub number: String,
    pub ip_address: String,
    pub port: String,
    pub name: String,
    pub id: String,
    pub workstation: String,
    pub registered: String,
    pub acknowledged: String,
    pub last_command: String,
    pub command_number: String,
}

/// Server statistics with the running-client list.
#[derive(Debug, Clone, Default)]
pub struct ServerStat {
    /// Commands served since start.
    pub total_command_count: u32,
    /// Number of connected clients.
    pub client_count: u32,
    /// Clients as reported, one block each.
    pub running_clients: Vec<ClientInfo>,
}

impl ServerStat {
    /// Parses the statistics reply: three counters, then fixed-size
    /// client blocks.
    pub fn parse(lines: &[String]) -> Self {
        let mut result = ServerStat::default();
        let mut iter = lines.iter();
        let mut next = || iter.next().cloned().unwrap_or_default();
        result.total_command_count = next().parse().unwrap_or(0);
        result.client_count = next().parse().unwrap_or(0);
        let lines_per_client: usize = next().parse().unwrap_or(0);
        if lines_per_client == 0 {
            return result;
        }
        for _ in 0..result.client_count {
            let mut client = ClientInfo {
                number: next(),
                ip_address: next(),
                port: next(),
                name: next(),
                id: next(),
                workstation: next(),
                registered: next(),
                acknowledged: next(),
                last_command: next(),
                command_number: next(),
            };
            // Blocks longer than the ten known fields are skipped past.
            for _ in 10..lines_per_client {
                next();
            }
            if client.number.is_empty() && client.ip_address.is_empty() {
                break;
            }
            client.number = client.number.trim().to_owned();
            result.running_clients.push(client);
        }
        result
    }
}

/// One server worker process.
#[derive(Debug, Clone, Default)]
pub struct ProcessInfo {
    pub number: String,
    pub ip_address: String,
    pub name: String,
    pub client_id: String,
    pub workstation: String,
    pub started: String,
    pub last_command: String,
    pub command_number: String,
    pub process_id: String,
    pub state: String,
}

impl ProcessInfo {
    /// Parses the process-list reply: a count, a block size, then one
    /// block per process.
    pub fn parse(lines: &[String]) -> Vec<Self> {
        let mut result = Vec::new();
        if lines.len() < 2 {
            return result;
        }
        let process_count: usize = lines[0].parse().unwrap_or(0);
        let lines_per_process: usize = lines[1].parse().unwrap_or(0);
        if process_count == 0 || lines_per_process == 0 {
            return result;
        }
        let mut iter = lines[2..].iter();
        let mut next = || iter.next().cloned().unwrap_or_default();
        for _ in 0..process_count {
            let process = ProcessInfo {
                number: next(),
                ip_address: next(),
                name: next(),
                client_id: next(),
                workstation: next(),
                started: next(),
                last_command: next(),
                command_number: next(),
                process_id: next(),
                state: next(),
            };
            for _ in 10..lines_per_process {
                next();
            }
            result.push(process);
        }
        result
    }
}

impl std::fmt::Display for ProcessInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {}", self.number, self.ip_address, self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn version_with_and_without_organization() {
        let info = VersionInfo::parse(&lines(&["64.2014", "2", "100"]));
        assert!(info.organization.is_empty());
        assert_eq!(info.version, "64.2014");
        assert_eq!(info.connected_clients, 2);
        assert_eq!(info.max_clients, 100);

        let info = VersionInfo::parse(&lines(&["The Library", "64.2018", "5", "50"]));
        assert_eq!(info.organization, "The Library");
        assert_eq!(info.version, "64.2018");
        assert_eq!(info.to_string(), "64.2018 (5/50)");
    }

    #[test]
    fn stat_reads_client_blocks() {
        let stat = ServerStat::parse(&lines(&[
            "1024", "1", "10", "*", "127.0.0.1", "6666", "librarian", "334455", "C",
            "12:00:00", "12:05:00", "K", "12",
        ]));
        assert_eq!(stat.total_command_count, 1024);
        assert_eq!(stat.client_count, 1);
        assert_eq!(stat.running_clients.len(), 1);
        let client = &stat.running_clients[0];
        assert_eq!(client.ip_address, "127.0.0.1");
        assert_eq!(client.workstation, "C");
        assert_eq!(client.last_command, "K");
    }

    #[test]
    fn process_list_reads_blocks() {
        let list = ProcessInfo::parse(&lines(&[
            "2", "10",
            "1", "127.0.0.1", "librarian", "334455", "C", "12:00:00", "K", "12", "4242", "active",
            "2", "127.0.0.2", "admin", "334456", "A", "12:01:00", "1", "2", "4243", "active",
        ]));
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].process_id, "4242");
        assert_eq!(list[1].ip_address, "127.0.0.2");
        assert_eq!(list[0].to_string(), "1 127.0.0.1 librarian");
    }
}
