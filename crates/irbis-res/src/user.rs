//! User accounts known to the server.

/// One user account with its per-role INI profiles.
#[derive(Debug, Clone, Default)]
pub struct UserInfo {
    pub number: String,
    pub name: String,
    pub password: String,
    /// Profile used by the cataloger workstation.
    pub cataloger: String,
    pub reader: String,
    pub circulation: String,
    pub acquisitions: String,
    pub provision: String,
    pub administrator: String,
}

impl UserInfo {
    /// Parses the user-list reply: a count, a block size, then one block
    /// of nine lines per user.
    pub fn parse(lines: &[String]) -> Vec<Self> {
        let mut result = Vec::new();
        if lines.len() < 2 {
            return result;
        }
        let user_count: usize = lines[0].parse().unwrap_or(0);
        let lines_per_user: usize = lines[1].parse().unwrap_or(0);
        if user_count == 0 || lines_per_user == 0 {
            return result;
        }
        let mut iter = lines[2..].iter();
        let mut next = || iter.next().cloned().unwrap_or_default();
        for _ in 0..user_count {
            let user = UserInfo {
                number: next(),
                name: next(),
                password: next(),
                cataloger: next(),
                reader: next(),
                circulation: next(),
                acquisitions: next(),
                provision: next(),
                administrator: next(),
            };
            for _ in 9..lines_per_user {
                next();
            }
            if user.name.is_empty() {
                break;
            }
            result.push(user);
        }
        result
    }
}

impl std::fmt::Display for UserInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_reads_user_blocks() {
        let lines: Vec<String> = [
            "2", "9",
            "1", "librarian", "secret", "irbisc.ini", "irbisr.ini", "irbisb.ini", "irbism.ini",
            "irbisk.ini", "irbisa.ini",
            "2", "reader", "", "", "irbisr.ini", "", "", "", "",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();
        let users = UserInfo::parse(&lines);
        assert_eq!(users.len(), 2);
        assert_eq!(users[0].name, "librarian");
        assert_eq!(users[0].cataloger, "irbisc.ini");
        assert_eq!(users[1].reader, "irbisr.ini");
        assert_eq!(users[1].to_string(), "reader");
    }
}
