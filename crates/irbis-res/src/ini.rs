//! INI profiles, as handed out by the server on registration.

/// One `key=value` line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IniLine {
    pub key: String,
    pub value: String,
}

/// A `[name]` section with its lines in file order.
#[derive(Debug, Clone, Default)]
pub struct IniSection {
    pub name: String,
    pub lines: Vec<IniLine>,
}

impl IniSection {
    /// Case-insensitive key lookup.
    pub fn get_value<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.lines
            .iter()
            .find(|line| line.key.eq_ignore_ascii_case(key))
            .map_or(default, |line| line.value.as_str())
    }

    /// Sets or appends a key.
    pub fn set_value(&mut self, key: &str, value: &str) {
        match self
            .lines
            .iter_mut()
            .find(|line| line.key.eq_ignore_ascii_case(key))
        {
            Some(line) => line.value = value.to_owned(),
            None => self.lines.push(IniLine {
                key: key.to_owned(),
                value: value.to_owned(),
            }),
        }
    }
}

/// A whole INI profile, sections in file order.
#[derive(Debug, Clone, Default)]
pub struct IniFile {
    pub sections: Vec<IniSection>,
}

impl IniFile {
    /// Parses profile lines.
    ///
    /// `[name]` opens a section; `key=value` lines attach to the current
    /// one. Lines without `=`, or before any section, are dropped
    /// silently.
    pub fn parse(lines: &[String]) -> Self {
        let mut result = IniFile::default();
        for line in lines {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            if let Some(name) = trimmed.strip_prefix('[').and_then(|t| t.strip_suffix(']')) {
                result.sections.push(IniSection {
                    name: name.to_owned(),
                    lines: Vec::new(),
                });
            } else if let Some(section) = result.sections.last_mut() {
                if let Some((key, value)) = trimmed.split_once('=') {
                    section.lines.push(IniLine {
                        key: key.to_owned(),
                        value: value.to_owned(),
                    });
                }
            }
        }
        result
    }

    /// Case-insensitive section lookup.
    pub fn find_section(&self, name: &str) -> Option<&IniSection> {
        self.sections
            .iter()
            .find(|section| section.name.eq_ignore_ascii_case(name))
    }

    /// Value lookup across section and key.
    pub fn get_value<'a>(&'a self, section: &str, key: &str, default: &'a str) -> &'a str {
        self.find_section(section)
            .map_or(default, |s| s.get_value(key, default))
    }
}

impl std::fmt::Display for IniFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for section in &self.sections {
            writeln!(f, "[{}]", section.name)?;
            for line in &section.lines {
                writeln!(f, "{}={}", line.key, line.value)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parse_sections_and_lookup() {
        let ini = IniFile::parse(&lines(&[
            "orphan=dropped",
            "[Main]",
            "DBN=IBIS",
            "not a pair",
            "[private]",
            "User=reader",
        ]));
        assert_eq!(ini.sections.len(), 2);
        assert_eq!(ini.sections[0].lines.len(), 1);
        assert_eq!(ini.get_value("MAIN", "dbn", ""), "IBIS");
        assert_eq!(ini.get_value("Private", "USER", ""), "reader");
        assert_eq!(ini.get_value("Missing", "x", "fallback"), "fallback");
    }

    #[test]
    fn set_value_updates_in_place() {
        let mut section = IniSection {
            name: "Main".into(),
            lines: Vec::new(),
        };
        section.set_value("DBN", "IBIS");
        section.set_value("dbn", "RDR");
        assert_eq!(section.lines.len(), 1);
        assert_eq!(section.get_value("DBN", ""), "RDR");
    }

    #[test]
    fn display_renders_file_shape() {
        let ini = IniFile::parse(&lines(&["[Main]", "A=1"]));
        assert_eq!(ini.to_string(), "[Main]\nA=1\n");
    }
}
