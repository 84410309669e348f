//! INI file configuration adapter.

use crate::ports::config_port::ConfigPort;
use configparser::ini::Ini;
use std::path::Path;

pub struct FileConfigAdapter {
    config: Ini,
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let mut config = Ini::new();
        config.load(path).map_err(std::io::Error::other)?;
        Ok(Self { config })
    }

    pub fn from_string(content: &str) -> Result<Self, String> {
        let mut config = Ini::new();
        config.read(content.to_string())?;
        Ok(Self { config })
    }

    fn parse_bool(value: &str) -> Option<bool> {
        match value.to_lowercase().as_str() {
            "true" | "yes" | "1" => Some(true),
            "false" | "no" | "0" => Some(false),
            _ => None,
        }
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.config.get(section, key)
    }

    fn get_int(&self, section: &str, key: &str, default: i64) -> i64 {
        self.config
            .getint(section, key)
            .ok()
            .flatten()
            .unwrap_or(default)
    }

    fn get_double(&self, section: &str, key: &str, default: f64) -> f64 {
        self.config
            .getfloat(section, key)
            .ok()
            .flatten()
            .unwrap_or(default)
    }

    fn get_bool(&self, section: &str, key: &str, default: bool) -> bool {
        self.config
            .get(section, key)
            .as_ref()
            .and_then(|v| Self::parse_bool(v))
            .unwrap_or(default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SAMPLE: &str = r#"
[database]
path = stocksim.db
pool_size = 8

[web]
listen = 127.0.0.1:8080
session_lifetime = 3600

[quotes]
base_url = https://quotes.example.com

[trading]
starting_cash = 10000.00
"#;

    #[test]
    fn from_string_parses_all_sections() {
        let adapter = FileConfigAdapter::from_string(SAMPLE).unwrap();
        assert_eq!(
            adapter.get_string("database", "path"),
            Some("stocksim.db".to_string())
        );
        assert_eq!(adapter.get_int("database", "pool_size", 4), 8);
        assert_eq!(
            adapter.get_string("web", "listen"),
            Some("127.0.0.1:8080".to_string())
        );
        assert_eq!(adapter.get_int("web", "session_lifetime", 86400), 3600);
        assert_eq!(adapter.get_double("trading", "starting_cash", 0.0), 10000.0);
    }

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let adapter = FileConfigAdapter::from_string("[database]\npath = a.db\n").unwrap();
        assert_eq!(adapter.get_string("web", "listen"), None);
        assert_eq!(adapter.get_int("database", "pool_size", 4), 4);
        assert_eq!(adapter.get_double("trading", "starting_cash", 10000.0), 10000.0);
        assert!(adapter.get_bool("web", "secure_cookies", true));
    }

    #[test]
    fn non_numeric_values_fall_back_to_defaults() {
        let adapter =
            FileConfigAdapter::from_string("[database]\npool_size = lots\n").unwrap();
        assert_eq!(adapter.get_int("database", "pool_size", 4), 4);
    }

    #[test]
    fn bool_values_parse_common_spellings() {
        let adapter =
            FileConfigAdapter::from_string("[web]\na = true\nb = no\nc = 1\n").unwrap();
        assert!(adapter.get_bool("web", "a", false));
        assert!(!adapter.get_bool("web", "b", true));
        assert!(adapter.get_bool("web", "c", false));
    }

    #[test]
    fn from_file_reads_config() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{SAMPLE}").unwrap();
        let adapter = FileConfigAdapter::from_file(file.path()).unwrap();
        assert_eq!(
            adapter.get_string("quotes", "base_url"),
            Some("https://quotes.example.com".to_string())
        );
    }

    #[test]
    fn from_file_returns_error_for_missing_file() {
        assert!(FileConfigAdapter::from_file("/nonexistent/stocksim.ini").is_err());
    }
}
