use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigError;

const DEFAULT_DATABASE: &str = "customers.db";

fn default_database() -> String {
    DEFAULT_DATABASE.to_string()
}

/// Settings read from the service YAML file.
///
/// The KDF parameters are deliberately absent: they are fixed in
/// `card_hash` so old and new records stay comparable.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServiceConfig {
    /// SQLite database file. Relative paths resolve against the directory
    /// holding the config file.
    #[serde(default = "default_database")]
    pub database: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            database: default_database(),
        }
    }
}

impl ServiceConfig {
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: ServiceConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and validate the config file at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    /// Like [`load`](Self::load), but a missing file yields the defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            log::info!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        Self::load(path)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database.trim().is_empty() {
            return Err(ConfigError::Invalid("database must not be empty".to_string()));
        }
        Ok(())
    }

    /// Database path, resolved against `base` when relative.
    pub fn database_path(&self, base: &Path) -> PathBuf {
        if Path::new(&self.database).is_absolute() {
            PathBuf::from(&self.database)
        } else {
            base.join(&self.database)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json;

    #[test]
    fn test_deserialize_config() {
        let json_data = r#"{ "database": "/var/lib/customers/customers.db" }"#;

        let config: ServiceConfig =
            serde_json::from_str(json_data).expect("Failed to deserialize config");
        assert_eq!(config.database, "/var/lib/customers/customers.db");
    }

    #[test]
    fn test_yaml_defaults() {
        let config = ServiceConfig::from_yaml("{}").unwrap();
        assert_eq!(config, ServiceConfig::default());
        assert_eq!(config.database, "customers.db");
    }

    #[test]
    fn test_yaml_rejects_empty_database() {
        let result = ServiceConfig::from_yaml("database: '  '");
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_yaml_parse_error() {
        let result = ServiceConfig::from_yaml("database: [unclosed");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_database_path_resolution() {
        let base = Path::new("/etc/customers");

        let relative = ServiceConfig::from_yaml("database: data/customers.db").unwrap();
        assert_eq!(
            relative.database_path(base),
            PathBuf::from("/etc/customers/data/customers.db")
        );

        let absolute = ServiceConfig::from_yaml("database: /tmp/c.db").unwrap();
        assert_eq!(absolute.database_path(base), PathBuf::from("/tmp/c.db"));
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = ServiceConfig::load_or_default(&dir.path().join("missing.yaml")).unwrap();
        assert_eq!(config, ServiceConfig::default());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("customers.yaml");
        std::fs::write(&path, "database: vault.db\n").unwrap();

        let config = ServiceConfig::load(&path).unwrap();
        assert_eq!(config.database, "vault.db");
    }
}
