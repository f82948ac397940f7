//! Configuration file support for lens-query.
//!
//! # Configuration File Format
//!
//! ```toml
//! [builder]
//! search_base = "https://www.lens.org/lens/search"
//! paged_base = "https://www.lens.org/lens/search"
//! page_size = 50
//! max_results = 500
//!
//! [fetch]
//! request_delay_secs = 20
//! timeout_secs = 30
//!
//! [logging]
//! level = "info"
//! ```

use std::path::Path;

use super::Config;

impl Config {
    /// Load configuration from a TOML file, without environment overrides
    pub fn load(path: &Path) -> Result<Self, ConfigFileError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigFileError::Io(e.to_string()))?;

        let config: Config =
            toml::from_str(&content).map_err(|e| ConfigFileError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save(&self, path: &Path) -> Result<(), ConfigFileError> {
        let content =
            toml::to_string_pretty(self).map_err(|e| ConfigFileError::Serialize(e.to_string()))?;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| ConfigFileError::Io(e.to_string()))?;
            }
        }

        std::fs::write(path, content).map_err(|e| ConfigFileError::Io(e.to_string()))
    }
}

/// Configuration file errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigFileError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Serialize error: {0}")]
    Serialize(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Configuration error: {0}")]
    Source(#[from] config::ConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::tempdir;

    #[test]
    fn test_config_file_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let toml_content = r#"
[builder]
search_base = "https://mirror.example.org/lens/search"
page_size = 25
max_results = 250

[fetch]
request_delay_secs = 5
user_agent = "patent-bot/1.0"

[logging]
level = "debug"
"#;

        let mut file = File::create(&path).unwrap();
        file.write_all(toml_content.as_bytes()).unwrap();

        let config = Config::load(&path).unwrap();

        assert_eq!(
            config.builder.search_base,
            "https://mirror.example.org/lens/search"
        );
        assert_eq!(config.builder.page_size, 25);
        assert_eq!(config.builder.max_results, 250);
        assert_eq!(config.fetch.request_delay_secs, 5);
        assert_eq!(config.fetch.user_agent, Some("patent-bot/1.0".to_string()));
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_config_file_save_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.fetch.request_delay_secs = 3;
        config.builder.page_size = 10;

        config.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_config_file_nonexistent() {
        let path = PathBuf::from("/nonexistent/config.toml");
        let result = Config::load(&path);
        assert!(matches!(result, Err(ConfigFileError::Io(_))));
    }

    #[test]
    fn test_config_file_invalid_toml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("invalid.toml");

        std::fs::write(&path, "invalid = toml = content").unwrap();

        let result = Config::load(&path);
        assert!(matches!(result, Err(ConfigFileError::Parse(_))));
    }

    #[test]
    fn test_config_file_invalid_values() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");

        std::fs::write(&path, "[builder]\npage_size = 0\n").unwrap();

        let result = Config::load(&path);
        assert!(matches!(result, Err(ConfigFileError::Invalid(_))));
    }
}
