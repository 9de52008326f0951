use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use vaultmark_engine::{ConvertOptions, LineEnding};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid value for `{field}` in {config_path}: {message}")]
    InvalidValue {
        config_path: PathBuf,
        field: &'static str,
        message: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub vault_path: PathBuf,
    #[serde(default)]
    pub conversion: ConversionConfig,
}

/// The `[conversion]` table. Every key is optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversionConfig {
    pub list_indent: usize,
    pub diagram_language: String,
    pub preview_prefix: String,
    pub video_hosts: Vec<String>,
    pub line_ending: LineEnding,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        let defaults = ConvertOptions::default();
        Self {
            list_indent: defaults.list_indent,
            diagram_language: defaults.diagram_language,
            preview_prefix: defaults.preview_prefix,
            video_hosts: defaults.video_hosts,
            line_ending: defaults.line_ending,
        }
    }
}

impl From<&ConversionConfig> for ConvertOptions {
    fn from(c: &ConversionConfig) -> Self {
        ConvertOptions {
            list_indent: c.list_indent,
            diagram_language: c.diagram_language.clone(),
            preview_prefix: c.preview_prefix.clone(),
            video_hosts: c.video_hosts.clone(),
            line_ending: c.line_ending,
        }
    }
}

impl Config {
    pub fn new(vault_path: impl Into<PathBuf>) -> Self {
        Self {
            vault_path: vault_path.into(),
            conversion: ConversionConfig::default(),
        }
    }

    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let mut config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        if config.conversion.list_indent == 0 {
            return Err(ConfigError::InvalidValue {
                config_path: config_path.to_path_buf(),
                field: "conversion.list_indent",
                message: "must be at least 1".to_string(),
            });
        }
        if config.conversion.diagram_language.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                config_path: config_path.to_path_buf(),
                field: "conversion.diagram_language",
                message: "must not be empty".to_string(),
            });
        }

        config.vault_path = Self::expand_path(&config.vault_path).unwrap_or(config.vault_path);

        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/vaultmark");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    pub fn convert_options(&self) -> ConvertOptions {
        ConvertOptions::from(&self.conversion)
    }

    fn expand_path(path: &Path) -> Option<PathBuf> {
        let path_str = path.to_string_lossy();
        match shellexpand::full(&path_str) {
            Ok(expanded) => Some(PathBuf::from(expanded.as_ref())),
            Err(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::env;
    use tempfile::TempDir;

    fn write_config(content: &str) -> (TempDir, PathBuf) {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        std::fs::write(&config_file, content).unwrap();
        (temp_dir, config_file)
    }

    #[test]
    fn test_config_path() {
        let config_path = Config::config_path();
        let path_str = config_path.to_string_lossy();

        assert!(!path_str.starts_with('~'));
        assert!(path_str.ends_with(".config/vaultmark/config.toml"));
    }

    #[test]
    fn test_missing_conversion_table_uses_defaults() {
        let (_dir, config_file) = write_config(r#"vault_path = "/tmp/vault""#);
        let config = Config::load_from_path(&config_file).unwrap().unwrap();

        assert_eq!(config.vault_path, PathBuf::from("/tmp/vault"));
        assert_eq!(config.convert_options(), ConvertOptions::default());
    }

    #[test]
    fn test_partial_conversion_table() {
        let (_dir, config_file) = write_config(
            r#"
vault_path = "/tmp/vault"

[conversion]
list_indent = 2
line_ending = "crlf"
video_hosts = ["vimeo.com"]
"#,
        );
        let options = Config::load_from_path(&config_file).unwrap().unwrap().convert_options();

        assert_eq!(options.list_indent, 2);
        assert_eq!(options.line_ending, LineEnding::Crlf);
        assert_eq!(options.video_hosts, vec!["vimeo.com".to_string()]);
        assert_eq!(options.diagram_language, "mermaid");
    }

    #[test]
    fn test_zero_indent_is_rejected() {
        let (_dir, config_file) = write_config(
            r#"
vault_path = "/tmp/vault"
[conversion]
list_indent = 0
"#,
        );
        let err = Config::load_from_path(&config_file).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                field: "conversion.list_indent",
                ..
            }
        ));
    }

    #[test]
    fn test_unknown_line_ending_is_a_parse_error() {
        let (_dir, config_file) = write_config(
            r#"
vault_path = "/tmp/vault"
[conversion]
line_ending = "cr"
"#,
        );
        let err = Config::load_from_path(&config_file).unwrap_err();
        assert!(matches!(err, ConfigError::ConfigParseError { .. }));
    }

    #[test]
    fn test_expand_path_with_env_var() {
        unsafe {
            env::set_var("VAULTMARK_TEST_ROOT", "/test/env/path");
        }

        let path = PathBuf::from("$VAULTMARK_TEST_ROOT/vault");
        let expanded = Config::expand_path(&path).unwrap();
        assert_eq!(expanded, PathBuf::from("/test/env/path/vault"));

        unsafe {
            env::remove_var("VAULTMARK_TEST_ROOT");
        }
    }

    #[test]
    fn test_tilde_in_vault_path_is_expanded_on_load() {
        let (_dir, config_file) = write_config(r#"vault_path = "~/notes/vault""#);
        let config = Config::load_from_path(&config_file).unwrap().unwrap();

        let path = config.vault_path.to_string_lossy();
        assert!(!path.starts_with('~'));
        assert!(path.ends_with("notes/vault"));
    }

    #[test]
    fn test_load_config_file_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let result = Config::load_from_path(temp_dir.path().join("nonexistent.toml")).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_save_and_load_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("nested/config.toml");
        let mut config = Config::new("/tmp/test-vault");
        config.conversion.preview_prefix = "card:".to_string();

        config.save_to_path(&config_file).unwrap();
        let loaded = Config::load_from_path(&config_file).unwrap().unwrap();

        assert_eq!(loaded, config);
    }
}
