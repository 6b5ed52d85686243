use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

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
}

/// Where word counts are displayed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusScope {
    #[default]
    PerSurface,
    Shared,
}

/// Editor overrides read from `config.toml`. Unset fields keep the editor defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code_block_placeholder: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link_default: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub words_per_minute: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tab_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_scope: Option<StatusScope>,
    /// Story opened when no file is given on the command line
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_path: Option<PathBuf>,
}

/// Location of the config file before tilde expansion
const CONFIG_FILE: &str = "~/.config/storyline/config.toml";

impl Config {
    /// Read a config file. A missing file is not an error: it yields `None`
    /// and the editor runs on its defaults.
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        let content = match std::fs::read_to_string(config_path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(ConfigError::ConfigReadError {
                    config_path: config_path.to_path_buf(),
                    source,
                });
            }
        };

        let config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;
        Ok(Some(config.with_expanded_paths()))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        Self::load_from_path(Self::config_path())
    }

    /// Write pretty TOML, creating the config directory if needed
    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(dir) = config_path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        std::fs::write(config_path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn save(&self) -> anyhow::Result<()> {
        self.save_to_path(Self::config_path())
    }

    pub fn config_path() -> PathBuf {
        PathBuf::from(shellexpand::tilde(CONFIG_FILE).as_ref())
    }

    /// Expand `~` and `$VARS` in the document path. Unexpandable paths are kept as written.
    fn with_expanded_paths(mut self) -> Self {
        if let Some(path) = self.document_path.take() {
            self.document_path = Some(Self::expand_path(&path).unwrap_or(path));
        }
        self
    }

    fn expand_path(path: &Path) -> Option<PathBuf> {
        shellexpand::full(&path.to_string_lossy())
            .ok()
            .map(|expanded| PathBuf::from(expanded.as_ref()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use tempfile::TempDir;

    #[test]
    fn test_config_path() {
        let config_path = Config::config_path();
        let path_str = config_path.to_string_lossy();

        assert!(!path_str.starts_with('~'));
        assert!(path_str.ends_with(".config/storyline/config.toml"));
    }

    #[test]
    fn test_empty_file_gives_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_partial_config() {
        let config: Config = toml::from_str(
            r#"
words_per_minute = 250
status_scope = "shared"
"#,
        )
        .unwrap();

        assert_eq!(config.words_per_minute, Some(250));
        assert_eq!(config.status_scope, Some(StatusScope::Shared));
        assert_eq!(config.placeholder_text, None);
    }

    #[test]
    fn test_unknown_status_scope_is_a_parse_error() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        std::fs::write(&config_file, "status_scope = \"everywhere\"\n").unwrap();

        let err = Config::load_from_path(&config_file).unwrap_err();
        assert!(matches!(err, ConfigError::ConfigParseError { .. }));
    }

    #[test]
    fn test_expand_path_with_tilde() {
        let path = PathBuf::from("~/stories/draft.md");
        let expanded = Config::expand_path(&path).unwrap();

        assert!(!expanded.to_string_lossy().starts_with('~'));
        assert!(expanded.to_string_lossy().contains("stories/draft.md"));
    }

    #[test]
    fn test_document_path_with_env_var_is_expanded_on_load() {
        unsafe {
            env::set_var("STORYLINE_TEST_ROOT", "/custom/stories");
        }

        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        std::fs::write(
            &config_file,
            "document_path = \"$STORYLINE_TEST_ROOT/draft.md\"\n",
        )
        .unwrap();

        let config = Config::load_from_path(&config_file).unwrap().unwrap();
        assert_eq!(
            config.document_path,
            Some(PathBuf::from("/custom/stories/draft.md"))
        );

        unsafe {
            env::remove_var("STORYLINE_TEST_ROOT");
        }
    }

    #[test]
    fn test_load_config_file_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let non_existent_config = temp_dir.path().join("nonexistent.toml");

        let result = Config::load_from_path(&non_existent_config).unwrap();

        assert!(result.is_none());
    }

    #[test]
    fn test_save_and_load_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("nested").join("config.toml");
        let test_config = Config {
            placeholder_text: Some("Once upon a time...".to_string()),
            words_per_minute: Some(180),
            status_scope: Some(StatusScope::PerSurface),
            document_path: Some(PathBuf::from("/tmp/story.md")),
            ..Config::default()
        };

        test_config.save_to_path(&config_file).unwrap();
        let loaded_config = Config::load_from_path(&config_file).unwrap().unwrap();

        assert_eq!(loaded_config, test_config);
        let written = std::fs::read_to_string(&config_file).unwrap();
        assert!(written.contains("status_scope = \"per_surface\""));
        assert!(!written.contains("tab_text"));
    }

    #[test]
    fn test_unset_variable_keeps_path_as_written() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        std::fs::write(
            &config_file,
            "document_path = \"$STORYLINE_UNSET_VARIABLE/draft.md\"\n",
        )
        .unwrap();

        let config = Config::load_from_path(&config_file).unwrap().unwrap();
        assert_eq!(
            config.document_path,
            Some(PathBuf::from("$STORYLINE_UNSET_VARIABLE/draft.md"))
        );
    }
}
