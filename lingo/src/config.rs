use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::error::Error;
use crate::target::Target;

/// Name of the optional per-directory configuration file.
pub const CONFIG_FILE: &str = "lingo.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file at {config_path}: {source}")]
    Read {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file at {config_path}: {source}")]
    Parse {
        config_path: PathBuf,
        source: toml::de::Error,
    },
}

/// Settings for a run over one directory.
///
/// ```toml
/// target = "zig"
/// document_extension = "md"
///
/// [targets.zig]
/// tag = "zig"
/// extension = "zig"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Profile to extract: a built-in name or a key of `targets`.
    pub target: String,
    /// Extension of the documents to convert, without the dot.
    pub document_extension: String,
    /// Extra profiles. These shadow built-ins with the same name.
    pub targets: BTreeMap<String, Target>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            target: "go".to_string(),
            document_extension: "md".to_string(),
            targets: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Load `path`, or the defaults when it doesn't exist.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let config_path = path.as_ref();
        if !config_path.exists() {
            return Ok(Config::default());
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| ConfigError::Read {
            config_path: config_path.to_path_buf(),
            source,
        })?;

        let config: Config = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            config_path: config_path.to_path_buf(),
            source,
        })?;
        log::info!("loaded {}", config_path.display());
        Ok(config)
    }

    pub fn load_from_dir<P: AsRef<Path>>(dir: P) -> Result<Self, ConfigError> {
        Self::load_from_path(dir.as_ref().join(CONFIG_FILE))
    }

    /// Resolve and validate the selected target profile.
    pub fn resolve_target(&self) -> Result<Target, Error> {
        let target = self
            .targets
            .get(&self.target)
            .cloned()
            .or_else(|| Target::builtin(&self.target))
            .ok_or_else(|| {
                Error::InvalidInput(format!("unknown target language '{}'", self.target))
            })?;
        target.validate()?;
        Ok(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from_dir(dir.path()).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.resolve_target().unwrap(), Target::go());
    }

    #[test]
    fn custom_profiles_are_loaded() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE),
            "target = \"zig\"\ndocument_extension = \"markdown\"\n\n[targets.zig]\ntag = \"zig\"\nextension = \"zig\"\n",
        )
        .unwrap();

        let config = Config::load_from_dir(dir.path()).unwrap();
        assert_eq!(config.document_extension, "markdown");
        assert_eq!(config.resolve_target().unwrap(), Target::new("zig", "zig", "//"));
    }

    #[test]
    fn unknown_target_is_invalid_input() {
        let config = Config {
            target: "cobol".to_string(),
            ..Config::default()
        };
        assert!(matches!(config.resolve_target(), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn malformed_file_names_its_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "target = [").unwrap();

        let err = Config::load_from_path(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains(CONFIG_FILE));
    }

    #[test]
    fn invalid_custom_profile_is_rejected() {
        let mut config = Config {
            target: "bad".to_string(),
            ..Config::default()
        };
        config
            .targets
            .insert("bad".to_string(), Target::new("", "txt", "//"));
        assert!(matches!(config.resolve_target(), Err(Error::InvalidInput(_))));
    }
}
