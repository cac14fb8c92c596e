use crate::store::FileStore;
use serde::Deserialize;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Program configuration read from a configuration file
#[derive(Clone, Deserialize, Debug, Default, Eq, PartialEq)]
pub(crate) struct Config {
    /// Settings about data files
    #[serde(default)]
    pub(crate) files: FileConfig,

    /// Gameplay settings
    #[serde(default)]
    pub(crate) game: GameConfig,
}

impl Config {
    /// Return the default configuration file path
    pub(crate) fn default_path() -> Result<PathBuf, ConfigError> {
        dirs::config_local_dir()
            .map(|p| p.join("daily-snake").join("config.toml"))
            .ok_or(ConfigError::NoPath)
    }

    /// Read configuration from a file on disk.  If the file does not exist and
    /// `allow_missing` is true, a default `Config` value is returned.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the file could not be read or if the file's contents
    /// could not be deserialized.
    pub(crate) fn load(path: &Path, allow_missing: bool) -> Result<Config, ConfigError> {
        let content = match fs_err::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound && allow_missing => {
                return Ok(Config::default())
            }
            Err(e) => return Err(ConfigError::Read(e)),
        };
        toml::from_str(&content).map_err(Into::into)
    }

    /// Return the filepath at which progress should be stored: the file given
    /// in the configuration or, if that is not set, the default progress file
    /// path.  Returns `None` if progress isn't to be saved or if no path is
    /// configured and the default path could not be computed.
    pub(crate) fn progress_file(&self) -> Option<Cow<'_, Path>> {
        if !self.files.save_progress {
            return None;
        }
        self.files
            .progress_file
            .as_deref()
            .map(Cow::from)
            .or_else(|| FileStore::default_path().map(Cow::from))
    }
}

#[derive(Clone, Deserialize, Debug, Eq, PartialEq)]
#[serde(try_from = "RawFileConfig")]
pub(crate) struct FileConfig {
    /// Path at which progress & high scores should be stored
    progress_file: Option<PathBuf>,

    /// Whether to load & save progress in a file
    save_progress: bool,
}

impl Default for FileConfig {
    fn default() -> FileConfig {
        FileConfig {
            progress_file: None,
            save_progress: true,
        }
    }
}

#[derive(Clone, Deserialize, Debug, Eq, PartialEq)]
#[serde(default, rename_all = "kebab-case")]
struct RawFileConfig {
    progress_file: Option<String>,
    save_progress: bool,
}

impl Default for RawFileConfig {
    fn default() -> RawFileConfig {
        RawFileConfig {
            progress_file: None,
            save_progress: true,
        }
    }
}

impl TryFrom<RawFileConfig> for FileConfig {
    type Error = std::io::Error;

    fn try_from(value: RawFileConfig) -> Result<FileConfig, std::io::Error> {
        Ok(FileConfig {
            progress_file: value.progress_file.map(expanduser::expanduser).transpose()?,
            save_progress: value.save_progress,
        })
    }
}

#[derive(Clone, Copy, Deserialize, Debug, Default, Eq, PartialEq)]
#[serde(default, rename_all = "kebab-case")]
pub(crate) struct GameConfig {
    /// Use the small, fixed daily puzzle meant for testing
    pub(crate) debug: bool,
}

#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    #[error("failed to determine path to local configuration directory")]
    NoPath,
    #[error("failed to read configuration file")]
    Read(#[from] std::io::Error),
    #[error("failed to parse configuration file")]
    Parse(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn empty_config() {
        let config = toml::from_str::<Config>("").unwrap();
        assert_eq!(config, Config::default());
        assert!(config.files.save_progress);
        assert!(!config.game.debug);
    }

    #[test]
    fn full_config() {
        let config = toml::from_str::<Config>(concat!(
            "[files]\n",
            "progress-file = \"/tmp/snake/progress.json\"\n",
            "save-progress = true\n",
            "\n",
            "[game]\n",
            "debug = true\n",
        ))
        .unwrap();
        assert_eq!(
            config.progress_file().as_deref(),
            Some(Path::new("/tmp/snake/progress.json"))
        );
        assert!(config.game.debug);
    }

    #[test]
    fn no_saving() {
        let config = toml::from_str::<Config>(concat!(
            "[files]\n",
            "progress-file = \"/tmp/snake/progress.json\"\n",
            "save-progress = false\n",
        ))
        .unwrap();
        assert_eq!(config.progress_file(), None);
    }

    #[test]
    fn unknown_type() {
        let r = toml::from_str::<Config>("[game]\ndebug = \"yes\"\n");
        assert!(r.is_err());
    }

    #[test]
    fn progress_file_in_home() {
        let config =
            toml::from_str::<Config>("[files]\nprogress-file = \"~/snake.json\"\n").unwrap();
        if let Some(home) = dirs::home_dir() {
            assert_eq!(
                config.progress_file().as_deref(),
                Some(home.join("snake.json").as_path())
            );
        }
    }

    #[test]
    fn progress_file_tilde_inside_path() {
        let config =
            toml::from_str::<Config>("[files]\nprogress-file = \"data/~/x\"\n").unwrap();
        assert_eq!(
            config.progress_file().as_deref(),
            Some(Path::new("data/~/x"))
        );
    }

    #[test]
    fn load_missing() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("config.toml");
        assert_eq!(Config::load(&path, true).unwrap(), Config::default());
        assert!(matches!(
            Config::load(&path, false),
            Err(ConfigError::Read(_))
        ));
    }

    #[test]
    fn load_file() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("config.toml");
        fs_err::write(&path, "[game]\ndebug = true\n").unwrap();
        let config = Config::load(&path, false).unwrap();
        assert!(config.game.debug);
    }
}
