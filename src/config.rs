use crate::difficulty::Difficulty;
use crate::highscores::{HighScores, LoadError, SaveError};
use serde::Deserialize;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Program configuration read from a configuration file
#[derive(Clone, Deserialize, Debug, Default, Eq, PartialEq)]
pub(crate) struct Config {
    /// Difficulty selected in the main menu at startup
    #[serde(default)]
    pub(crate) difficulty: Difficulty,

    /// Settings about data files
    #[serde(default)]
    pub(crate) files: FileConfig,

    #[serde(default)]
    pub(crate) audio: AudioConfig,
}

impl Config {
    /// Return the default configuration file path
    pub(crate) fn default_path() -> Result<PathBuf, ConfigError> {
        dirs::config_local_dir()
            .map(|p| p.join("chromasnake").join("config.toml"))
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

    /// Return the filepath at which high scores should be stored: the file
    /// given in the configuration or, if that is not set, the default high
    /// scores file path.  Return `None` if no path is present in the
    /// configuration and the default path could not be computed.
    fn high_scores_file(&self) -> Option<Cow<'_, Path>> {
        self.files
            .high_scores_file
            .as_deref()
            .map(Cow::from)
            .or_else(|| HighScores::default_path().map(Cow::from))
    }

    /// Load high scores from disk.  If the file does not exist, an empty set
    /// of records is returned.
    ///
    /// If `self.files.save_high_scores` is `false`, nothing is read and an
    /// empty set of records is returned.
    pub(crate) fn load_high_scores(&self) -> Result<HighScores, LoadError> {
        if !self.files.save_high_scores {
            Ok(HighScores::default())
        } else if let Some(p) = self.high_scores_file() {
            HighScores::load_from(&p)
        } else {
            Err(LoadError::no_path())
        }
    }

    /// Save high scores to disk.
    ///
    /// If `self.files.save_high_scores` is `false`, nothing is saved.
    pub(crate) fn save_high_scores(&self, scores: &HighScores) -> Result<(), SaveError> {
        if !self.files.save_high_scores {
            return Ok(());
        }
        if let Some(p) = self.high_scores_file() {
            scores.save_to(&p)
        } else {
            Err(SaveError::no_path())
        }
    }
}

#[derive(Clone, Deserialize, Debug, Eq, PartialEq)]
#[serde(from = "RawFileConfig")]
pub(crate) struct FileConfig {
    /// Path at which high scores should be stored
    high_scores_file: Option<PathBuf>,

    /// Whether to load & save high scores in a file
    save_high_scores: bool,
}

impl Default for FileConfig {
    fn default() -> FileConfig {
        FileConfig {
            high_scores_file: None,
            save_high_scores: true,
        }
    }
}

#[derive(Clone, Deserialize, Debug, Eq, PartialEq)]
#[serde(default, rename_all = "kebab-case")]
struct RawFileConfig {
    high_scores_file: Option<String>,
    save_high_scores: bool,
}

impl Default for RawFileConfig {
    fn default() -> RawFileConfig {
        RawFileConfig {
            high_scores_file: None,
            save_high_scores: true,
        }
    }
}

impl From<RawFileConfig> for FileConfig {
    fn from(value: RawFileConfig) -> FileConfig {
        FileConfig {
            high_scores_file: value.high_scores_file.map(expand_tilde),
            save_high_scores: value.save_high_scores,
        }
    }
}

/// Replace a leading `~` path component with the user's home directory
fn expand_tilde(path: String) -> PathBuf {
    let Some(home) = dirs::home_dir() else {
        return PathBuf::from(path);
    };
    if path == "~" {
        return home;
    }
    let mut chars = path.chars();
    if chars.next() == Some('~') && chars.next().is_some_and(std::path::is_separator) {
        // Both leading characters are ASCII.
        return home.join(&path[2..]);
    }
    PathBuf::from(path)
}

#[derive(Clone, Copy, Deserialize, Debug, Eq, PartialEq)]
#[serde(default, rename_all = "kebab-case")]
pub(crate) struct AudioConfig {
    /// Whether to play background music
    pub(crate) music: bool,
}

impl Default for AudioConfig {
    fn default() -> AudioConfig {
        AudioConfig { music: true }
    }
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
