use crate::difficulty::Difficulty;
use serde::{de::Deserializer, ser::Serializer, Deserialize, Serialize};
use std::collections::HashMap;
use std::num::NonZeroU32;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Per-difficulty best-score storage as the game sees it
pub(crate) trait ScoreStore {
    /// Return the best score for `difficulty`, or 0 if there is none
    fn get_best(&self, difficulty: Difficulty) -> u32;

    /// Record `score` as the best score for `difficulty`.  A score of 0
    /// erases the record.
    fn set_best(&mut self, difficulty: Difficulty, score: u32);
}

/// The best score achieved at each difficulty, as stored on disk
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct HighScores(HashMap<Difficulty, NonZeroU32>);

impl HighScores {
    /// Return the default high scores file path
    pub(crate) fn default_path() -> Option<PathBuf> {
        dirs::data_local_dir().map(|p| p.join("chromasnake").join("highscores.json"))
    }

    pub(crate) fn save_to(&self, path: &Path) -> Result<(), SaveError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs_err::create_dir_all(parent).map_err(SaveError::mkdir)?;
        }
        let mut src = serde_json::to_string(self).map_err(SaveError::serialize)?;
        src.push('\n');
        fs_err::write(path, &src).map_err(SaveError::write)?;
        Ok(())
    }

    /// Read high scores from `path`.  A missing file reads as no records.
    pub(crate) fn load_from(path: &Path) -> Result<HighScores, LoadError> {
        let src = match fs_err::read(path) {
            Ok(src) => src,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(HighScores::default()),
            Err(e) => return Err(LoadError::read(e)),
        };
        serde_json::from_slice(&src).map_err(LoadError::deserialize)
    }

    /// Forget every record
    pub(crate) fn clear(&mut self) {
        self.0.clear();
    }

    fn to_json_array(&self) -> Vec<HighScoreEntry> {
        let mut array = self
            .0
            .iter()
            .map(|(&difficulty, &score)| HighScoreEntry { difficulty, score })
            .collect::<Vec<_>>();
        array.sort_unstable_by_key(|hse| hse.difficulty);
        array
    }

    fn from_json_array(array: Vec<HighScoreEntry>) -> HighScores {
        let mut scores = HashMap::new();
        for hse in array {
            // If a difficulty is listed twice, keep the better score
            let best = scores.entry(hse.difficulty).or_insert(hse.score);
            *best = (*best).max(hse.score);
        }
        HighScores(scores)
    }
}

impl ScoreStore for HighScores {
    fn get_best(&self, difficulty: Difficulty) -> u32 {
        self.0.get(&difficulty).map_or(0, |score| score.get())
    }

    fn set_best(&mut self, difficulty: Difficulty, score: u32) {
        match NonZeroU32::new(score) {
            Some(score) => {
                self.0.insert(difficulty, score);
            }
            None => {
                self.0.remove(&difficulty);
            }
        }
    }
}

impl Serialize for HighScores {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json_array().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for HighScores {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Vec::<HighScoreEntry>::deserialize(deserializer).map(HighScores::from_json_array)
    }
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
struct HighScoreEntry {
    difficulty: Difficulty,
    score: NonZeroU32,
}

#[derive(Debug, Error)]
#[error("Failed to save high scores to disk")]
pub(crate) struct SaveError(#[source] SaveErrorSource);

impl SaveError {
    pub(crate) fn no_path() -> Self {
        SaveError(SaveErrorSource::NoPath)
    }

    fn mkdir(e: std::io::Error) -> Self {
        SaveError(SaveErrorSource::Mkdir(e))
    }

    fn serialize(e: serde_json::Error) -> Self {
        SaveError(SaveErrorSource::Serialize(e))
    }

    fn write(e: std::io::Error) -> Self {
        SaveError(SaveErrorSource::Write(e))
    }
}

#[derive(Debug, Error)]
enum SaveErrorSource {
    #[error("failed to determine path to local data directory")]
    NoPath,
    #[error("failed to create parent directories")]
    Mkdir(#[source] std::io::Error),
    #[error("failed to serialize high scores")]
    Serialize(#[source] serde_json::Error),
    #[error("failed to write high scores to disk")]
    Write(#[source] std::io::Error),
}

#[derive(Debug, Error)]
#[error("Failed to read high scores from disk")]
pub(crate) struct LoadError(#[source] LoadErrorSource);

impl LoadError {
    pub(crate) fn no_path() -> Self {
        LoadError(LoadErrorSource::NoPath)
    }

    fn read(e: std::io::Error) -> Self {
        LoadError(LoadErrorSource::Read(e))
    }

    fn deserialize(e: serde_json::Error) -> Self {
        LoadError(LoadErrorSource::Deserialize(e))
    }
}

#[derive(Debug, Error)]
enum LoadErrorSource {
    #[error("failed to determine path to local data directory")]
    NoPath,
    #[error("failed to read high scores file")]
    Read(#[source] std::io::Error),
    #[error("failed to deserialize high scores")]
    Deserialize(#[source] serde_json::Error),
}
