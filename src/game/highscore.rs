//! Plain-text high score file

use std::path::{Path, PathBuf};

use crate::error::PersistenceError;

/// File name of the high score inside the data directory
pub const HIGH_SCORE_FILE: &str = "highscore.txt";

/// Where the high score lives. `None` keeps it in memory only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HighScoreStore {
    path: Option<PathBuf>,
}

impl HighScoreStore {
    /// Store the high score as `highscore.txt` inside `data_dir`
    pub fn in_dir(data_dir: &Path) -> Self {
        Self {
            path: Some(data_dir.join(HIGH_SCORE_FILE)),
        }
    }

    /// A store that never touches the filesystem
    pub fn in_memory() -> Self {
        Self { path: None }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Read the stored score. A missing file reads as 0.
    pub fn load(&self) -> Result<u32, PersistenceError> {
        let Some(path) = &self.path else {
            return Ok(0);
        };
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
            Err(source) => {
                return Err(PersistenceError::Read {
                    path: path.clone(),
                    source,
                })
            }
        };
        text.trim()
            .parse()
            .map_err(|_| PersistenceError::InvalidScore {
                path: path.clone(),
                value: text.trim().to_string(),
            })
    }

    /// Read the stored score, treating any failure as 0
    pub fn load_or_default(&self) -> u32 {
        self.load().unwrap_or(0)
    }

    /// Write `score`, creating the data directory if needed
    pub fn save(&self, score: u32) -> Result<(), PersistenceError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| PersistenceError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        std::fs::write(path, score.to_string()).map_err(|source| PersistenceError::Write {
            path: path.clone(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_reads_zero() {
        let dir = TempDir::new().unwrap();
        let store = HighScoreStore::in_dir(dir.path());
        assert_eq!(store.load().unwrap(), 0);
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let store = HighScoreStore::in_dir(&dir.path().join("app_data"));
        store.save(1234).unwrap();
        assert_eq!(store.load().unwrap(), 1234);
        assert_eq!(
            std::fs::read_to_string(dir.path().join("app_data").join(HIGH_SCORE_FILE)).unwrap(),
            "1234"
        );
    }

    #[test]
    fn test_corrupt_file() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(HIGH_SCORE_FILE), "not a number").unwrap();
        let store = HighScoreStore::in_dir(dir.path());
        assert!(matches!(
            store.load(),
            Err(PersistenceError::InvalidScore { .. })
        ));
        assert_eq!(store.load_or_default(), 0);
    }

    #[test]
    fn test_in_memory_store() {
        let store = HighScoreStore::in_memory();
        store.save(10).unwrap();
        assert_eq!(store.load().unwrap(), 0);
        assert!(store.path().is_none());
    }
}
