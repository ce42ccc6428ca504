use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::game::GameConfig;
use crate::modes::TrainConfig;
use crate::rl::QLearningConfig;

/// Default directory for the high score and the model files
pub const DEFAULT_DATA_DIR: &str = "app_data";

/// Everything the binary can be configured with, loadable from TOML.
/// Missing sections and fields fall back to their defaults.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Where `highscore.txt`, `q_table.msgpack` and `model_info.toml` live
    pub data_dir: PathBuf,
    pub game: GameConfig,
    pub q_learning: QLearningConfig,
    pub train: TrainConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            game: GameConfig::default(),
            q_learning: QLearningConfig::default(),
            train: TrainConfig::default(),
        }
    }
}

impl AppConfig {
    /// Read and validate a TOML config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: AppConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Like [`AppConfig::load`], but a missing file yields the defaults
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            eprintln!("Warning: config file '{}' not found, using defaults", path.display());
            Ok(Self::default())
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.game.validate()?;
        self.q_learning.validate()?;
        self.train.validate()?;
        if self.data_dir.as_os_str().is_empty() {
            return Err(ConfigError::Validation("data_dir must not be empty".into()));
        }
        Ok(())
    }

    pub fn default_toml() -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(&AppConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rl::RewardMode;
    use std::io::Write;

    #[test]
    fn test_default_config_is_valid() {
        let config = AppConfig::default();
        config.validate().expect("default config should be valid");
        assert_eq!(config.data_dir, PathBuf::from("app_data"));
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let toml_str = r#"
data_dir = "saves"

[q_learning]
learning_rate = 0.25
reward = "move_score"

[game]
win_tile = 4096
"#;
        let config: AppConfig = toml::from_str(toml_str).unwrap();
        assert!((config.q_learning.learning_rate - 0.25).abs() < 1e-9);
        assert_eq!(config.q_learning.reward, RewardMode::MoveScore);
        assert!((config.q_learning.discount_factor - 0.9).abs() < 1e-9);
        assert_eq!(config.game.win_tile, 4096);
        assert_eq!(config.game.move_animation_secs, 0.15);
        assert_eq!(config.train.episodes, 1000);
        assert_eq!(config.data_dir, PathBuf::from("saves"));
    }

    #[test]
    fn test_empty_toml_uses_all_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_validation_rejects_bad_sections() {
        let mut config = AppConfig::default();
        config.q_learning.discount_factor = 2.0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.game.win_tile = 1000;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.train.log_frequency = 0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.data_dir = PathBuf::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[train]\nepisodes = 5").unwrap();

        let config = AppConfig::load(file.path()).unwrap();
        assert_eq!(config.train.episodes, 5);
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[q_learning]\nlearning_rate = -1.0").unwrap();

        assert!(matches!(
            AppConfig::load(file.path()),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_load_rejects_malformed_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[game\nwin_tile = ").unwrap();

        assert!(matches!(
            AppConfig::load(file.path()),
            Err(ConfigError::TomlParse(_))
        ));
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = AppConfig::load_or_default(&dir.path().join("missing.toml")).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_default_toml_roundtrips() {
        let text = AppConfig::default_toml().unwrap();
        let parsed: AppConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed, AppConfig::default());
    }
}
