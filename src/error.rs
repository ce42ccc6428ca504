use std::path::PathBuf;

/// Errors from reading or writing persisted scores and models.
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid high score in {}: {value:?}", path.display())]
    InvalidScore { path: PathBuf, value: String },

    #[error("failed to encode Q-table: {0}")]
    Encode(#[from] rmp_serde::encode::Error),

    #[error("failed to decode Q-table: {0}")]
    Decode(#[from] rmp_serde::decode::Error),

    #[error("failed to serialize model info: {0}")]
    InfoSerialize(#[from] toml::ser::Error),

    #[error("failed to parse model info: {0}")]
    InfoParse(#[from] toml::de::Error),
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", path.display())]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("config validation error: {0}")]
    Validation(String),
}

/// A console command that is not a direction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown direction '{0}' (use W, A, S or D)")]
pub struct ParseDirectionError(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_persistence_error_display() {
        let err = PersistenceError::InvalidScore {
            path: PathBuf::from("data/highscore.txt"),
            value: "abc".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "invalid high score in data/highscore.txt: \"abc\""
        );
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::Validation("learning_rate must be > 0".to_string());
        assert_eq!(
            err.to_string(),
            "config validation error: learning_rate must be > 0"
        );
    }
}
