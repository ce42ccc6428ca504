//! Model persistence for the Q-learning agent
//!
//! A model lives in two files inside the data directory:
//! - `q_table.msgpack` - the table as a list of `(grid, values)` entries
//! - `model_info.toml` - version, best score, best tile and games played
//!
//! Loading is fail-soft per file: a missing or unreadable table starts
//! empty and missing or unreadable stats start at version 1.

use std::path::Path;

use rand::{rngs::StdRng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::{
    agent::{ModelStats, QLearningAgent},
    config::QLearningConfig,
    q_table::{ActionValues, QTable},
};
use crate::{error::PersistenceError, game::Grid};

pub const Q_TABLE_FILE: &str = "q_table.msgpack";
pub const MODEL_INFO_FILE: &str = "model_info.toml";

#[derive(Serialize, Deserialize)]
struct TableRecord {
    entries: Vec<(Grid, ActionValues)>,
}

/// Save the agent's model to a directory
///
/// Bumps the model version, then writes the table to `q_table.msgpack` and
/// the stats to `model_info.toml`. The directory is created if it does not
/// exist.
///
/// # Arguments
///
/// * `agent` - Agent whose table and stats are written
/// * `dir` - Data directory holding the model files
///
/// # Returns
///
/// `Ok(())` once both files are written, or the first I/O or encoding
/// error. The version stays bumped even when a write fails.
pub fn save_model(agent: &mut QLearningAgent, dir: &Path) -> Result<(), PersistenceError> {
    agent.stats_mut().version += 1;

    std::fs::create_dir_all(dir).map_err(|source| PersistenceError::Write {
        path: dir.to_path_buf(),
        source,
    })?;

    let record = TableRecord {
        entries: agent
            .table()
            .iter()
            .map(|(grid, values)| (*grid, *values))
            .collect(),
    };
    let bytes = rmp_serde::to_vec(&record)?;
    let table_path = dir.join(Q_TABLE_FILE);
    std::fs::write(&table_path, bytes).map_err(|source| PersistenceError::Write {
        path: table_path,
        source,
    })?;

    let info = toml::to_string(agent.stats())?;
    let info_path = dir.join(MODEL_INFO_FILE);
    std::fs::write(&info_path, info).map_err(|source| PersistenceError::Write {
        path: info_path,
        source,
    })
}

/// Read the table and stats from `dir`.
///
/// Each file is optional: a missing table reads as empty and missing stats
/// read as [`ModelStats::default`]. Corrupt files are errors.
pub fn read_model(dir: &Path) -> Result<(QTable, ModelStats), PersistenceError> {
    Ok((read_table(dir)?, read_stats(dir)?))
}

/// Read `q_table.msgpack` from `dir`. A missing file is an empty table.
pub fn read_table(dir: &Path) -> Result<QTable, PersistenceError> {
    match read_optional(&dir.join(Q_TABLE_FILE))? {
        Some(bytes) => {
            let record: TableRecord = rmp_serde::from_slice(&bytes)?;
            Ok(QTable::from_entries(record.entries))
        }
        None => Ok(QTable::new()),
    }
}

/// Read `model_info.toml` from `dir`. A missing file is the default stats.
pub fn read_stats(dir: &Path) -> Result<ModelStats, PersistenceError> {
    match read_optional(&dir.join(MODEL_INFO_FILE))? {
        Some(bytes) => Ok(toml::from_str(&String::from_utf8_lossy(&bytes))?),
        None => Ok(ModelStats::default()),
    }
}

/// Load an agent from a data directory, never failing
///
/// The table and the stats load independently. A file that is missing or
/// cannot be read falls back to an empty table or to
/// [`ModelStats::default`] (version 1) without discarding the other one.
/// Unreadable files are reported on stderr.
///
/// # Arguments
///
/// * `config` - Learning parameters; exploration restarts from
///   `config.exploration_rate`
/// * `dir` - Data directory holding the model files
///
/// # Returns
///
/// An agent seeded from entropy, ready to play and keep learning
pub fn load_model(config: QLearningConfig, dir: &Path) -> QLearningAgent {
    load_model_with_rng(config, dir, StdRng::from_entropy())
}

/// Like [`load_model`] with a caller-provided RNG
pub fn load_model_with_rng(config: QLearningConfig, dir: &Path, rng: StdRng) -> QLearningAgent {
    let table = read_table(dir).unwrap_or_else(|e| {
        eprintln!("Warning: starting with an empty Q-table: {e}");
        QTable::new()
    });
    let stats = read_stats(dir).unwrap_or_else(|e| {
        eprintln!("Warning: resetting model stats: {e}");
        ModelStats::default()
    });
    QLearningAgent::from_parts(config, table, stats, rng)
}

fn read_optional(path: &Path) -> Result<Option<Vec<u8>>, PersistenceError> {
    match std::fs::read(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(PersistenceError::Read {
            path: path.to_path_buf(),
            source,
        }),
    }
}
