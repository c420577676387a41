use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reasons a level pack cannot be loaded or a level cannot be used.
#[derive(Debug, Error)]
pub enum LevelError {
    /// The level file could not be read or the output could not be written.
    #[error("level i/o failed: {0}")]
    Io(#[from] std::io::Error),
    /// The level file is not a valid level-pack document.
    #[error("malformed level pack: {0}")]
    Format(#[from] serde_json::Error),
    /// A level's board text does not follow its puzzle's conventions.
    #[error("level {id}: {reason}")]
    BadBoard {
        /// Id of the offending level.
        id: String,
        /// What was wrong with its board text.
        reason: String,
    },
}

/// One puzzle instance: an id plus board text lines.
///
/// The board-line conventions are puzzle-specific; the loader carries them
/// verbatim. `attributes` holds optional per-level key/value hints for
/// puzzles that need more than the board text.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Level {
    /// Identifier printed in solver output.
    pub id: String,
    /// Board text, one string per line.
    #[serde(default)]
    pub board: Vec<String>,
    /// Extra per-level attributes.
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
}

impl Level {
    /// A `BadBoard` error for this level.
    pub fn bad_board(&self, reason: impl Into<String>) -> LevelError {
        LevelError::BadBoard {
            id: self.id.clone(),
            reason: reason.into(),
        }
    }
}

/// A pack of levels for one puzzle.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LevelSet {
    /// Name of the puzzle these levels belong to, if the pack says.
    #[serde(default)]
    pub puzzle: Option<String>,
    /// The levels, in pack order.
    pub levels: Vec<Level>,
}

impl LevelSet {
    /// Parse a level pack from its JSON text.
    pub fn from_json(text: &str) -> Result<Self, LevelError> {
        Ok(serde_json::from_str(text)?)
    }
}

/// Load a level pack from a JSON file.
pub fn load_levels(path: impl AsRef<Path>) -> Result<LevelSet, LevelError> {
    LevelSet::from_json(&fs::read_to_string(path)?)
}
