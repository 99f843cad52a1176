use std::{fs, path::{Path, PathBuf}};

use log::debug;

use crate::error::SnakeError;

pub const DEFAULT_HIGH_SCORE_FILE: &str = "highscore.txt";

/// A single decimal integer in a plain text file.
pub struct HighScoreStore {
    path: PathBuf,
}

impl HighScoreStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        HighScoreStore { path: path.as_ref().to_path_buf() }
    }

    /// Missing or malformed files count as a high score of 0.
    pub fn load(&self) -> u32 {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) => {
                debug!("no high score at {}: {}", self.path.display(), e);
                return 0;
            }
        };

        content.trim().parse().unwrap_or_else(|e| {
            debug!("ignoring malformed high score {:?}: {}", content, e);
            0
        })
    }

    pub fn save(&self, score: u32) -> Result<(), SnakeError> {
        fs::write(&self.path, score.to_string()).map_err(|source| SnakeError::HighScore {
            path: self.path.clone(),
            source,
        })
    }
}
