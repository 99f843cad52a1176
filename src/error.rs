use std::{io, path::PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SnakeError {
    #[error("terminal error: {0}")]
    Terminal(#[from] crossterm::ErrorKind),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{}: {source}", path.display())]
    HighScore {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to set up logging: {0}")]
    Logger(#[from] log::SetLoggerError),
}
