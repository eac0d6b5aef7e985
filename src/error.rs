use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FlapError {
    #[error("i/o error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("high score file {path} does not hold an integer: {contents:?}")]
    HighScoreParse { path: PathBuf, contents: String },

    #[error("invalid config file {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("checkpoint error: {0}")]
    Checkpoint(String),

    #[error("failed to encode report: {0}")]
    Report(#[from] serde_json::Error),
}
