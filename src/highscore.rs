use std::io::ErrorKind;
use std::path::Path;

use tracing::info;

use crate::error::FlapError;

/// Read the manual-mode high score. A missing file counts as zero.
pub fn load(path: &Path) -> Result<u32, FlapError> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(0),
        Err(source) => {
            return Err(FlapError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    text.trim()
        .parse::<u32>()
        .map_err(|_| FlapError::HighScoreParse {
            path: path.to_path_buf(),
            contents: text.clone(),
        })
}

pub fn store(path: &Path, score: u32) -> Result<(), FlapError> {
    std::fs::write(path, score.to_string()).map_err(|source| FlapError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Persist `score` if it beats `current`. Returns the high score after the update.
pub fn update_if_beaten(path: &Path, current: u32, score: u32) -> Result<u32, FlapError> {
    if score <= current {
        return Ok(current);
    }
    store(path, score)?;
    info!(previous = current, score, "new high score");
    Ok(score)
}
