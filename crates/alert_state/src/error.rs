use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StateError {
    #[error("failed to read {}: {source}", path.display())]
    Read { path: PathBuf, source: std::io::Error },

    #[error("failed to parse {}: {source}", path.display())]
    Parse { path: PathBuf, source: serde_json::Error },

    #[error("failed to write {}: {source}", path.display())]
    Write { path: PathBuf, source: std::io::Error },

    #[error("failed to encode state: {0}")]
    Encode(#[from] serde_json::Error),
}

impl StateError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StateError::Read { source, .. } if source.kind() == std::io::ErrorKind::NotFound)
    }
}
