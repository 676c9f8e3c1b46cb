use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AtlasError {
    #[error("cannot enumerate scan root {}: {source}", path.display())]
    ScanRootUnreadable {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid activity level: {0}")]
    InvalidLevel(String),

    #[error("invalid project status: {0}")]
    InvalidStatus(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AtlasError>;
