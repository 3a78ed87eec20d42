use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Failure of a high-score store.  Never fatal: the tracker falls back to
/// zero on load and keeps the in-memory value on save.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("high score store i/o: {0}")]
    Io(#[from] std::io::Error),
    #[error("high score store holds {0:?}, expected a non-negative integer")]
    Corrupt(String),
}
