//! High-score tracking and its persistence seam.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::error::StoreError;

/// Stable storage for a single high-score value.
pub trait HighScoreStore {
    fn load(&self) -> Result<u32, StoreError>;
    fn save(&mut self, score: u32) -> Result<(), StoreError>;
}

impl<S: HighScoreStore + ?Sized> HighScoreStore for Box<S> {
    fn load(&self) -> Result<u32, StoreError> {
        (**self).load()
    }

    fn save(&mut self, score: u32) -> Result<(), StoreError> {
        (**self).save(score)
    }
}

// ── File store ────────────────────────────────────────────────────────────────

/// Decimal integer in a plain text file.
#[derive(Clone, Debug)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `~/.fruit_frenzy_score`, or the working directory without a home.
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".fruit_frenzy_score")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl HighScoreStore for FileStore {
    fn load(&self) -> Result<u32, StoreError> {
        let text = fs::read_to_string(&self.path)?;
        let trimmed = text.trim();
        trimmed
            .parse()
            .map_err(|_| StoreError::Corrupt(trimmed.to_string()))
    }

    fn save(&mut self, score: u32) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, score.to_string())?;
        Ok(())
    }
}

// ── In-memory store ───────────────────────────────────────────────────────────

/// Process-local store; nothing survives exit.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    value: Option<u32>,
    saves: u32,
}

impl MemoryStore {
    pub fn with_value(value: u32) -> Self {
        Self {
            value: Some(value),
            saves: 0,
        }
    }

    /// Number of successful `save` calls.
    pub fn saves(&self) -> u32 {
        self.saves
    }
}

impl HighScoreStore for MemoryStore {
    fn load(&self) -> Result<u32, StoreError> {
        self.value
            .ok_or_else(|| StoreError::Corrupt(String::from("<empty>")))
    }

    fn save(&mut self, score: u32) -> Result<(), StoreError> {
        self.value = Some(score);
        self.saves += 1;
        Ok(())
    }
}

// ── Tracker ───────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HighScoreOutcome {
    pub new_high: bool,
    pub value: u32,
}

pub struct HighScoreTracker<S> {
    store: S,
    best: u32,
}

impl<S: HighScoreStore> HighScoreTracker<S> {
    /// Loads the persisted value once.  A missing or unreadable value means
    /// there is no high score yet.
    pub fn new(store: S) -> Self {
        let best = match store.load() {
            Ok(v) => v,
            Err(e) => {
                warn!("no usable high score, starting from 0: {e}");
                0
            }
        };
        Self { store, best }
    }

    pub fn best(&self) -> u32 {
        self.best
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Compare a finished run against the best so far.  A new best is kept
    /// in memory even when persisting it fails.
    pub fn record_end(&mut self, score: u32) -> HighScoreOutcome {
        if score <= self.best {
            return HighScoreOutcome {
                new_high: false,
                value: self.best,
            };
        }
        self.best = score;
        match self.store.save(score) {
            Ok(()) => info!(score, "new high score saved"),
            Err(e) => warn!(score, "could not save high score: {e}"),
        }
        HighScoreOutcome {
            new_high: true,
            value: score,
        }
    }
}
