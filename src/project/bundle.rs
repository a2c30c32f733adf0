//! Take store read/write operations
//!
//! A store is persisted as a single JSON file holding metadata and every
//! take. Hosts that manage their own assets can skip this and serialize
//! [`Take`](super::schema::Take) directly.

use super::schema::{PlaybackDataFile, StoreMeta, Take};
use super::store::TakeStore;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::BufReader;
use std::path::Path;
use thiserror::Error;

/// Store-related errors
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid store file: {0}")]
    InvalidFile(String),

    #[error("Missing store file: {0}")]
    MissingFile(String),

    #[error("Take index {index} out of range (store has {len})")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Read a store file, repairing takes with no locations
pub fn read_store(path: &Path) -> Result<TakeStore, StoreError> {
    if !path.exists() {
        return Err(StoreError::MissingFile(path.display().to_string()));
    }
    if !path.is_file() {
        return Err(StoreError::InvalidFile("Path is not a file".to_string()));
    }

    let content = fs::read_to_string(path)?;
    let file: PlaybackDataFile = serde_json::from_str(&content)?;

    tracing::debug!("Loaded {} take(s) from {:?}", file.takes.len(), path);

    Ok(TakeStore::load(file.takes))
}

/// Read a store file, or start an empty store if there is none yet
pub fn read_or_default(path: &Path) -> Result<TakeStore, StoreError> {
    match read_store(path) {
        Err(StoreError::MissingFile(_)) => Ok(TakeStore::new()),
        other => other,
    }
}

/// Write every take to `path` and mark the store clean
pub fn write_store(store: &mut TakeStore, path: &Path) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }

    let created_at = read_meta(path).map(|m| m.created_at).unwrap_or_else(|_| Utc::now());
    let file = PlaybackDataFileRef {
        meta: StoreMeta {
            created_at,
            ..StoreMeta::default()
        },
        takes: store.list(),
    };

    // Pretty output would spend a line per stream byte
    let content = serde_json::to_string(&file)?;
    fs::write(path, content)?;
    store.mark_clean();

    tracing::debug!("Saved {} take(s) to {:?}", store.len(), path);

    Ok(())
}

/// Borrowing twin of [`PlaybackDataFile`] for writing
#[derive(Serialize)]
struct PlaybackDataFileRef<'a> {
    meta: StoreMeta,
    takes: &'a [Take],
}

/// Just the meta of a store file; takes are skipped without being decoded
#[derive(Deserialize)]
struct MetaOnly {
    meta: StoreMeta,
}

fn read_meta(path: &Path) -> Result<StoreMeta, StoreError> {
    let reader = BufReader::new(fs::File::open(path)?);
    let file: MetaOnly = serde_json::from_reader(reader)?;
    Ok(file.meta)
}
