//! Persistence of sticky message state.
//!
//! Two files live in the sticky directory: `messages.json` (channel ID to sticky
//! content) and `previous.json` (channel ID to the last posted copy).

use serde::{de::DeserializeOwned, Serialize};
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::{error::AppError, model::sticky::StickyState};

const MESSAGES_FILE: &str = "messages.json";
const PREVIOUS_FILE: &str = "previous.json";

/// Reads and writes [`StickyState`] as JSON files in one directory.
#[derive(Debug, Clone)]
pub struct StickyRepository {
    dir: PathBuf,
}

impl StickyRepository {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Loads both maps; missing files load as empty maps.
    pub async fn load(&self) -> Result<StickyState, AppError> {
        Ok(StickyState {
            messages: read_map(&self.dir.join(MESSAGES_FILE)).await?,
            previous: read_map(&self.dir.join(PREVIOUS_FILE)).await?,
        })
    }

    pub async fn save_messages(&self, messages: &HashMap<u64, String>) -> Result<(), AppError> {
        write_map(&self.dir.join(MESSAGES_FILE), messages).await
    }

    pub async fn save_previous(&self, previous: &HashMap<u64, u64>) -> Result<(), AppError> {
        write_map(&self.dir.join(PREVIOUS_FILE), previous).await
    }
}

async fn read_map<V: DeserializeOwned>(path: &Path) -> Result<HashMap<u64, V>, AppError> {
    match tokio::fs::read(path).await {
        Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(HashMap::new()),
        Err(e) => Err(e.into()),
    }
}

async fn write_map<V: Serialize>(path: &Path, map: &HashMap<u64, V>) -> Result<(), AppError> {
    let json = serde_json::to_vec_pretty(map)?;
    tokio::fs::write(path, json).await?;
    Ok(())
}
