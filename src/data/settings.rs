//! Single-value JSON settings files.

use serde::{de::DeserializeOwned, Serialize};
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::AppError;

/// A single optional value persisted as one JSON file.
///
/// The file exists exactly when a value is set. Writes go to disk first and only
/// then replace the in-memory value, so a failed write leaves the previous value
/// in effect. Cloning shares the value.
#[derive(Debug)]
pub struct SettingStore<T> {
    path: PathBuf,
    value: Arc<RwLock<Option<T>>>,
}

impl<T> Clone for SettingStore<T> {
    fn clone(&self) -> Self {
        Self {
            path: self.path.clone(),
            value: Arc::clone(&self.value),
        }
    }
}

impl<T> SettingStore<T>
where
    T: Clone + Serialize + DeserializeOwned + Send + Sync,
{
    /// Loads the setting stored at `path`.
    ///
    /// # Returns
    /// - `Ok(SettingStore)` - Store holding the persisted value, or `None` if the
    ///   file does not exist
    /// - `Err(AppError)` - The file exists but could not be read or parsed
    pub async fn load(path: impl Into<PathBuf>) -> Result<Self, AppError> {
        let path = path.into();

        let value = match tokio::fs::read(&path).await {
            Ok(bytes) => Some(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(e) => return Err(e.into()),
        };

        Ok(Self {
            path,
            value: Arc::new(RwLock::new(value)),
        })
    }

    /// Current value.
    pub async fn get(&self) -> Option<T> {
        self.value.read().await.clone()
    }

    /// Replaces the value; `None` deletes the file.
    pub async fn set(&self, value: Option<T>) -> Result<(), AppError> {
        let mut guard = self.value.write().await;

        match &value {
            Some(v) => {
                let json = serde_json::to_vec_pretty(v)?;
                tokio::fs::write(&self.path, json).await?;
            }
            None => match tokio::fs::remove_file(&self.path).await {
                Ok(()) => {}
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            },
        }

        *guard = value;
        Ok(())
    }
}
