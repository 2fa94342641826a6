use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::Mutex;

use super::{remove_from, replace_in, EntryStore, StoreError};
use crate::models::entry::{Entry, EntryId};

/// Keeps the whole journal as one JSON array on disk, the same snapshot
/// layout the mobile client persists locally.
#[derive(Clone)]
pub struct FileEntryStore {
    path: Arc<PathBuf>,
    // Held by every writer for its whole read-modify-write. Readers skip it;
    // the rename makes each snapshot visible at once.
    write_lock: Arc<Mutex<()>>,
}

impl FileEntryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Arc::new(path.into()),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn decode_entries(bytes: &[u8]) -> Result<Vec<Entry>, StoreError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Vec::new());
    }

    let records: Vec<Value> = serde_json::from_slice(bytes)?;
    let mut entries = Vec::with_capacity(records.len());
    for (index, record) in records.into_iter().enumerate() {
        match serde_json::from_value::<Entry>(record) {
            Ok(entry) => entries.push(entry),
            Err(e) => {
                tracing::warn!(index, error = %e, "Skipping unreadable journal record");
            }
        }
    }
    Ok(entries)
}

impl FileEntryStore {
    async fn read_snapshot(&self) -> Result<Vec<Entry>, StoreError> {
        match tokio::fs::read(self.path.as_path()).await {
            Ok(bytes) => decode_entries(&bytes),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    /// Caller must hold `write_lock`.
    async fn write_snapshot(&self, entries: &[Entry]) -> Result<(), StoreError> {
        let data = serde_json::to_vec_pretty(entries)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, data).await?;
        tokio::fs::rename(&tmp, self.path.as_path()).await?;

        tracing::debug!(path = %self.path.display(), count = entries.len(), "Journal saved");
        Ok(())
    }
}

impl EntryStore for FileEntryStore {
    async fn get_entries(&self) -> Result<Vec<Entry>, StoreError> {
        self.read_snapshot().await
    }

    async fn save_entries(&self, entries: Vec<Entry>) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        self.write_snapshot(&entries).await
    }

    async fn insert(&self, entry: Entry) -> Result<Entry, StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut entries = self.read_snapshot().await?;
        entries.push(entry.clone());
        self.write_snapshot(&entries).await?;
        Ok(entry)
    }

    async fn replace(&self, entry: Entry) -> Result<Option<Entry>, StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut entries = self.read_snapshot().await?;
        if !replace_in(&mut entries, entry.clone()) {
            return Ok(None);
        }
        self.write_snapshot(&entries).await?;
        Ok(Some(entry))
    }

    async fn remove(&self, id: EntryId) -> Result<bool, StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut entries = self.read_snapshot().await?;
        if !remove_from(&mut entries, &id) {
            return Ok(false);
        }
        self.write_snapshot(&entries).await?;
        Ok(true)
    }
}
