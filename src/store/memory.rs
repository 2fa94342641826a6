use std::sync::Arc;

use tokio::sync::Mutex;

use super::{remove_from, replace_in, EntryStore, StoreError};
use crate::models::entry::{Entry, EntryId};

/// Process-local store. Entries are lost on restart.
#[derive(Clone, Default)]
pub struct MemoryEntryStore {
    entries: Arc<Mutex<Vec<Entry>>>,
}

impl MemoryEntryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries(entries: Vec<Entry>) -> Self {
        Self {
            entries: Arc::new(Mutex::new(entries)),
        }
    }
}

impl EntryStore for MemoryEntryStore {
    async fn get_entries(&self) -> Result<Vec<Entry>, StoreError> {
        Ok(self.entries.lock().await.clone())
    }

    async fn save_entries(&self, entries: Vec<Entry>) -> Result<(), StoreError> {
        *self.entries.lock().await = entries;
        Ok(())
    }

    async fn find(&self, id: EntryId) -> Result<Option<Entry>, StoreError> {
        let entries = self.entries.lock().await;
        Ok(entries.iter().find(|e| e.id == id).cloned())
    }

    async fn insert(&self, entry: Entry) -> Result<Entry, StoreError> {
        self.entries.lock().await.push(entry.clone());
        Ok(entry)
    }

    async fn replace(&self, entry: Entry) -> Result<Option<Entry>, StoreError> {
        let mut entries = self.entries.lock().await;
        Ok(replace_in(&mut entries, entry.clone()).then_some(entry))
    }

    async fn remove(&self, id: EntryId) -> Result<bool, StoreError> {
        Ok(remove_from(&mut *self.entries.lock().await, &id))
    }
}
