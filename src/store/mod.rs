//! Entry persistence.
//!
//! The insight engine only ever reads a snapshot through [`EntryStore`].
//! Every backend makes `insert`, `replace` and `remove` atomic with respect
//! to each other: the file and memory stores hold their lock across the
//! whole read-modify-write, Postgres uses single-row statements.

use std::future::Future;

use crate::models::entry::{Entry, EntryId};

pub mod file;
pub mod memory;
pub mod postgres;
pub mod prompts;

pub use file::FileEntryStore;
pub use memory::MemoryEntryStore;
pub use postgres::PgEntryStore;
pub use prompts::PromptBook;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("journal file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("journal file is not valid JSON: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub trait EntryStore: Send + Sync {
    /// All persisted entries in store order. An empty store is not an error.
    fn get_entries(&self) -> impl Future<Output = Result<Vec<Entry>, StoreError>> + Send;

    /// Replace the stored snapshot.
    fn save_entries(&self, entries: Vec<Entry>) -> impl Future<Output = Result<(), StoreError>> + Send;

    fn find(&self, id: EntryId) -> impl Future<Output = Result<Option<Entry>, StoreError>> + Send {
        async move {
            let entries = self.get_entries().await?;
            Ok(entries.into_iter().find(|e| e.id == id))
        }
    }

    /// Append an entry.
    fn insert(&self, entry: Entry) -> impl Future<Output = Result<Entry, StoreError>> + Send;

    /// Overwrite the entry with the same id. Returns `None` if it is gone.
    fn replace(&self, entry: Entry) -> impl Future<Output = Result<Option<Entry>, StoreError>> + Send;

    /// Returns whether an entry was removed.
    fn remove(&self, id: EntryId) -> impl Future<Output = Result<bool, StoreError>> + Send;
}

/// Swap `entry` into the slot with the same id. Returns whether it was found.
pub(crate) fn replace_in(entries: &mut [Entry], entry: Entry) -> bool {
    match entries.iter_mut().find(|e| e.id == entry.id) {
        Some(slot) => {
            *slot = entry;
            true
        }
        None => false,
    }
}

/// Drop the entry with `id`. Returns whether anything was removed.
pub(crate) fn remove_from(entries: &mut Vec<Entry>, id: &EntryId) -> bool {
    let before = entries.len();
    entries.retain(|e| &e.id != id);
    entries.len() != before
}

/// The backend selected at startup.
#[derive(Clone)]
pub enum JournalStore {
    Postgres(PgEntryStore),
    File(FileEntryStore),
    Memory(MemoryEntryStore),
}

impl JournalStore {
    pub fn backend(&self) -> &'static str {
        match self {
            JournalStore::Postgres(_) => "postgres",
            JournalStore::File(_) => "file",
            JournalStore::Memory(_) => "memory",
        }
    }

    /// Readiness probe.
    pub async fn ping(&self) -> Result<(), StoreError> {
        match self {
            JournalStore::Postgres(store) => store.ping().await,
            JournalStore::File(store) => store.get_entries().await.map(|_| ()),
            JournalStore::Memory(_) => Ok(()),
        }
    }
}

impl EntryStore for JournalStore {
    async fn get_entries(&self) -> Result<Vec<Entry>, StoreError> {
        match self {
            JournalStore::Postgres(store) => store.get_entries().await,
            JournalStore::File(store) => store.get_entries().await,
            JournalStore::Memory(store) => store.get_entries().await,
        }
    }

    async fn save_entries(&self, entries: Vec<Entry>) -> Result<(), StoreError> {
        match self {
            JournalStore::Postgres(store) => store.save_entries(entries).await,
            JournalStore::File(store) => store.save_entries(entries).await,
            JournalStore::Memory(store) => store.save_entries(entries).await,
        }
    }

    async fn find(&self, id: EntryId) -> Result<Option<Entry>, StoreError> {
        match self {
            JournalStore::Postgres(store) => store.find(id).await,
            JournalStore::File(store) => store.find(id).await,
            JournalStore::Memory(store) => store.find(id).await,
        }
    }

    async fn insert(&self, entry: Entry) -> Result<Entry, StoreError> {
        match self {
            JournalStore::Postgres(store) => store.insert(entry).await,
            JournalStore::File(store) => store.insert(entry).await,
            JournalStore::Memory(store) => store.insert(entry).await,
        }
    }

    async fn replace(&self, entry: Entry) -> Result<Option<Entry>, StoreError> {
        match self {
            JournalStore::Postgres(store) => store.replace(entry).await,
            JournalStore::File(store) => store.replace(entry).await,
            JournalStore::Memory(store) => store.replace(entry).await,
        }
    }

    async fn remove(&self, id: EntryId) -> Result<bool, StoreError> {
        match self {
            JournalStore::Postgres(store) => store.remove(id).await,
            JournalStore::File(store) => store.remove(id).await,
            JournalStore::Memory(store) => store.remove(id).await,
        }
    }
}
