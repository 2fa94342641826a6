use sqlx::PgPool;

use super::{EntryStore, StoreError};
use crate::models::entry::{Entry, EntryId};

const ENTRY_COLUMNS: &str =
    r#"id, text, mood, intensity, energy, tags, favorite, "date", "timestamp""#;

#[derive(Clone)]
pub struct PgEntryStore {
    pool: PgPool,
}

impl PgEntryStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await?;
        Ok(())
    }
}

impl EntryStore for PgEntryStore {
    async fn get_entries(&self) -> Result<Vec<Entry>, StoreError> {
        let entries = sqlx::query_as::<_, Entry>(&format!(
            r#"SELECT {ENTRY_COLUMNS} FROM entries ORDER BY "timestamp" DESC"#
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(entries)
    }

    async fn save_entries(&self, entries: Vec<Entry>) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM entries").execute(&mut *tx).await?;
        for entry in &entries {
            sqlx::query(&format!(
                "INSERT INTO entries ({ENTRY_COLUMNS}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)"
            ))
            .bind(&entry.id)
            .bind(&entry.text)
            .bind(&entry.mood)
            .bind(entry.intensity)
            .bind(entry.energy)
            .bind(&entry.tags)
            .bind(entry.favorite)
            .bind(entry.date)
            .bind(entry.timestamp)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        tracing::debug!(count = entries.len(), "Journal snapshot replaced");
        Ok(())
    }

    async fn find(&self, id: EntryId) -> Result<Option<Entry>, StoreError> {
        let entry = sqlx::query_as::<_, Entry>(&format!(
            "SELECT {ENTRY_COLUMNS} FROM entries WHERE id = $1"
        ))
        .bind(&id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(entry)
    }

    async fn insert(&self, entry: Entry) -> Result<Entry, StoreError> {
        let entry = sqlx::query_as::<_, Entry>(&format!(
            r#"
            INSERT INTO entries ({ENTRY_COLUMNS})
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {ENTRY_COLUMNS}
            "#
        ))
        .bind(&entry.id)
        .bind(&entry.text)
        .bind(&entry.mood)
        .bind(entry.intensity)
        .bind(entry.energy)
        .bind(&entry.tags)
        .bind(entry.favorite)
        .bind(entry.date)
        .bind(entry.timestamp)
        .fetch_one(&self.pool)
        .await?;
        Ok(entry)
    }

    async fn replace(&self, entry: Entry) -> Result<Option<Entry>, StoreError> {
        let updated = sqlx::query_as::<_, Entry>(&format!(
            r#"
            UPDATE entries SET
                text = $2,
                mood = $3,
                intensity = $4,
                energy = $5,
                tags = $6,
                favorite = $7,
                "date" = $8
            WHERE id = $1
            RETURNING {ENTRY_COLUMNS}
            "#
        ))
        .bind(&entry.id)
        .bind(&entry.text)
        .bind(&entry.mood)
        .bind(entry.intensity)
        .bind(entry.energy)
        .bind(&entry.tags)
        .bind(entry.favorite)
        .bind(entry.date)
        .fetch_optional(&self.pool)
        .await?;
        Ok(updated)
    }

    async fn remove(&self, id: EntryId) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM entries WHERE id = $1")
            .bind(&id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
