use async_trait::async_trait;
use sqlx::Row;

use crate::repository::{KeyValueStore, StorageError, StoreEntry};

use super::SqliteStore;

fn connection_error(err: &sqlx::Error) -> StorageError {
    StorageError::Connection(err.to_string())
}

#[async_trait]
impl KeyValueStore for SqliteStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let row = sqlx::query("SELECT value FROM player_records WHERE name = ?1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(|err| connection_error(&err))?;

        let Some(row) = row else {
            return Ok(None);
        };
        let value: String = row
            .try_get("value")
            .map_err(|err| StorageError::Serialization(err.to_string()))?;
        Ok(Some(value))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO player_records (name, value)
            VALUES (?1, ?2)
            ON CONFLICT(name) DO UPDATE SET
                value = excluded.value
            ",
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await
        .map_err(|err| connection_error(&err))?;

        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        sqlx::query("DELETE FROM player_records WHERE name = ?1")
            .bind(key)
            .execute(&self.pool)
            .await
            .map_err(|err| connection_error(&err))?;

        Ok(())
    }

    async fn entries(&self) -> Result<Vec<StoreEntry>, StorageError> {
        let rows = sqlx::query("SELECT name, value FROM player_records ORDER BY rowid")
            .fetch_all(&self.pool)
            .await
            .map_err(|err| connection_error(&err))?;

        rows.iter()
            .map(|row| {
                let key: String = row
                    .try_get("name")
                    .map_err(|err| StorageError::Serialization(err.to_string()))?;
                let value: String = row
                    .try_get("value")
                    .map_err(|err| StorageError::Serialization(err.to_string()))?;
                Ok(StoreEntry { key, value })
            })
            .collect()
    }
}
