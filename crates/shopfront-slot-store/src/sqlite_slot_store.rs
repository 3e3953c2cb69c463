//! SQLite implementation of the `SlotStore` trait.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;

use shopfront_core::error::DomainError;
use shopfront_core::slot::SlotStore;

use crate::schema;

/// SQLite-backed slot store.
#[derive(Debug, Clone)]
pub struct SqliteSlotStore {
    pool: SqlitePool,
}

impl SqliteSlotStore {
    /// Creates a new `SqliteSlotStore` over an existing pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Creates the slots table if it does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the DDL statement fails.
    pub async fn migrate(&self) -> Result<(), DomainError> {
        sqlx::query(schema::CREATE_SLOTS_TABLE)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Infrastructure(format!("slot schema migration failed: {e}")))?;
        tracing::debug!("cart_slots schema ensured");
        Ok(())
    }
}

#[async_trait]
impl SlotStore for SqliteSlotStore {
    async fn read(&self, key: &str) -> Result<Option<String>, DomainError> {
        let payload: Option<String> =
            sqlx::query_scalar("SELECT payload FROM cart_slots WHERE slot_key = ?1")
                .bind(key)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| DomainError::Infrastructure(format!("slot read failed: {e}")))?;
        Ok(payload)
    }

    async fn write(&self, key: &str, payload: &str) -> Result<(), DomainError> {
        sqlx::query(
            "INSERT INTO cart_slots (slot_key, payload, updated_at)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(slot_key) DO UPDATE SET
                 payload = excluded.payload,
                 updated_at = excluded.updated_at",
        )
        .bind(key)
        .bind(payload)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::Infrastructure(format!("slot write failed: {e}")))?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), DomainError> {
        sqlx::query("DELETE FROM cart_slots WHERE slot_key = ?1")
            .bind(key)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Infrastructure(format!("slot delete failed: {e}")))?;
        Ok(())
    }
}
