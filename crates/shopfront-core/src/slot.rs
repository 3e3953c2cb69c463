//! Persistence slot abstraction.
//!
//! The cart serializes its entire state into one named slot of a durable
//! key-value text store provided by the host environment. The store has no
//! notion of the payload's structure; it holds opaque text keyed by name.

use async_trait::async_trait;

use crate::error::DomainError;

/// Port for the durable key-value text store backing cart persistence.
#[async_trait]
pub trait SlotStore: Send + Sync {
    /// Reads the payload stored under `key`. Returns `Ok(None)` when the
    /// slot has never been written.
    async fn read(&self, key: &str) -> Result<Option<String>, DomainError>;

    /// Writes `payload` under `key`, replacing any previous payload.
    async fn write(&self, key: &str, payload: &str) -> Result<(), DomainError>;

    /// Deletes the slot under `key`. Deleting an absent slot is a no-op.
    async fn delete(&self, key: &str) -> Result<(), DomainError>;
}
