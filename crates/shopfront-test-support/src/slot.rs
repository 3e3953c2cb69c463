//! Test slot stores — mock `SlotStore` implementations for tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use shopfront_core::error::DomainError;
use shopfront_core::slot::SlotStore;

/// A fully functional slot store backed by an in-process map. Also counts
/// writes so tests can assert persistence behavior.
#[derive(Debug, Default)]
pub struct InMemorySlotStore {
    slots: Mutex<HashMap<String, String>>,
    write_count: Mutex<u64>,
    fail_writes: Mutex<bool>,
}

impl InMemorySlotStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-seeded with a single slot payload.
    #[must_use]
    pub fn with_slot(key: &str, payload: &str) -> Self {
        let store = Self::default();
        store
            .slots
            .lock()
            .unwrap()
            .insert(key.to_owned(), payload.to_owned());
        store
    }

    /// Returns the raw payload currently stored under `key`, if any.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn payload(&self, key: &str) -> Option<String> {
        self.slots.lock().unwrap().get(key).cloned()
    }

    /// Makes subsequent `write` calls fail with an infrastructure error.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn set_fail_writes(&self, fail: bool) {
        *self.fail_writes.lock().unwrap() = fail;
    }

    /// Returns how many times `write` succeeded.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn write_count(&self) -> u64 {
        *self.write_count.lock().unwrap()
    }
}

#[async_trait]
impl SlotStore for InMemorySlotStore {
    async fn read(&self, key: &str) -> Result<Option<String>, DomainError> {
        Ok(self.slots.lock().unwrap().get(key).cloned())
    }

    async fn write(&self, key: &str, payload: &str) -> Result<(), DomainError> {
        if *self.fail_writes.lock().unwrap() {
            return Err(DomainError::Infrastructure("write rejected".into()));
        }
        *self.write_count.lock().unwrap() += 1;
        self.slots
            .lock()
            .unwrap()
            .insert(key.to_owned(), payload.to_owned());
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), DomainError> {
        self.slots.lock().unwrap().remove(key);
        Ok(())
    }
}

/// A slot store that fails every call with an infrastructure error. Useful
/// for testing the degraded, in-memory-only fallback.
#[derive(Debug)]
pub struct FailingSlotStore;

#[async_trait]
impl SlotStore for FailingSlotStore {
    async fn read(&self, _key: &str) -> Result<Option<String>, DomainError> {
        Err(DomainError::Infrastructure("storage unavailable".into()))
    }

    async fn write(&self, _key: &str, _payload: &str) -> Result<(), DomainError> {
        Err(DomainError::Infrastructure("storage unavailable".into()))
    }

    async fn delete(&self, _key: &str) -> Result<(), DomainError> {
        Err(DomainError::Infrastructure("storage unavailable".into()))
    }
}
