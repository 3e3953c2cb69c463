//! Shared test mocks and utilities for the Shopfront cart.

mod clock;
mod slot;

pub use clock::FixedClock;
pub use slot::{FailingSlotStore, InMemorySlotStore};
