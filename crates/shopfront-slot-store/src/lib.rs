//! SQLite-backed persistence slot for the Shopfront cart.
//!
//! Implements the `SlotStore` port over a local SQLite database so cart
//! state survives process restarts on the host device.

mod sqlite_slot_store;

pub mod schema;

pub use sqlite_slot_store::SqliteSlotStore;
