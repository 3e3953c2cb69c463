//! The session-scoped cart store.
//!
//! One `CartStore` is constructed per browsing session at application start
//! and owns the cart state for that session; the presentation layer holds a
//! mutable reference and never keeps state of its own. Every mutation is
//! followed by a best-effort write of the full serialized state to the
//! persistence slot. A failing slot never surfaces to the caller: the store
//! drops to in-memory-only operation for the rest of the session.
//!
//! Two stores opened on the same slot are not coordinated; the last writer
//! wins. That mirrors the multi-tab behavior of the original storefront and
//! is a documented limitation, not a bug.

use std::sync::Arc;

use shopfront_core::clock::Clock;
use shopfront_core::error::DomainError;
use shopfront_core::slot::SlotStore;
use tracing::{debug, warn};

use crate::application::views::CartView;
use crate::domain::aggregates::{Cart, CartState};
use crate::domain::items::{LineItem, LineKey, ProductSnapshot, SalesLocation};

/// Slot name used when the host does not choose its own.
pub const DEFAULT_SLOT_KEY: &str = "shopfront.cart";

/// Durable cart state container for one browsing session.
pub struct CartStore {
    cart: Cart,
    slots: Arc<dyn SlotStore>,
    slot_key: String,
    clock: Arc<dyn Clock>,
    degraded: bool,
}

impl CartStore {
    /// Opens the store, hydrating from the persistence slot.
    ///
    /// A missing slot yields the empty cart. A malformed payload also yields
    /// the empty cart (logged, then overwritten on the next mutation). An
    /// unreadable slot yields the empty cart and marks the store degraded;
    /// no further persistence is attempted this session.
    pub async fn open(
        slots: Arc<dyn SlotStore>,
        slot_key: impl Into<String>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let slot_key = slot_key.into();
        let (cart, degraded) = match slots.read(&slot_key).await {
            Ok(Some(payload)) => match serde_json::from_str::<CartState>(&payload) {
                Ok(state) => {
                    let cart = Cart::from_state(state);
                    debug!(slot_key = %slot_key, lines = cart.len(), "cart hydrated from slot");
                    (cart, false)
                }
                Err(e) => {
                    warn!(slot_key = %slot_key, error = %e, "malformed cart payload; starting empty");
                    (Cart::new(), false)
                }
            },
            Ok(None) => {
                debug!(slot_key = %slot_key, "no persisted cart; starting empty");
                (Cart::new(), false)
            }
            Err(e) => {
                warn!(slot_key = %slot_key, error = %e, "slot read failed; continuing in memory only");
                (Cart::new(), true)
            }
        };
        Self {
            cart,
            slots,
            slot_key,
            clock,
            degraded,
        }
    }

    /// Adds `quantity` units of a product, then persists.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if `quantity` is zero or the
    /// snapshot's product id is empty. Persistence failures are not errors.
    pub async fn add_item(
        &mut self,
        product: ProductSnapshot,
        quantity: u32,
        location: Option<SalesLocation>,
    ) -> Result<(), DomainError> {
        self.cart
            .add_item(product, quantity, location, self.clock.as_ref())?;
        self.persist().await;
        Ok(())
    }

    /// Removes the line with exactly the given identity, then persists.
    /// Removing an absent line is a successful no-op and writes nothing.
    pub async fn remove_item(&mut self, key: &LineKey) -> bool {
        let removed = self.cart.remove_item(key);
        if removed {
            self.persist().await;
        }
        removed
    }

    /// Sets the quantity of the line with the given identity (zero removes),
    /// then persists. An absent identity is a no-op and writes nothing.
    pub async fn update_quantity(&mut self, key: &LineKey, quantity: u32) -> bool {
        let changed = self.cart.update_quantity(key, quantity);
        if changed {
            self.persist().await;
        }
        changed
    }

    /// Empties the cart, then persists. Idempotent.
    pub async fn clear(&mut self) {
        self.cart.clear();
        self.persist().await;
    }

    /// Ends the session: one final best-effort flush, then the store is
    /// consumed and stops persisting.
    pub async fn close(mut self) {
        self.persist().await;
    }

    /// Sum of `unit_price × quantity` over all lines.
    #[must_use]
    pub fn total(&self) -> rust_decimal::Decimal {
        self.cart.total()
    }

    /// Sum of quantities over all lines.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.cart.item_count()
    }

    /// The lines in insertion order.
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        self.cart.items()
    }

    /// Whether the cart holds no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cart.is_empty()
    }

    /// Builds the read model for the presentation layer.
    #[must_use]
    pub fn view(&self) -> CartView {
        CartView::from_cart(&self.cart)
    }

    /// Whether the store has dropped to in-memory-only operation.
    #[must_use]
    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    async fn persist(&mut self) {
        if self.degraded {
            return;
        }
        // Serialization of derived Serialize types to a string is infallible.
        let payload = serde_json::to_string(&self.cart.to_state())
            .expect("CartState serialization is infallible");
        match self.slots.write(&self.slot_key, &payload).await {
            Ok(()) => {
                debug!(slot_key = %self.slot_key, lines = self.cart.len(), "cart persisted");
            }
            Err(e) => {
                warn!(
                    slot_key = %self.slot_key,
                    error = %e,
                    "cart persistence failed; continuing in memory only"
                );
                self.degraded = true;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use rust_decimal::Decimal;
    use shopfront_test_support::{FailingSlotStore, FixedClock, InMemorySlotStore};

    use super::*;
    use crate::domain::items::{LocationId, LocationKind, ProductId};

    fn snapshot(id: &str, price: Decimal) -> ProductSnapshot {
        ProductSnapshot {
            product_id: ProductId::new(id),
            name: format!("Product {id}"),
            unit_price: price,
            image_url: None,
            category: None,
        }
    }

    fn warehouse(id: &str) -> SalesLocation {
        SalesLocation {
            id: LocationId::new(id),
            kind: LocationKind::Warehouse,
        }
    }

    fn clock() -> Arc<dyn Clock> {
        Arc::new(FixedClock(
            Utc.with_ymd_and_hms(2026, 3, 2, 9, 30, 0).unwrap(),
        ))
    }

    #[tokio::test]
    async fn test_open_with_missing_slot_starts_empty() {
        // Arrange
        let slots = Arc::new(InMemorySlotStore::new());

        // Act
        let store = CartStore::open(slots, DEFAULT_SLOT_KEY, clock()).await;

        // Assert
        assert!(store.is_empty());
        assert!(!store.is_degraded());
        assert_eq!(store.total(), Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_add_item_persists_full_state() {
        // Arrange
        let slots = Arc::new(InMemorySlotStore::new());
        let mut store =
            CartStore::open(Arc::clone(&slots) as Arc<dyn SlotStore>, "cart", clock()).await;

        // Act
        store
            .add_item(snapshot("P1", Decimal::new(1999, 2)), 2, None)
            .await
            .unwrap();

        // Assert
        assert_eq!(slots.write_count(), 1);
        let payload = slots.payload("cart").unwrap();
        let state: CartState = serde_json::from_str(&payload).unwrap();
        assert_eq!(state.items.len(), 1);
        assert_eq!(state.items[0].quantity, 2);
    }

    #[tokio::test]
    async fn test_reopen_reproduces_identical_lines() {
        // Arrange — populate and drop one store instance.
        let slots = Arc::new(InMemorySlotStore::new());
        let price = Decimal::new(10000, 2);
        let mut first =
            CartStore::open(Arc::clone(&slots) as Arc<dyn SlotStore>, "cart", clock()).await;
        first.add_item(snapshot("P1", price), 2, None).await.unwrap();
        first
            .add_item(snapshot("P2", price), 1, Some(warehouse("LOC1")))
            .await
            .unwrap();
        let expected = first.items().to_vec();
        first.close().await;

        // Act
        let second =
            CartStore::open(Arc::clone(&slots) as Arc<dyn SlotStore>, "cart", clock()).await;

        // Assert — same sequence, order and values.
        assert_eq!(second.items(), expected.as_slice());
        assert_eq!(second.total(), Decimal::new(30000, 2));
        assert_eq!(second.item_count(), 3);
    }

    #[tokio::test]
    async fn test_open_with_malformed_payload_starts_empty_and_keeps_persisting() {
        // Arrange
        let slots = Arc::new(InMemorySlotStore::with_slot("cart", "{not json"));

        // Act
        let mut store =
            CartStore::open(Arc::clone(&slots) as Arc<dyn SlotStore>, "cart", clock()).await;

        // Assert — empty, not degraded, and the next mutation overwrites the
        // broken payload.
        assert!(store.is_empty());
        assert!(!store.is_degraded());
        store
            .add_item(snapshot("P1", Decimal::ONE), 1, None)
            .await
            .unwrap();
        let state: CartState = serde_json::from_str(&slots.payload("cart").unwrap()).unwrap();
        assert_eq!(state.items.len(), 1);
    }

    #[tokio::test]
    async fn test_unreadable_slot_degrades_to_memory_only() {
        // Arrange
        let slots = Arc::new(FailingSlotStore);

        // Act
        let mut store = CartStore::open(slots, "cart", clock()).await;
        store
            .add_item(snapshot("P1", Decimal::new(500, 2)), 4, None)
            .await
            .unwrap();

        // Assert — operations keep working against memory.
        assert!(store.is_degraded());
        assert_eq!(store.item_count(), 4);
        assert_eq!(store.total(), Decimal::new(2000, 2));
    }

    #[tokio::test]
    async fn test_write_failure_stops_further_write_attempts() {
        // Arrange — reads succeed, then writes start failing mid-session.
        let slots = Arc::new(InMemorySlotStore::new());
        let mut store =
            CartStore::open(Arc::clone(&slots) as Arc<dyn SlotStore>, "cart", clock()).await;
        slots.set_fail_writes(true);

        // Act — the mutation itself still succeeds.
        store
            .add_item(snapshot("P1", Decimal::ONE), 1, None)
            .await
            .unwrap();

        // Assert
        assert!(store.is_degraded());
        assert_eq!(store.item_count(), 1);

        // Even after storage recovers, a degraded store stays in memory.
        slots.set_fail_writes(false);
        store
            .add_item(snapshot("P2", Decimal::ONE), 1, None)
            .await
            .unwrap();
        assert_eq!(slots.write_count(), 0);
    }

    #[tokio::test]
    async fn test_noop_mutations_write_nothing() {
        // Arrange
        let slots = Arc::new(InMemorySlotStore::new());
        let mut store =
            CartStore::open(Arc::clone(&slots) as Arc<dyn SlotStore>, "cart", clock()).await;

        // Act
        let removed = store.remove_item(&LineKey::home(ProductId::new("ghost"))).await;
        let changed = store
            .update_quantity(&LineKey::home(ProductId::new("ghost")), 3)
            .await;

        // Assert
        assert!(!removed);
        assert!(!changed);
        assert_eq!(slots.write_count(), 0);
    }

    #[tokio::test]
    async fn test_rejected_add_writes_nothing() {
        // Arrange
        let slots = Arc::new(InMemorySlotStore::new());
        let mut store =
            CartStore::open(Arc::clone(&slots) as Arc<dyn SlotStore>, "cart", clock()).await;

        // Act
        let result = store.add_item(snapshot("P1", Decimal::ONE), 0, None).await;

        // Assert
        assert!(matches!(result, Err(DomainError::Validation(_))));
        assert_eq!(slots.write_count(), 0);
    }

    #[tokio::test]
    async fn test_update_quantity_zero_removes_and_persists() {
        // Arrange
        let slots = Arc::new(InMemorySlotStore::new());
        let mut store =
            CartStore::open(Arc::clone(&slots) as Arc<dyn SlotStore>, "cart", clock()).await;
        store
            .add_item(snapshot("P1", Decimal::ONE), 2, Some(warehouse("LOC1")))
            .await
            .unwrap();
        let key = LineKey::at_location(ProductId::new("P1"), LocationId::new("LOC1"));

        // Act
        let changed = store.update_quantity(&key, 0).await;

        // Assert
        assert!(changed);
        assert!(store.is_empty());
        let state: CartState = serde_json::from_str(&slots.payload("cart").unwrap()).unwrap();
        assert!(state.items.is_empty());
    }

    #[tokio::test]
    async fn test_close_flushes_once_more() {
        // Arrange
        let slots = Arc::new(InMemorySlotStore::new());
        let mut store =
            CartStore::open(Arc::clone(&slots) as Arc<dyn SlotStore>, "cart", clock()).await;
        store
            .add_item(snapshot("P1", Decimal::ONE), 1, None)
            .await
            .unwrap();
        assert_eq!(slots.write_count(), 1);

        // Act
        store.close().await;

        // Assert
        assert_eq!(slots.write_count(), 2);
    }

    #[tokio::test]
    async fn test_clear_is_idempotent_and_persisted() {
        // Arrange
        let slots = Arc::new(InMemorySlotStore::new());
        let mut store =
            CartStore::open(Arc::clone(&slots) as Arc<dyn SlotStore>, "cart", clock()).await;
        store
            .add_item(snapshot("P1", Decimal::ONE), 3, None)
            .await
            .unwrap();

        // Act
        store.clear().await;
        store.clear().await;

        // Assert
        assert!(store.is_empty());
        assert_eq!(store.total(), Decimal::ZERO);
        assert_eq!(store.item_count(), 0);
        let state: CartState = serde_json::from_str(&slots.payload("cart").unwrap()).unwrap();
        assert!(state.items.is_empty());
    }
}
