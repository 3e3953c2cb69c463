//! The cart aggregate.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shopfront_core::clock::Clock;
use shopfront_core::error::DomainError;

use super::items::{LineItem, LineKey, ProductSnapshot, SalesLocation};

/// Serialized form of the cart, as written to the persistence slot.
///
/// Kept separate from [`Cart`] so the wire shape can stay forward-compatible
/// while the aggregate enforces its invariants on hydration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CartState {
    /// The persisted line items, in insertion order.
    #[serde(default)]
    pub items: Vec<LineItem>,
}

/// The cart: an insertion-ordered collection of line items, never holding
/// two lines with the same `(product_id, location_id)` identity.
#[derive(Debug, Clone, Default)]
pub struct Cart {
    items: Vec<LineItem>,
}

impl Cart {
    /// Creates an empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a cart from a persisted state.
    ///
    /// Payloads written by other writers may violate the identity invariant
    /// or carry zero-quantity lines; hydration repairs both, folding
    /// duplicate identities into the first occurrence by summing quantities
    /// and dropping empty lines.
    #[must_use]
    pub fn from_state(state: CartState) -> Self {
        let mut cart = Self::new();
        for item in state.items {
            if item.quantity == 0 {
                continue;
            }
            let key = item.key();
            match cart.items.iter().position(|line| line.key() == key) {
                Some(index) => {
                    let existing = &mut cart.items[index];
                    existing.quantity = existing.quantity.saturating_add(item.quantity);
                }
                None => cart.items.push(item),
            }
        }
        cart
    }

    /// Snapshots the cart into its serialized form.
    #[must_use]
    pub fn to_state(&self) -> CartState {
        CartState {
            items: self.items.clone(),
        }
    }

    /// Adds `quantity` units of a product to the cart.
    ///
    /// If a line with the same `(product_id, location_id)` identity already
    /// exists, only its quantity grows; the existing snapshot and location
    /// metadata stay untouched. Otherwise a new line is appended with the
    /// given snapshot and the current time as its add time.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if `quantity` is zero or the
    /// snapshot's product id is empty.
    pub fn add_item(
        &mut self,
        product: ProductSnapshot,
        quantity: u32,
        location: Option<SalesLocation>,
        clock: &dyn Clock,
    ) -> Result<(), DomainError> {
        if quantity == 0 {
            return Err(DomainError::Validation(
                "quantity must be at least 1".into(),
            ));
        }
        if product.product_id.is_empty() {
            return Err(DomainError::Validation("product id must not be empty".into()));
        }

        let key = LineKey {
            product_id: product.product_id.clone(),
            location_id: location.as_ref().map(|loc| loc.id.clone()),
        };
        match self.items.iter().position(|line| line.key() == key) {
            Some(index) => {
                let existing = &mut self.items[index];
                existing.quantity = existing.quantity.saturating_add(quantity);
            }
            None => self.items.push(LineItem {
                product,
                location,
                quantity,
                added_at: clock.now(),
            }),
        }
        Ok(())
    }

    /// Removes the line with exactly the given identity.
    ///
    /// Returns `true` if a line was removed; removing an absent line is a
    /// successful no-op.
    pub fn remove_item(&mut self, key: &LineKey) -> bool {
        match self.items.iter().position(|line| &line.key() == key) {
            Some(index) => {
                self.items.remove(index);
                true
            }
            None => false,
        }
    }

    /// Sets the quantity of the line with the given identity.
    ///
    /// A quantity of zero behaves as removal. Returns `true` if a line was
    /// changed or removed; an absent identity is a no-op.
    pub fn update_quantity(&mut self, key: &LineKey, quantity: u32) -> bool {
        if quantity == 0 {
            return self.remove_item(key);
        }
        match self.items.iter_mut().find(|line| &line.key() == key) {
            Some(line) => {
                line.quantity = quantity;
                true
            }
            None => false,
        }
    }

    /// Empties the cart. Idempotent.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Sum of `unit_price × quantity` over all lines.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.items.iter().map(LineItem::line_total).sum()
    }

    /// Sum of quantities over all lines.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|line| u64::from(line.quantity)).sum()
    }

    /// The lines in insertion order.
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the cart holds no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
