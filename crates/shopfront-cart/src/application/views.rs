//! Read-only view DTOs handed to the presentation layer.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::aggregates::Cart;
use crate::domain::items::{LineItem, LocationKind};

/// One cart line, flattened for display.
#[derive(Debug, Serialize)]
pub struct LineItemView {
    /// The product identifier.
    pub product_id: String,
    /// Display name frozen at add time.
    pub name: String,
    /// Unit price frozen at add time.
    pub unit_price: Decimal,
    /// Units on this line.
    pub quantity: u32,
    /// Unit price times quantity.
    pub line_total: Decimal,
    /// Bound location id, if the line is location-bound.
    pub location_id: Option<String>,
    /// Bound location classification, if any.
    pub location_kind: Option<LocationKind>,
    /// Product image reference frozen at add time.
    pub image_url: Option<String>,
    /// Category label frozen at add time.
    pub category: Option<String>,
}

impl From<&LineItem> for LineItemView {
    fn from(line: &LineItem) -> Self {
        Self {
            product_id: line.product.product_id.to_string(),
            name: line.product.name.clone(),
            unit_price: line.product.unit_price,
            quantity: line.quantity,
            line_total: line.line_total(),
            location_id: line.location.as_ref().map(|loc| loc.id.to_string()),
            location_kind: line.location.as_ref().map(|loc| loc.kind),
            image_url: line.product.image_url.clone(),
            category: line.product.category.clone(),
        }
    }
}

/// Serializable read model of the whole cart.
#[derive(Debug, Serialize)]
pub struct CartView {
    /// The lines in insertion order.
    pub items: Vec<LineItemView>,
    /// Sum of line totals.
    pub total: Decimal,
    /// Sum of quantities.
    pub item_count: u64,
}

impl CartView {
    /// Builds the view from the current cart state.
    #[must_use]
    pub fn from_cart(cart: &Cart) -> Self {
        Self {
            items: cart.items().iter().map(LineItemView::from).collect(),
            total: cart.total(),
            item_count: cart.item_count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use shopfront_test_support::FixedClock;

    use super::*;
    use crate::domain::items::{LocationId, ProductId, ProductSnapshot, SalesLocation};

    #[test]
    fn test_view_carries_line_totals_and_counts() {
        // Arrange
        let clock = FixedClock(Utc.with_ymd_and_hms(2026, 3, 2, 9, 30, 0).unwrap());
        let mut cart = Cart::new();
        cart.add_item(
            ProductSnapshot {
                product_id: ProductId::new("P1"),
                name: "Gateway".into(),
                unit_price: Decimal::new(24900, 2),
                image_url: Some("/img/p1.png".into()),
                category: Some("hubs".into()),
            },
            2,
            Some(SalesLocation {
                id: LocationId::new("LOC1"),
                kind: LocationKind::RetailPoint,
            }),
            &clock,
        )
        .unwrap();

        // Act
        let view = CartView::from_cart(&cart);

        // Assert
        assert_eq!(view.items.len(), 1);
        assert_eq!(view.item_count, 2);
        assert_eq!(view.total, Decimal::new(49800, 2));
        let line = &view.items[0];
        assert_eq!(line.product_id, "P1");
        assert_eq!(line.line_total, Decimal::new(49800, 2));
        assert_eq!(line.location_id.as_deref(), Some("LOC1"));
        assert_eq!(line.location_kind, Some(LocationKind::RetailPoint));
    }
}
