//! Line-item value objects.
//!
//! Product and location identifiers are opaque strings owned by the
//! (external) catalog service. Two line items are the same entity exactly
//! when their `(product_id, location_id)` pairs are equal; everything else
//! on the line is descriptive payload.

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Opaque product identifier assigned by the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    /// Wraps a raw catalog identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the raw identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` when the identifier carries no characters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque identifier of a fulfillment/sales location.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocationId(String);

impl LocationId {
    /// Wraps a raw location identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the raw identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LocationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Classification of a sales location. Informational only; never part of
/// line-item identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationKind {
    /// A stock-holding warehouse.
    Warehouse,
    /// A customer-facing retail point.
    RetailPoint,
}

/// A fulfillment location a line item is bound to. Lines without one are
/// home-delivery lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesLocation {
    /// The location identifier (participates in line-item identity).
    pub id: LocationId,
    /// The location classification (informational).
    pub kind: LocationKind,
}

/// Denormalized copy of the product's display fields, captured when the
/// line is first added and never refreshed from the catalog afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSnapshot {
    /// The product identifier.
    pub product_id: ProductId,
    /// Display name at add time.
    pub name: String,
    /// Unit price at add time; authoritative for totals.
    pub unit_price: Decimal,
    /// Product image reference at add time.
    #[serde(default)]
    pub image_url: Option<String>,
    /// Category label at add time.
    #[serde(default)]
    pub category: Option<String>,
}

/// Composite identity of a line item.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LineKey {
    /// The product identifier.
    pub product_id: ProductId,
    /// The bound location, or `None` for the home-delivery line.
    pub location_id: Option<LocationId>,
}

impl LineKey {
    /// Key of the home-delivery line for a product.
    #[must_use]
    pub fn home(product_id: ProductId) -> Self {
        Self {
            product_id,
            location_id: None,
        }
    }

    /// Key of the line bound to a specific location.
    #[must_use]
    pub fn at_location(product_id: ProductId, location_id: LocationId) -> Self {
        Self {
            product_id,
            location_id: Some(location_id),
        }
    }
}

/// One line of the cart: a frozen product snapshot, an optional location
/// binding, and a quantity of at least 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// The frozen product snapshot.
    pub product: ProductSnapshot,
    /// The bound location, or `None` for home delivery.
    #[serde(default)]
    pub location: Option<SalesLocation>,
    /// Units of the product on this line.
    pub quantity: u32,
    /// When the line was first added to the cart.
    #[serde(default = "unix_epoch")]
    pub added_at: DateTime<Utc>,
}

fn unix_epoch() -> DateTime<Utc> {
    DateTime::UNIX_EPOCH
}

impl LineItem {
    /// Returns the composite identity of this line.
    #[must_use]
    pub fn key(&self) -> LineKey {
        LineKey {
            product_id: self.product.product_id.clone(),
            location_id: self.location.as_ref().map(|loc| loc.id.clone()),
        }
    }

    /// Price of this line: unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.product.unit_price * Decimal::from(self.quantity)
    }
}
