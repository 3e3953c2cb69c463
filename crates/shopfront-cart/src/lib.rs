//! Shopfront — shopping-cart bounded context.
//!
//! Maintains the authoritative set of line items for one browsing session:
//! an insertion-ordered mapping from `(product, sales location)` identity to
//! a quantity plus a product snapshot frozen at add time, made durable
//! through a named persistence slot.

pub mod application;
pub mod domain;
