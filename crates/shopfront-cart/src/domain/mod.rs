//! Domain model for the cart context.

pub mod aggregates;
pub mod items;
