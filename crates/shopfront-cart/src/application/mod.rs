//! Application layer for the cart context.

pub mod store;
pub mod views;
