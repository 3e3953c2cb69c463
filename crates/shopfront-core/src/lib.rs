//! Shopfront Core — shared domain abstractions.
//!
//! This crate defines the error taxonomy and the ports (persistence slot,
//! clock) that the cart bounded context depends on. It contains no
//! infrastructure code.

pub mod clock;
pub mod error;
pub mod slot;
