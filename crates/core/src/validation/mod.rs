//! Field and business-rule validation.
//!
//! Everything here is pure: validators take plain values and return the
//! client-error message to surface. Request DTOs in the `db` crate compose
//! these into per-entity `validate()` methods that run before any store call.

pub mod fields;
pub mod formats;
pub mod message;
pub mod promo;
pub mod purchase_order;
pub mod vocab;
