//! Application layer.
//!
//! `ShippingService` maps each route onto one validated store or provider
//! call. `Readiness` gates traffic until the store has been reached once.

pub mod readiness;
pub mod service;
