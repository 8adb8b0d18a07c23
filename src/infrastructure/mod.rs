//! Adapters implementing the domain ports.

pub mod in_memory;
#[cfg(feature = "storage-mongodb")]
pub mod mongo;
pub mod stripe;
