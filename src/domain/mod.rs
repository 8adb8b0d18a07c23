//! Domain layer: the shapes that cross the HTTP boundary and the ports the
//! application talks to.
//!
//! Documents are schema-less `bson::Document`s. The only typed pieces are the
//! identifiers, the acknowledgments returned by writes, and the validated
//! request values for parcels and checkout sessions.

pub mod collection;
pub mod document;
pub mod outcome;
pub mod parcel;
pub mod payment;
pub mod ports;
