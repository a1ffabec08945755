//! Typed persistence over the key-value store.
//!
//! # Responsibility
//! - Encode/decode registries and ledgers as JSON under their storage keys.
//! - Keep key naming and JSON details out of the service layer.
//!
//! # Invariants
//! - A missing key loads as an empty collection.
//! - Saves replace the whole collection (read-modify-write, last write wins).
//! - Malformed stored JSON is reported, never silently replaced.

pub mod gradebook_repo;
