//! Gradebook domain model.
//!
//! # Responsibility
//! - Define the persisted shapes of years, subjects, grades, notes and theme.
//! - Derive storage keys for every registry and ledger.
//! - Hold the pure grade arithmetic (average, pass/fail status).
//!
//! # Invariants
//! - Wire field names are fixed (`nome`, `media`, `valor`, `texto`, ...);
//!   Rust field names never leak into storage.
//! - Relationships between entities exist only through `StorageKey` naming.

pub mod grade;
pub mod input;
pub mod keys;
pub mod note;
pub mod subject;
pub mod theme;
