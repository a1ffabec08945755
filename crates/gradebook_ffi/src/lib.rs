//! Flutter bridge for the Gradebook core.

pub mod api;
