//! Repository implementations for database access
//!
//! Each repository follows these patterns:
//! - Writes return the stored row via RETURNING (single round trip)
//! - Missing rows surface as `DbError::NotFound`, never as empty results

pub mod items;

pub use items::{DbError, Item, ItemStore, ItemValues, PgItemRepo};
