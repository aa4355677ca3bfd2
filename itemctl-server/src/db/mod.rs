//! Database layer - connection pool, schema and item stores
//!
//! # Design Principles
//!
//! - Connection pool (max 5 connections by default) - no Arc<Mutex<Connection>>
//! - Rely on DB-assigned ids and RETURNING - no read-after-write queries
//! - Handlers depend on the `ItemStore` trait, never on a concrete store

pub mod memory;
pub mod pool;
pub mod repos;
pub mod schema;

pub use memory::MemoryItemRepo;
pub use pool::{create_pool, create_pool_with_options};
pub use repos::*;
pub use schema::ensure_schema;
