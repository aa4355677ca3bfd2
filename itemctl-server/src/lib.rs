//! itemctl-server: HTTP CRUD API for items
//!
//! Exposes list, create, retrieve, update, delete and a distinct-values
//! listing over a single `items` table.
//!
//! Layers, leaf-first:
//! - [`models`]: wire payloads validated into [`models::ItemFields`]
//! - [`db`]: the [`db::ItemStore`] trait, PostgreSQL and in-memory stores
//! - [`http`]: axum routes, extractors and error mapping

pub mod db;
pub mod http;
pub mod models;

pub use db::{ItemStore, MemoryItemRepo, PgItemRepo};
pub use http::{build_router, run_server, AppState, ServerConfig};
