//! Command implementations for itemctl CLI

pub mod serve;

pub use serve::run_serve;
