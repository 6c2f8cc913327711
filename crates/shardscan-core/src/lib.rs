//! Shared types, configuration, and caching primitives for shardscan.

pub mod cache;
pub mod config;
pub mod constants;
pub mod error;
pub mod types;
