//! SQLite snapshot store.
//!
//! This crate persists the snapshots the resolver serves from. Each row is
//! the last successfully fetched upstream state of one resource for one
//! owner. Rows are only ever written after a successful upstream fetch, so
//! deleting the database loses nothing but cache hits.

mod db;
pub mod error;
mod models;
mod repo;

pub use crate::db::Database;
pub use crate::repo::Repository;
