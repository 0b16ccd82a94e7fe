//! Database layer for Roster
//!
//! Provides SQLite persistence for teams, users and pull requests, and
//! implements the `roster_core` store traits on top of it.

pub mod db;
pub mod error;
pub mod repos;
pub mod schema;
pub mod store;

pub use db::{Database, DatabaseConfig};
pub use error::{Error, Result};
pub use store::SqliteStore;
