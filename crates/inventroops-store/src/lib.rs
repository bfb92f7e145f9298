//! Inventroops Store — SQLite product and depot collections.

pub mod schema;
pub mod sqlite;
pub mod types;

pub use sqlite::{SqliteStore, StoreTransaction};
pub use types::*;
