//! SQLite persistence for Lyceum.
//!
//! Stores experiments, agents, instruction evolutions, turns and token usage
//! in a single database file.

mod error;
mod rows;
mod schema;
mod store;

pub use error::StoreError;
pub use store::SqliteStore;
