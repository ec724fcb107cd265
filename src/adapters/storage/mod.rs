//! Storage adapters

mod sqlite;

pub use sqlite::SqliteStore;
