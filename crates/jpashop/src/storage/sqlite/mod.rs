//! SQLite storage backend.
//!
//! Uses `rusqlite` for synchronous access and `tokio-rusqlite` to run it off
//! the async executor.

mod conversions;
mod error;
mod repository;
mod schema;

pub use repository::SqliteRepository;
