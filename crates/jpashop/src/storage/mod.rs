//! Storage backend implementations.
//!
//! Concrete implementations of the repository traits defined in
//! `jpashop_core::storage`. The backend the server runs with is selected at
//! compile time via feature flags.
//!
//! # Feature Flags
//!
//! - `sqlite` (default): SQLite storage backend using `rusqlite` and `tokio-rusqlite`
//! - `inmemory`: in-process tables, nothing persisted
//!
//! These features are mutually exclusive; `state` enforces it.
//!
//! ```bash
//! cargo build -p jpashop --no-default-features --features inmemory
//! ```

// Handler tests run against it whichever backend is selected.
#[cfg(any(test, feature = "inmemory"))]
pub mod inmemory;

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(any(test, feature = "inmemory"))]
pub use inmemory::InMemoryRepository;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteRepository;
