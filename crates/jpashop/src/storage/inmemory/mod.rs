//! In-memory storage backend.
//!
//! Keeps every table in a `BTreeMap` behind a `tokio::sync::RwLock`, so rows
//! come back in id order just like the SQLite queries. Useful for tests and
//! for running the server without a database file.
//!
//! ```rust,ignore
//! use crate::storage::inmemory::InMemoryRepository;
//!
//! let repo = InMemoryRepository::new();
//! repo.insert_dataset(&dataset).await?;
//! ```

mod repository;

pub use repository::InMemoryRepository;
