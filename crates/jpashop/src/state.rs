//! Application state with repository-based storage.
//!
//! Shared state passed to all request handlers. It holds repository trait
//! objects for the selected backend and hands out one [`ReadSession`] per
//! request.

use std::sync::Arc;

use chrono::NaiveDateTime;

use jpashop_core::order::demo_dataset;
use jpashop_core::query::{effective_batch_size, ReadSession};
use jpashop_core::storage::{DatasetRepository, OrderQueryRepository, OrderRepository};

use crate::config::Config;

// ============================================================================
// Compile-time feature validation
// ============================================================================

#[cfg(all(feature = "sqlite", feature = "inmemory"))]
compile_error!("Cannot enable both 'sqlite' and 'inmemory' storage features");

#[cfg(not(any(feature = "sqlite", feature = "inmemory")))]
compile_error!("Must enable exactly one storage feature: 'sqlite' or 'inmemory'");

/// Shared application state.
///
/// Cloned for each request handler; the repositories are shared, sessions are not.
#[derive(Clone)]
pub struct AppState {
    /// Entity-level reads.
    pub order_repo: Arc<dyn OrderRepository>,
    /// Hand-written projection reads.
    pub query_repo: Arc<dyn OrderQueryRepository>,
    /// Bulk writes used for seeding.
    pub dataset_repo: Arc<dyn DatasetRepository>,
    /// Max root ids per batched collection query.
    pub batch_fetch_size: usize,
    /// Name of the storage backend, reported by `/healthz`.
    pub backend: &'static str,
}

impl AppState {
    /// Creates a new AppState over one repository that implements every trait.
    fn build<R>(repo: Arc<R>, backend: &'static str, config: &Config) -> Self
    where
        R: OrderRepository + OrderQueryRepository + DatasetRepository + 'static,
    {
        Self {
            order_repo: repo.clone(),
            query_repo: repo.clone(),
            dataset_repo: repo,
            batch_fetch_size: effective_batch_size(config.batch_fetch_size),
            backend,
        }
    }

    /// Opens a counting session for one request.
    pub fn session(&self) -> ReadSession {
        ReadSession::new(self.order_repo.clone(), self.query_repo.clone())
    }

    /// Inserts the demo dataset if the store holds no data yet.
    ///
    /// Returns `true` if data was inserted.
    pub async fn seed_demo_data(&self, order_date: NaiveDateTime) -> anyhow::Result<bool> {
        if !self.dataset_repo.is_empty().await? {
            tracing::debug!(backend = self.backend, "Store already has data, skipping seed");
            return Ok(false);
        }

        let dataset = demo_dataset(order_date)?;
        self.dataset_repo.insert_dataset(&dataset).await?;

        tracing::info!(
            backend = self.backend,
            orders = dataset.orders.len(),
            items = dataset.items.len(),
            "Seeded demo data"
        );
        Ok(true)
    }
}

// ============================================================================
// Factory functions for each backend
// ============================================================================

#[cfg(feature = "sqlite")]
mod sqlite_backend {
    use super::*;
    use crate::storage::SqliteRepository;

    impl AppState {
        /// Creates AppState with SQLite storage.
        pub async fn new(config: &Config) -> Result<Self, anyhow::Error> {
            let repo = Arc::new(SqliteRepository::new(&config.sqlite_path).await?);

            tracing::info!(
                path = %config.sqlite_path,
                batch_fetch_size = config.batch_fetch_size,
                "Using SQLite storage"
            );

            Ok(Self::build(repo, "sqlite", config))
        }
    }
}

#[cfg(feature = "inmemory")]
mod inmemory_backend {
    use super::*;
    use crate::storage::InMemoryRepository;

    impl AppState {
        /// Creates AppState with in-memory storage.
        pub async fn new(config: &Config) -> Result<Self, anyhow::Error> {
            let repo = Arc::new(InMemoryRepository::new());

            tracing::info!(
                batch_fetch_size = config.batch_fetch_size,
                "Using in-memory storage"
            );

            Ok(Self::build(repo, "inmemory", config))
        }
    }
}
