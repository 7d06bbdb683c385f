mod error;
mod traits;
mod types;

pub use error::{PageError, RepositoryError, Result};
pub use traits::{DatasetRepository, OrderQueryRepository, OrderRepository};
pub use types::Page;
