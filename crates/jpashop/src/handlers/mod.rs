pub mod error;
pub mod health;
pub mod orders;
pub mod simple_orders;

pub use error::AppError;

use axum::http::{HeaderName, HeaderValue};
use jpashop_core::query::{FetchStrategy, ReadSession};

/// Response header carrying the number of queries a request issued.
pub const QUERY_COUNT_HEADER: HeaderName = HeaderName::from_static("x-query-count");

/// Logs what a request cost and returns the header reporting it.
fn query_count_header(
    endpoint: &'static str,
    strategy: FetchStrategy,
    session: &ReadSession,
    rows: usize,
) -> [(HeaderName, HeaderValue); 1] {
    let queries = session.queries_issued();
    tracing::debug!(
        endpoint,
        %strategy,
        paginable = strategy.is_paginable(),
        queries,
        rows,
        "Loaded orders"
    );
    [(QUERY_COUNT_HEADER, HeaderValue::from(queries))]
}
