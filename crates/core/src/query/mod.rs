mod batch;
#[cfg(test)]
mod fixture;
mod loaders;
mod session;
mod strategy;

pub use batch::{
    batch_count, batches, effective_batch_size, max_batched_queries, DEFAULT_BATCH_FETCH_SIZE,
    MAX_IN_LIST_LEN,
};
pub use loaders::{
    load_order_query_dtos_flat, load_order_query_dtos_in, load_order_query_dtos_per_order,
    load_orders_batched, load_orders_collection_join, load_orders_per_row,
    load_orders_with_member_delivery, load_simple_order_dtos,
};
pub use session::ReadSession;
pub use strategy::FetchStrategy;
