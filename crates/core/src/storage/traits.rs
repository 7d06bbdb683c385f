use async_trait::async_trait;

use crate::order::{
    Dataset, Delivery, Item, Member, Order, OrderFlatDto, OrderItem, OrderItemQueryDto,
    OrderItemRecord, OrderQueryDto, OrderRecord, OrderSearch, SimpleOrderDto,
};

use super::{Page, Result};

/// Entity access for orders and their associations.
///
/// Every method issues exactly one query against the backing store, so the
/// number of calls made while serving a request is the number of queries.
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Root rows matching the search, association keys unresolved.
    async fn find_orders(&self, search: &OrderSearch) -> Result<Vec<OrderRecord>>;

    /// Gets a member by its ID.
    async fn find_member(&self, id: i64) -> Result<Option<Member>>;

    /// Gets a delivery by its ID.
    async fn find_delivery(&self, id: i64) -> Result<Option<Delivery>>;

    /// Order lines of one order, item keys unresolved.
    async fn find_order_items(&self, order_id: i64) -> Result<Vec<OrderItemRecord>>;

    /// Gets an item by its ID.
    async fn find_item(&self, id: i64) -> Result<Option<Item>>;

    /// Orders joined with member and delivery, `order_items` left empty.
    async fn find_orders_with_member_delivery(&self, page: Page) -> Result<Vec<Order>>;

    /// Order lines (joined with their item) for a set of orders, paired
    /// with the owning order id.
    async fn find_order_items_with_item(&self, order_ids: &[i64]) -> Result<Vec<(i64, OrderItem)>>;

    /// Orders joined with every association in a single query.
    async fn find_orders_with_items(&self) -> Result<Vec<Order>>;
}

/// Projection queries that select response records directly.
#[async_trait]
pub trait OrderQueryRepository: Send + Sync {
    async fn find_simple_order_dtos(&self) -> Result<Vec<SimpleOrderDto>>;

    /// Order projections with `order_items` left empty.
    async fn find_order_query_dtos(&self) -> Result<Vec<OrderQueryDto>>;

    async fn find_order_item_query_dtos(&self, order_id: i64) -> Result<Vec<OrderItemQueryDto>>;

    async fn find_order_item_query_dtos_in(
        &self,
        order_ids: &[i64],
    ) -> Result<Vec<OrderItemQueryDto>>;

    /// One row per order line with the order columns repeated.
    async fn find_order_flat_dtos(&self) -> Result<Vec<OrderFlatDto>>;
}

/// Bulk loading used to populate an empty store.
#[async_trait]
pub trait DatasetRepository: Send + Sync {
    /// Returns true when no orders, members or items are stored.
    async fn is_empty(&self) -> Result<bool>;

    /// Inserts every row of the dataset, all or nothing.
    async fn insert_dataset(&self, dataset: &Dataset) -> Result<()>;
}
