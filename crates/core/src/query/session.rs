//! Per-request read session.
//!
//! A [`ReadSession`] wraps the shared repositories for the lifetime of one
//! request and counts every query issued through it. Loaders take the
//! session, so the count a handler reports is exactly what its strategy
//! cost.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use crate::order::{
    Delivery, Item, Member, Order, OrderFlatDto, OrderItem, OrderItemQueryDto, OrderItemRecord,
    OrderQueryDto, OrderRecord, OrderSearch, SimpleOrderDto,
};
use crate::storage::{OrderQueryRepository, OrderRepository, Page, Result};

/// Counting decorator over the entity and projection repositories.
pub struct ReadSession {
    orders: Arc<dyn OrderRepository>,
    projections: Arc<dyn OrderQueryRepository>,
    queries: AtomicUsize,
}

impl ReadSession {
    pub fn new(
        orders: Arc<dyn OrderRepository>,
        projections: Arc<dyn OrderQueryRepository>,
    ) -> Self {
        Self {
            orders,
            projections,
            queries: AtomicUsize::new(0),
        }
    }

    /// Queries issued through this session so far.
    pub fn queries_issued(&self) -> usize {
        self.queries.load(Ordering::Relaxed)
    }

    fn record(&self, query: &'static str) {
        let n = self.queries.fetch_add(1, Ordering::Relaxed) + 1;
        tracing::trace!(query, n, "Issuing query");
    }
}

#[async_trait]
impl OrderRepository for ReadSession {
    async fn find_orders(&self, search: &OrderSearch) -> Result<Vec<OrderRecord>> {
        self.record("find_orders");
        self.orders.find_orders(search).await
    }

    async fn find_member(&self, id: i64) -> Result<Option<Member>> {
        self.record("find_member");
        self.orders.find_member(id).await
    }

    async fn find_delivery(&self, id: i64) -> Result<Option<Delivery>> {
        self.record("find_delivery");
        self.orders.find_delivery(id).await
    }

    async fn find_order_items(&self, order_id: i64) -> Result<Vec<OrderItemRecord>> {
        self.record("find_order_items");
        self.orders.find_order_items(order_id).await
    }

    async fn find_item(&self, id: i64) -> Result<Option<Item>> {
        self.record("find_item");
        self.orders.find_item(id).await
    }

    async fn find_orders_with_member_delivery(&self, page: Page) -> Result<Vec<Order>> {
        self.record("find_orders_with_member_delivery");
        self.orders.find_orders_with_member_delivery(page).await
    }

    async fn find_order_items_with_item(&self, order_ids: &[i64]) -> Result<Vec<(i64, OrderItem)>> {
        self.record("find_order_items_with_item");
        self.orders.find_order_items_with_item(order_ids).await
    }

    async fn find_orders_with_items(&self) -> Result<Vec<Order>> {
        self.record("find_orders_with_items");
        self.orders.find_orders_with_items().await
    }
}

#[async_trait]
impl OrderQueryRepository for ReadSession {
    async fn find_simple_order_dtos(&self) -> Result<Vec<SimpleOrderDto>> {
        self.record("find_simple_order_dtos");
        self.projections.find_simple_order_dtos().await
    }

    async fn find_order_query_dtos(&self) -> Result<Vec<OrderQueryDto>> {
        self.record("find_order_query_dtos");
        self.projections.find_order_query_dtos().await
    }

    async fn find_order_item_query_dtos(&self, order_id: i64) -> Result<Vec<OrderItemQueryDto>> {
        self.record("find_order_item_query_dtos");
        self.projections.find_order_item_query_dtos(order_id).await
    }

    async fn find_order_item_query_dtos_in(
        &self,
        order_ids: &[i64],
    ) -> Result<Vec<OrderItemQueryDto>> {
        self.record("find_order_item_query_dtos_in");
        self.projections
            .find_order_item_query_dtos_in(order_ids)
            .await
    }

    async fn find_order_flat_dtos(&self) -> Result<Vec<OrderFlatDto>> {
        self.record("find_order_flat_dtos");
        self.projections.find_order_flat_dtos().await
    }
}
