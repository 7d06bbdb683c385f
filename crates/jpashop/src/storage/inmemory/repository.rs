//! In-memory repository implementation.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use jpashop_core::order::{
    Dataset, Delivery, Item, Member, Order, OrderFlatDto, OrderItem, OrderItemQueryDto,
    OrderItemRecord, OrderQueryDto, OrderRecord, OrderSearch, SimpleOrderDto, MAX_SEARCH_RESULTS,
};
use jpashop_core::storage::{
    DatasetRepository, OrderQueryRepository, OrderRepository, Page, RepositoryError, Result,
};

#[derive(Debug, Default)]
struct Tables {
    members: BTreeMap<i64, Member>,
    items: BTreeMap<i64, Item>,
    deliveries: BTreeMap<i64, Delivery>,
    orders: BTreeMap<i64, OrderRecord>,
    order_items: BTreeMap<i64, OrderItemRecord>,
}

impl Tables {
    /// Order joined with its member and delivery; `None` when either row is
    /// missing, matching an inner join.
    fn with_member_delivery(&self, record: &OrderRecord) -> Option<Order> {
        let member = self.members.get(&record.member_id)?;
        let delivery = self.deliveries.get(&record.delivery_id)?;
        Some(Order {
            id: record.id,
            member: member.clone(),
            delivery: delivery.clone(),
            order_items: Vec::new(),
            status: record.status,
            order_date: record.order_date,
        })
    }

    /// Lines of one order joined with their items, in line id order.
    fn lines_of(&self, order_id: i64) -> Vec<OrderItem> {
        self.order_items
            .values()
            .filter(|l| l.order_id == order_id)
            .filter_map(|l| {
                let item = self.items.get(&l.item_id)?;
                Some(OrderItem::new(l.id, item.clone(), l.order_price, l.count))
            })
            .collect()
    }

    fn joined_orders(&self) -> impl Iterator<Item = Order> + '_ {
        self.orders
            .values()
            .filter_map(|record| self.with_member_delivery(record))
    }

    /// Fails on any id already present or any reference that would dangle
    /// once `dataset` is inserted.
    fn check_insert(&self, dataset: &Dataset) -> Result<()> {
        fn clash<V>(
            table: &BTreeMap<i64, V>,
            mut ids: impl Iterator<Item = i64>,
            entity_type: &'static str,
        ) -> Result<()> {
            match ids.find(|id| table.contains_key(id)) {
                Some(id) => Err(RepositoryError::AlreadyExists {
                    entity_type,
                    id: id.to_string(),
                }),
                None => Ok(()),
            }
        }

        clash(&self.members, dataset.members.iter().map(|m| m.id), "Member")?;
        clash(&self.items, dataset.items.iter().map(|i| i.id), "Item")?;
        clash(
            &self.deliveries,
            dataset.deliveries.iter().map(|d| d.id),
            "Delivery",
        )?;
        clash(&self.orders, dataset.orders.iter().map(|o| o.id), "Order")?;
        clash(
            &self.order_items,
            dataset.order_items.iter().map(|l| l.id),
            "OrderItem",
        )?;

        let dangling = |entity_type: &str| {
            RepositoryError::InvalidData(format!(
                "Foreign key constraint violation for {entity_type}"
            ))
        };
        for o in &dataset.orders {
            let member_ok = self.members.contains_key(&o.member_id)
                || dataset.members.iter().any(|m| m.id == o.member_id);
            let delivery_ok = self.deliveries.contains_key(&o.delivery_id)
                || dataset.deliveries.iter().any(|d| d.id == o.delivery_id);
            if !member_ok || !delivery_ok {
                return Err(dangling("Order"));
            }
        }
        for l in &dataset.order_items {
            let order_ok = self.orders.contains_key(&l.order_id)
                || dataset.orders.iter().any(|o| o.id == l.order_id);
            let item_ok = self.items.contains_key(&l.item_id)
                || dataset.items.iter().any(|i| i.id == l.item_id);
            if !order_ok || !item_ok {
                return Err(dangling("OrderItem"));
            }
        }

        Ok(())
    }
}

/// In-memory storage backend.
///
/// All tables share one lock so a dataset insert is all or nothing.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryRepository {
    /// Creates a new empty in-memory repository.
    pub fn new() -> Self {
        Self::default()
    }
}

// ============================================================================
// OrderRepository implementation
// ============================================================================

#[async_trait]
impl OrderRepository for InMemoryRepository {
    async fn find_orders(&self, search: &OrderSearch) -> Result<Vec<OrderRecord>> {
        let tables = self.tables.read().await;
        Ok(tables
            .orders
            .values()
            .filter(|o| {
                tables
                    .members
                    .get(&o.member_id)
                    .is_some_and(|m| search.matches(&m.name, o.status))
            })
            .take(MAX_SEARCH_RESULTS)
            .cloned()
            .collect())
    }

    async fn find_member(&self, id: i64) -> Result<Option<Member>> {
        Ok(self.tables.read().await.members.get(&id).cloned())
    }

    async fn find_delivery(&self, id: i64) -> Result<Option<Delivery>> {
        Ok(self.tables.read().await.deliveries.get(&id).cloned())
    }

    async fn find_order_items(&self, order_id: i64) -> Result<Vec<OrderItemRecord>> {
        let tables = self.tables.read().await;
        Ok(tables
            .order_items
            .values()
            .filter(|l| l.order_id == order_id)
            .cloned()
            .collect())
    }

    async fn find_item(&self, id: i64) -> Result<Option<Item>> {
        Ok(self.tables.read().await.items.get(&id).cloned())
    }

    async fn find_orders_with_member_delivery(&self, page: Page) -> Result<Vec<Order>> {
        let tables = self.tables.read().await;
        Ok(page.apply(tables.joined_orders()))
    }

    async fn find_order_items_with_item(&self, order_ids: &[i64]) -> Result<Vec<(i64, OrderItem)>> {
        let tables = self.tables.read().await;
        let mut ids = order_ids.to_vec();
        ids.sort_unstable();
        ids.dedup();

        Ok(ids
            .into_iter()
            .flat_map(|id| tables.lines_of(id).into_iter().map(move |line| (id, line)))
            .collect())
    }

    async fn find_orders_with_items(&self) -> Result<Vec<Order>> {
        let tables = self.tables.read().await;
        Ok(tables
            .joined_orders()
            .filter_map(|mut order| {
                order.order_items = tables.lines_of(order.id);
                (!order.order_items.is_empty()).then_some(order)
            })
            .collect())
    }
}

// ============================================================================
// OrderQueryRepository implementation
// ============================================================================

#[async_trait]
impl OrderQueryRepository for InMemoryRepository {
    async fn find_simple_order_dtos(&self) -> Result<Vec<SimpleOrderDto>> {
        let tables = self.tables.read().await;
        Ok(tables
            .joined_orders()
            .map(|order| SimpleOrderDto::from(&order))
            .collect())
    }

    async fn find_order_query_dtos(&self) -> Result<Vec<OrderQueryDto>> {
        Ok(self
            .find_simple_order_dtos()
            .await?
            .into_iter()
            .map(|s| OrderQueryDto {
                order_id: s.order_id,
                name: s.name,
                order_date: s.order_date,
                order_status: s.order_status,
                address: s.address,
                order_items: Vec::new(),
            })
            .collect())
    }

    async fn find_order_item_query_dtos(&self, order_id: i64) -> Result<Vec<OrderItemQueryDto>> {
        self.find_order_item_query_dtos_in(&[order_id]).await
    }

    async fn find_order_item_query_dtos_in(
        &self,
        order_ids: &[i64],
    ) -> Result<Vec<OrderItemQueryDto>> {
        Ok(self
            .find_order_items_with_item(order_ids)
            .await?
            .into_iter()
            .map(|(order_id, line)| OrderItemQueryDto {
                order_id,
                item_name: line.item().name.clone(),
                order_price: line.order_price(),
                count: line.count(),
            })
            .collect())
    }

    async fn find_order_flat_dtos(&self) -> Result<Vec<OrderFlatDto>> {
        Ok(self
            .find_orders_with_items()
            .await?
            .into_iter()
            .flat_map(|order| {
                let simple = SimpleOrderDto::from(&order);
                order
                    .order_items
                    .into_iter()
                    .map(move |line| OrderFlatDto {
                        order_id: simple.order_id,
                        name: simple.name.clone(),
                        order_date: simple.order_date,
                        order_status: simple.order_status,
                        address: simple.address.clone(),
                        item_name: line.item().name.clone(),
                        order_price: line.order_price(),
                        count: line.count(),
                    })
            })
            .collect())
    }
}

// ============================================================================
// DatasetRepository implementation
// ============================================================================

#[async_trait]
impl DatasetRepository for InMemoryRepository {
    async fn is_empty(&self) -> Result<bool> {
        let tables = self.tables.read().await;
        Ok(tables.orders.is_empty() && tables.members.is_empty() && tables.items.is_empty())
    }

    async fn insert_dataset(&self, dataset: &Dataset) -> Result<()> {
        let mut tables = self.tables.write().await;
        tables.check_insert(dataset)?;

        for m in &dataset.members {
            tables.members.insert(m.id, m.clone());
        }
        for i in &dataset.items {
            tables.items.insert(i.id, i.clone());
        }
        for d in &dataset.deliveries {
            tables.deliveries.insert(d.id, d.clone());
        }
        for o in &dataset.orders {
            tables.orders.insert(o.id, o.clone());
        }
        for l in &dataset.order_items {
            tables.order_items.insert(l.id, l.clone());
        }

        Ok(())
    }
}
