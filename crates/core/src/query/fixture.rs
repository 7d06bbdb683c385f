//! Dataset-backed repositories for loader tests.

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};

use crate::order::{
    demo_dataset, Address, Dataset, DatasetBuilder, Delivery, Item, Member, Order, OrderFlatDto,
    OrderItem, OrderItemQueryDto, OrderItemRecord, OrderQueryDto, OrderRecord, OrderSearch,
    SimpleOrderDto, MAX_SEARCH_RESULTS,
};
use crate::storage::{OrderQueryRepository, OrderRepository, Page, RepositoryError, Result};

pub(crate) struct FixtureStore {
    dataset: Option<Dataset>,
}

fn order_date() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, 1)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
}

impl FixtureStore {
    pub(crate) fn demo() -> Self {
        Self {
            dataset: Some(demo_dataset(order_date()).unwrap()),
        }
    }

    pub(crate) fn empty() -> Self {
        Self {
            dataset: Some(Dataset::default()),
        }
    }

    /// Every call fails with `QueryFailed`.
    pub(crate) fn failing() -> Self {
        Self { dataset: None }
    }

    pub(crate) fn two_item_example() -> Self {
        let mut builder = DatasetBuilder::new();
        let member = builder.member("userA", Address::new("Seoul", "1", "1111"));
        let a = builder.item("A", 100, 10);
        let b = builder.item("B", 200, 10);
        builder.order(member, &[(a, 2), (b, 1)], order_date()).unwrap();
        Self {
            dataset: Some(builder.build()),
        }
    }

    pub(crate) fn one_member_three_orders() -> Self {
        let mut builder = DatasetBuilder::new();
        let member = builder.member("userA", Address::new("Seoul", "1", "1111"));
        let item = builder.item("A", 100, 10);
        for _ in 0..3 {
            builder.order(member, &[(item, 1)], order_date()).unwrap();
        }
        Self {
            dataset: Some(builder.build()),
        }
    }

    pub(crate) fn many_orders(n: usize) -> Self {
        let mut builder = DatasetBuilder::new();
        let a = builder.item("A", 100, 1000);
        let b = builder.item("B", 200, 1000);
        for i in 0..n {
            let member = builder.member(format!("user{i}"), Address::new("Seoul", "1", "1111"));
            builder.order(member, &[(a, 1), (b, 2)], order_date()).unwrap();
        }
        Self {
            dataset: Some(builder.build()),
        }
    }

    pub(crate) fn without_members(mut self) -> Self {
        if let Some(dataset) = self.dataset.as_mut() {
            dataset.members.clear();
        }
        self
    }

    fn dataset(&self) -> Result<&Dataset> {
        self.dataset
            .as_ref()
            .ok_or_else(|| RepositoryError::QueryFailed("fixture store is failing".to_string()))
    }

    fn orders(&self) -> Result<Vec<Order>> {
        Ok(self.dataset()?.materialize()?)
    }
}

#[async_trait]
impl OrderRepository for FixtureStore {
    async fn find_orders(&self, search: &OrderSearch) -> Result<Vec<OrderRecord>> {
        let dataset = self.dataset()?;
        Ok(dataset
            .orders
            .iter()
            .filter(|o| {
                // Orders whose member row is gone still come back, so the
                // association load is what fails.
                let name = dataset
                    .members
                    .iter()
                    .find(|m| m.id == o.member_id)
                    .map_or("", |m| m.name.as_str());
                search.matches(name, o.status)
            })
            .take(MAX_SEARCH_RESULTS)
            .cloned()
            .collect())
    }

    async fn find_member(&self, id: i64) -> Result<Option<Member>> {
        Ok(self.dataset()?.members.iter().find(|m| m.id == id).cloned())
    }

    async fn find_delivery(&self, id: i64) -> Result<Option<Delivery>> {
        Ok(self.dataset()?.deliveries.iter().find(|d| d.id == id).cloned())
    }

    async fn find_order_items(&self, order_id: i64) -> Result<Vec<OrderItemRecord>> {
        Ok(self
            .dataset()?
            .order_items
            .iter()
            .filter(|l| l.order_id == order_id)
            .cloned()
            .collect())
    }

    async fn find_item(&self, id: i64) -> Result<Option<Item>> {
        Ok(self.dataset()?.items.iter().find(|i| i.id == id).cloned())
    }

    async fn find_orders_with_member_delivery(&self, page: Page) -> Result<Vec<Order>> {
        let orders = self.orders()?.into_iter().map(|mut o| {
            o.order_items.clear();
            o
        });
        Ok(page.apply(orders))
    }

    async fn find_order_items_with_item(&self, order_ids: &[i64]) -> Result<Vec<(i64, OrderItem)>> {
        Ok(self
            .orders()?
            .into_iter()
            .filter(|o| order_ids.contains(&o.id))
            .flat_map(|o| {
                let id = o.id;
                o.order_items.into_iter().map(move |line| (id, line))
            })
            .collect())
    }

    async fn find_orders_with_items(&self) -> Result<Vec<Order>> {
        Ok(self
            .orders()?
            .into_iter()
            .filter(|o| !o.order_items.is_empty())
            .collect())
    }
}

#[async_trait]
impl OrderQueryRepository for FixtureStore {
    async fn find_simple_order_dtos(&self) -> Result<Vec<SimpleOrderDto>> {
        Ok(self.orders()?.iter().map(SimpleOrderDto::from).collect())
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
            .orders()?
            .into_iter()
            .flat_map(|o| {
                let lines = o.order_items.clone();
                lines.into_iter().map(move |line| OrderFlatDto {
                    order_id: o.id,
                    name: o.member.name.clone(),
                    order_date: o.order_date,
                    order_status: o.status,
                    address: o.delivery.address.clone(),
                    item_name: line.item().name.clone(),
                    order_price: line.order_price(),
                    count: line.count(),
                })
            })
            .collect())
    }
}
