//! Normalized order data ready to be inserted into a store.
//!
//! [`DatasetBuilder`] assigns ids the way a table sequence would and keeps
//! stock consistent with the orders placed. [`demo_dataset`] builds the two
//! members / four books data the server starts with.

use std::collections::HashMap;

use chrono::NaiveDateTime;

use super::error::OrderError;
use super::types::{
    Address, Delivery, Item, Member, Order, OrderItem, OrderItemRecord, OrderRecord, OrderStatus,
};

/// Rows for every table, one `Vec` per table, in id order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dataset {
    pub members: Vec<Member>,
    pub items: Vec<Item>,
    pub deliveries: Vec<Delivery>,
    pub orders: Vec<OrderRecord>,
    pub order_items: Vec<OrderItemRecord>,
}

impl Dataset {
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty() && self.members.is_empty() && self.items.is_empty()
    }

    /// Joins the tables into order aggregates, in order id order.
    pub fn materialize(&self) -> Result<Vec<Order>, OrderError> {
        let members: HashMap<i64, &Member> = self.members.iter().map(|m| (m.id, m)).collect();
        let deliveries: HashMap<i64, &Delivery> =
            self.deliveries.iter().map(|d| (d.id, d)).collect();
        let items: HashMap<i64, &Item> = self.items.iter().map(|i| (i.id, i)).collect();

        let mut orders = Vec::with_capacity(self.orders.len());
        for record in &self.orders {
            let member = members
                .get(&record.member_id)
                .ok_or(OrderError::UnknownReference {
                    entity_type: "Member",
                    id: record.member_id,
                })?;
            let delivery = deliveries
                .get(&record.delivery_id)
                .ok_or(OrderError::UnknownReference {
                    entity_type: "Delivery",
                    id: record.delivery_id,
                })?;

            let mut order_items = Vec::new();
            for line in self.order_items.iter().filter(|l| l.order_id == record.id) {
                let item = items.get(&line.item_id).ok_or(OrderError::UnknownReference {
                    entity_type: "Item",
                    id: line.item_id,
                })?;
                order_items.push(OrderItem::new(
                    line.id,
                    (*item).clone(),
                    line.order_price,
                    line.count,
                ));
            }

            orders.push(Order {
                id: record.id,
                member: (*member).clone(),
                delivery: (*delivery).clone(),
                order_items,
                status: record.status,
                order_date: record.order_date,
            });
        }

        Ok(orders)
    }
}

/// Incrementally builds a consistent [`Dataset`].
#[derive(Debug, Default)]
pub struct DatasetBuilder {
    dataset: Dataset,
}

impl DatasetBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a member and returns its id.
    pub fn member(&mut self, name: impl Into<String>, address: Address) -> i64 {
        let id = self.dataset.members.len() as i64 + 1;
        self.dataset.members.push(Member::new(id, name, address));
        id
    }

    /// Adds an item and returns its id.
    pub fn item(&mut self, name: impl Into<String>, price: i64, stock_quantity: i64) -> i64 {
        let id = self.dataset.items.len() as i64 + 1;
        self.dataset
            .items
            .push(Item::new(id, name, price, stock_quantity));
        id
    }

    /// Places an order for `member_id`, shipped to the member's address.
    ///
    /// Each line is `(item_id, count)` and is priced at the item's current
    /// price. Stock is taken from the items; on error nothing is recorded.
    pub fn order(
        &mut self,
        member_id: i64,
        lines: &[(i64, i64)],
        order_date: NaiveDateTime,
    ) -> Result<i64, OrderError> {
        let address = self
            .dataset
            .members
            .iter()
            .find(|m| m.id == member_id)
            .map(|m| m.address.clone())
            .ok_or(OrderError::UnknownReference {
                entity_type: "Member",
                id: member_id,
            })?;

        let mut items = self.dataset.items.clone();
        let order_id = self.dataset.orders.len() as i64 + 1;
        let mut next_line_id = self.dataset.order_items.len() as i64 + 1;
        let mut order_items = Vec::with_capacity(lines.len());

        for &(item_id, count) in lines {
            if count <= 0 {
                return Err(OrderError::InvalidCount(count));
            }
            let item = items
                .iter_mut()
                .find(|i| i.id == item_id)
                .ok_or(OrderError::UnknownReference {
                    entity_type: "Item",
                    id: item_id,
                })?;
            item.remove_stock(count)?;

            order_items.push(OrderItemRecord {
                id: next_line_id,
                order_id,
                item_id,
                order_price: item.price,
                count,
            });
            next_line_id += 1;
        }

        let delivery_id = self.dataset.deliveries.len() as i64 + 1;
        self.dataset.deliveries.push(Delivery::new(delivery_id, address));
        self.dataset.items = items;
        self.dataset.order_items.extend(order_items);
        self.dataset.orders.push(OrderRecord {
            id: order_id,
            member_id,
            delivery_id,
            status: OrderStatus::Ordered,
            order_date,
        });

        Ok(order_id)
    }

    pub fn build(self) -> Dataset {
        self.dataset
    }
}

/// The demo data: `userA` buys two JPA books, `userB` two Spring books.
pub fn demo_dataset(order_date: NaiveDateTime) -> Result<Dataset, OrderError> {
    let mut builder = DatasetBuilder::new();

    let user_a = builder.member("userA", Address::new("Seoul", "1", "1111"));
    let jpa1 = builder.item("JPA1 BOOK", 10000, 100);
    let jpa2 = builder.item("JPA2 BOOK", 20000, 100);
    builder.order(user_a, &[(jpa1, 1), (jpa2, 2)], order_date)?;

    let user_b = builder.member("userB", Address::new("Jinju", "2", "2222"));
    let spring1 = builder.item("SPRING1 BOOK", 20000, 200);
    let spring2 = builder.item("SPRING2 BOOK", 40000, 300);
    builder.order(user_b, &[(spring1, 3), (spring2, 4)], order_date)?;

    Ok(builder.build())
}
