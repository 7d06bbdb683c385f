use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::OrderError;

/// Postal address, embedded in members and deliveries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Address {
    pub city: String,
    pub street: String,
    pub zipcode: String,
}

impl Address {
    pub fn new(
        city: impl Into<String>,
        street: impl Into<String>,
        zipcode: impl Into<String>,
    ) -> Self {
        Self {
            city: city.into(),
            street: street.into(),
            zipcode: zipcode.into(),
        }
    }
}

/// A customer placing orders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: i64,
    pub name: String,
    pub address: Address,
}

impl Member {
    pub fn new(id: i64, name: impl Into<String>, address: Address) -> Self {
        Self {
            id,
            name: name.into(),
            address,
        }
    }
}

/// Lifecycle of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Ordered,
    Canceled,
}

impl OrderStatus {
    /// Returns the stored representation of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Ordered => "ORDERED",
            OrderStatus::Canceled => "CANCELED",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = OrderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "ORDERED" => Ok(OrderStatus::Ordered),
            "CANCELED" => Ok(OrderStatus::Canceled),
            _ => Err(OrderError::UnknownOrderStatus(s.to_string())),
        }
    }
}

/// Shipping state of a delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeliveryStatus {
    Ready,
    /// Delivery completed.
    Comp,
}

impl DeliveryStatus {
    /// Returns the stored representation of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryStatus::Ready => "READY",
            DeliveryStatus::Comp => "COMP",
        }
    }
}

impl fmt::Display for DeliveryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeliveryStatus {
    type Err = OrderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "READY" => Ok(DeliveryStatus::Ready),
            "COMP" => Ok(DeliveryStatus::Comp),
            _ => Err(OrderError::UnknownDeliveryStatus(s.to_string())),
        }
    }
}

/// Where and how an order ships. Each order owns exactly one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delivery {
    pub id: i64,
    pub address: Address,
    pub status: DeliveryStatus,
}

impl Delivery {
    pub fn new(id: i64, address: Address) -> Self {
        Self {
            id,
            address,
            status: DeliveryStatus::Ready,
        }
    }
}

/// A sellable item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: i64,
    pub name: String,
    pub price: i64,
    pub stock_quantity: i64,
}

impl Item {
    pub fn new(id: i64, name: impl Into<String>, price: i64, stock_quantity: i64) -> Self {
        Self {
            id,
            name: name.into(),
            price,
            stock_quantity,
        }
    }

    /// Takes `quantity` units out of stock.
    pub fn remove_stock(&mut self, quantity: i64) -> Result<(), OrderError> {
        let rest = self.stock_quantity - quantity;
        if rest < 0 {
            return Err(OrderError::NotEnoughStock {
                item_id: self.id,
                requested: quantity,
                available: self.stock_quantity,
            });
        }
        self.stock_quantity = rest;
        Ok(())
    }
}

/// One line of an order. Price and count are fixed at creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    id: i64,
    item: Item,
    order_price: i64,
    count: i64,
}

impl OrderItem {
    pub fn new(id: i64, item: Item, order_price: i64, count: i64) -> Self {
        Self {
            id,
            item,
            order_price,
            count,
        }
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn item(&self) -> &Item {
        &self.item
    }

    pub fn order_price(&self) -> i64 {
        self.order_price
    }

    pub fn count(&self) -> i64 {
        self.count
    }

    /// Price of the whole line.
    pub fn total_price(&self) -> i64 {
        self.order_price * self.count
    }
}

/// A fully materialized order aggregate.
///
/// Every association is resolved by the time an `Order` exists; there is no
/// deferred loading behind any field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,
    pub member: Member,
    pub delivery: Delivery,
    pub order_items: Vec<OrderItem>,
    pub status: OrderStatus,
    pub order_date: NaiveDateTime,
}

impl Order {
    /// Sum of all line totals.
    pub fn total_price(&self) -> i64 {
        self.order_items.iter().map(OrderItem::total_price).sum()
    }
}

/// Root row of the `orders` table, with association keys unresolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderRecord {
    pub id: i64,
    pub member_id: i64,
    pub delivery_id: i64,
    pub status: OrderStatus,
    pub order_date: NaiveDateTime,
}

/// Row of the `order_items` table, with the item key unresolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderItemRecord {
    pub id: i64,
    pub order_id: i64,
    pub item_id: i64,
    pub order_price: i64,
    pub count: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn order_date() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_order_status_round_trips_through_str() {
        for status in [OrderStatus::Ordered, OrderStatus::Canceled] {
            assert_eq!(status.as_str().parse::<OrderStatus>().unwrap(), status);
        }
        assert_eq!("ordered".parse::<OrderStatus>().unwrap(), OrderStatus::Ordered);
    }

    #[test]
    fn test_order_status_rejects_unknown() {
        let err = "SHIPPED".parse::<OrderStatus>().unwrap_err();
        assert_eq!(err, OrderError::UnknownOrderStatus("SHIPPED".to_string()));
    }

    #[test]
    fn test_delivery_status_parse() {
        assert_eq!("COMP".parse::<DeliveryStatus>().unwrap(), DeliveryStatus::Comp);
        assert!("LOST".parse::<DeliveryStatus>().is_err());
    }

    #[test]
    fn test_status_serializes_upper_case() {
        assert_eq!(
            serde_json::to_string(&OrderStatus::Canceled).unwrap(),
            r#""CANCELED""#
        );
        assert_eq!(
            serde_json::to_string(&DeliveryStatus::Ready).unwrap(),
            r#""READY""#
        );
    }

    #[test]
    fn test_remove_stock() {
        let mut item = Item::new(1, "JPA1 BOOK", 10000, 3);

        item.remove_stock(2).unwrap();
        assert_eq!(item.stock_quantity, 1);

        let err = item.remove_stock(2).unwrap_err();
        assert_eq!(
            err,
            OrderError::NotEnoughStock {
                item_id: 1,
                requested: 2,
                available: 1,
            }
        );
        assert_eq!(item.stock_quantity, 1);
    }

    #[test]
    fn test_order_total_price() {
        let address = Address::new("Seoul", "1", "1111");
        let order = Order {
            id: 1,
            member: Member::new(1, "userA", address.clone()),
            delivery: Delivery::new(1, address),
            order_items: vec![
                OrderItem::new(1, Item::new(1, "A", 100, 10), 100, 2),
                OrderItem::new(2, Item::new(2, "B", 200, 10), 200, 1),
            ],
            status: OrderStatus::Ordered,
            order_date: order_date(),
        };

        assert_eq!(order.order_items[0].total_price(), 200);
        assert_eq!(order.total_price(), 400);
    }
}
