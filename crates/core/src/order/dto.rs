//! Response records.
//!
//! These are the only shapes that leave the server. Entities stay internal;
//! every endpoint picks one of these and fills it from loaded data.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::types::{Address, DeliveryStatus, OrderStatus};

/// An order with its member name and delivery address, no items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimpleOrderDto {
    pub order_id: i64,
    pub name: String,
    pub order_date: NaiveDateTime,
    pub order_status: OrderStatus,
    pub address: Address,
}

/// An order line as shown to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemDto {
    pub item_name: String,
    pub order_price: i64,
    pub count: i64,
}

/// An order with its lines, built from loaded entities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDto {
    pub order_id: i64,
    pub name: String,
    pub order_date: NaiveDateTime,
    pub order_status: OrderStatus,
    pub address: Address,
    pub order_items: Vec<OrderItemDto>,
}

/// An order line selected directly by a projection query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemQueryDto {
    /// Grouping key only.
    #[serde(skip)]
    pub order_id: i64,
    pub item_name: String,
    pub order_price: i64,
    pub count: i64,
}

/// An order selected directly by a projection query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderQueryDto {
    pub order_id: i64,
    pub name: String,
    pub order_date: NaiveDateTime,
    pub order_status: OrderStatus,
    pub address: Address,
    #[serde(default)]
    pub order_items: Vec<OrderItemQueryDto>,
}

/// One row of the orders ⨝ members ⨝ deliveries ⨝ order_items ⨝ items join.
///
/// Order columns repeat once per item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderFlatDto {
    pub order_id: i64,
    pub name: String,
    pub order_date: NaiveDateTime,
    pub order_status: OrderStatus,
    pub address: Address,
    pub item_name: String,
    pub order_price: i64,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberDetailDto {
    pub member_id: i64,
    pub name: String,
    pub address: Address,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryDetailDto {
    pub delivery_id: i64,
    pub address: Address,
    pub status: DeliveryStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemDetailDto {
    pub item_id: i64,
    pub name: String,
    pub price: i64,
    pub stock_quantity: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemDetailDto {
    pub order_item_id: i64,
    pub item: ItemDetailDto,
    pub order_price: i64,
    pub count: i64,
    pub total_price: i64,
}

/// The whole aggregate, every column of every association.
///
/// Returned by the v1 endpoints, which exist to show how much of the
/// internal shape leaks when the full graph goes out. `order_items` is
/// omitted when the endpoint never loaded the collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetailDto {
    pub order_id: i64,
    pub member: MemberDetailDto,
    pub delivery: DeliveryDetailDto,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_items: Option<Vec<OrderItemDetailDto>>,
    pub status: OrderStatus,
    pub order_date: NaiveDateTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_price: Option<i64>,
}
