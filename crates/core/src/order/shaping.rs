//! Pure conversions from loaded entities to response records.

use super::dto::{
    DeliveryDetailDto, ItemDetailDto, MemberDetailDto, OrderDetailDto, OrderDto,
    OrderItemDetailDto, OrderItemDto, SimpleOrderDto,
};
use super::types::{Order, OrderItem};

impl From<&Order> for SimpleOrderDto {
    fn from(order: &Order) -> Self {
        Self {
            order_id: order.id,
            name: order.member.name.clone(),
            order_date: order.order_date,
            order_status: order.status,
            address: order.delivery.address.clone(),
        }
    }
}

impl From<&OrderItem> for OrderItemDto {
    fn from(order_item: &OrderItem) -> Self {
        Self {
            item_name: order_item.item().name.clone(),
            order_price: order_item.order_price(),
            count: order_item.count(),
        }
    }
}

impl From<&Order> for OrderDto {
    fn from(order: &Order) -> Self {
        Self {
            order_id: order.id,
            name: order.member.name.clone(),
            order_date: order.order_date,
            order_status: order.status,
            address: order.delivery.address.clone(),
            order_items: order.order_items.iter().map(OrderItemDto::from).collect(),
        }
    }
}

impl From<&OrderItem> for OrderItemDetailDto {
    fn from(order_item: &OrderItem) -> Self {
        let item = order_item.item();
        Self {
            order_item_id: order_item.id(),
            item: ItemDetailDto {
                item_id: item.id,
                name: item.name.clone(),
                price: item.price,
                stock_quantity: item.stock_quantity,
            },
            order_price: order_item.order_price(),
            count: order_item.count(),
            total_price: order_item.total_price(),
        }
    }
}

/// Builds the full-aggregate view of an order.
///
/// With `include_items` false the collection is left out entirely, matching
/// loads that never touched it.
pub fn order_to_detail(order: &Order, include_items: bool) -> OrderDetailDto {
    let order_items = include_items.then(|| {
        order
            .order_items
            .iter()
            .map(OrderItemDetailDto::from)
            .collect()
    });

    OrderDetailDto {
        order_id: order.id,
        member: MemberDetailDto {
            member_id: order.member.id,
            name: order.member.name.clone(),
            address: order.member.address.clone(),
        },
        delivery: DeliveryDetailDto {
            delivery_id: order.delivery.id,
            address: order.delivery.address.clone(),
            status: order.delivery.status,
        },
        total_price: include_items.then(|| order.total_price()),
        order_items,
        status: order.status,
        order_date: order.order_date,
    }
}

pub fn orders_to_simple(orders: &[Order]) -> Vec<SimpleOrderDto> {
    orders.iter().map(SimpleOrderDto::from).collect()
}

pub fn orders_to_dto(orders: &[Order]) -> Vec<OrderDto> {
    orders.iter().map(OrderDto::from).collect()
}

pub fn orders_to_detail(orders: &[Order], include_items: bool) -> Vec<OrderDetailDto> {
    orders
        .iter()
        .map(|order| order_to_detail(order, include_items))
        .collect()
}
