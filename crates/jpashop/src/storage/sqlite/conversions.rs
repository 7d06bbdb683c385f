//! SQLite row conversion functions.
//!
//! Pure functions for converting between SQLite rows and domain types.
//! Column order for each function matches the query constants in `schema`.

use std::str::FromStr;

use chrono::NaiveDateTime;
use rusqlite::Row;

use jpashop_core::order::{
    Address, Delivery, DeliveryStatus, Item, Member, Order, OrderFlatDto, OrderItem,
    OrderItemQueryDto, OrderItemRecord, OrderQueryDto, OrderRecord, OrderStatus, SimpleOrderDto,
};

const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

// ============================================================================
// Entity rows
// ============================================================================

/// Expected columns: id, name, city, street, zipcode
pub fn row_to_member(row: &Row) -> rusqlite::Result<Member> {
    Ok(Member {
        id: row.get(0)?,
        name: row.get(1)?,
        address: address_at(row, 2)?,
    })
}

/// Expected columns: id, city, street, zipcode, status
pub fn row_to_delivery(row: &Row) -> rusqlite::Result<Delivery> {
    delivery_at(row, 0)
}

/// Expected columns: id, name, price, stock_quantity
pub fn row_to_item(row: &Row) -> rusqlite::Result<Item> {
    item_at(row, 0)
}

/// Expected columns: id, member_id, delivery_id, status, order_date
pub fn row_to_order_record(row: &Row) -> rusqlite::Result<OrderRecord> {
    let status: String = row.get(3)?;
    let order_date: String = row.get(4)?;

    Ok(OrderRecord {
        id: row.get(0)?,
        member_id: row.get(1)?,
        delivery_id: row.get(2)?,
        status: parse_order_status(&status)?,
        order_date: parse_datetime(&order_date)?,
    })
}

/// Expected columns: id, order_id, item_id, order_price, count
pub fn row_to_order_item_record(row: &Row) -> rusqlite::Result<OrderItemRecord> {
    Ok(OrderItemRecord {
        id: row.get(0)?,
        order_id: row.get(1)?,
        item_id: row.get(2)?,
        order_price: row.get(3)?,
        count: row.get(4)?,
    })
}

// ============================================================================
// Joined rows
// ============================================================================

/// Convert a to-one join row into an order with no lines.
///
/// Expected columns: order id, status, order_date, then member (5 columns)
/// and delivery (5 columns).
pub fn row_to_order_with_member_delivery(row: &Row) -> rusqlite::Result<Order> {
    let status: String = row.get(1)?;
    let order_date: String = row.get(2)?;

    Ok(Order {
        id: row.get(0)?,
        member: Member {
            id: row.get(3)?,
            name: row.get(4)?,
            address: address_at(row, 5)?,
        },
        delivery: delivery_at(row, 8)?,
        order_items: Vec::new(),
        status: parse_order_status(&status)?,
        order_date: parse_datetime(&order_date)?,
    })
}

/// Expected columns: order_id, order_item id, order_price, count, then item (4 columns).
pub fn row_to_order_item_with_item(row: &Row) -> rusqlite::Result<(i64, OrderItem)> {
    let order_id: i64 = row.get(0)?;
    let line = OrderItem::new(row.get(1)?, item_at(row, 4)?, row.get(2)?, row.get(3)?);
    Ok((order_id, line))
}

/// Convert a collection join row into its order (lines empty) and the one line it carries.
pub fn row_to_order_and_line(row: &Row) -> rusqlite::Result<(Order, OrderItem)> {
    let order = row_to_order_with_member_delivery(row)?;
    let line = OrderItem::new(row.get(13)?, item_at(row, 16)?, row.get(14)?, row.get(15)?);
    Ok((order, line))
}

// ============================================================================
// Projection rows
// ============================================================================

/// Expected columns: order id, member name, order_date, status, city, street, zipcode
pub fn row_to_simple_order_dto(row: &Row) -> rusqlite::Result<SimpleOrderDto> {
    let order_date: String = row.get(2)?;
    let status: String = row.get(3)?;

    Ok(SimpleOrderDto {
        order_id: row.get(0)?,
        name: row.get(1)?,
        order_date: parse_datetime(&order_date)?,
        order_status: parse_order_status(&status)?,
        address: address_at(row, 4)?,
    })
}

pub fn row_to_order_query_dto(row: &Row) -> rusqlite::Result<OrderQueryDto> {
    let simple = row_to_simple_order_dto(row)?;

    Ok(OrderQueryDto {
        order_id: simple.order_id,
        name: simple.name,
        order_date: simple.order_date,
        order_status: simple.order_status,
        address: simple.address,
        order_items: Vec::new(),
    })
}

/// Expected columns: order_id, item name, order_price, count
pub fn row_to_order_item_query_dto(row: &Row) -> rusqlite::Result<OrderItemQueryDto> {
    Ok(OrderItemQueryDto {
        order_id: row.get(0)?,
        item_name: row.get(1)?,
        order_price: row.get(2)?,
        count: row.get(3)?,
    })
}

/// Expected columns: the seven simple order columns, then item name, order_price, count
pub fn row_to_order_flat_dto(row: &Row) -> rusqlite::Result<OrderFlatDto> {
    let simple = row_to_simple_order_dto(row)?;

    Ok(OrderFlatDto {
        order_id: simple.order_id,
        name: simple.name,
        order_date: simple.order_date,
        order_status: simple.order_status,
        address: simple.address,
        item_name: row.get(7)?,
        order_price: row.get(8)?,
        count: row.get(9)?,
    })
}

// ============================================================================
// Helper functions
// ============================================================================

fn address_at(row: &Row, start: usize) -> rusqlite::Result<Address> {
    Ok(Address {
        city: row.get(start)?,
        street: row.get(start + 1)?,
        zipcode: row.get(start + 2)?,
    })
}

fn delivery_at(row: &Row, start: usize) -> rusqlite::Result<Delivery> {
    let status: String = row.get(start + 4)?;

    Ok(Delivery {
        id: row.get(start)?,
        address: address_at(row, start + 1)?,
        status: parse_delivery_status(&status)?,
    })
}

fn item_at(row: &Row, start: usize) -> rusqlite::Result<Item> {
    Ok(Item {
        id: row.get(start)?,
        name: row.get(start + 1)?,
        price: row.get(start + 2)?,
        stock_quantity: row.get(start + 3)?,
    })
}

fn conversion_failure(e: impl std::error::Error + Send + Sync + 'static) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
}

fn parse_order_status(s: &str) -> rusqlite::Result<OrderStatus> {
    OrderStatus::from_str(s).map_err(conversion_failure)
}

fn parse_delivery_status(s: &str) -> rusqlite::Result<DeliveryStatus> {
    DeliveryStatus::from_str(s).map_err(conversion_failure)
}

fn parse_datetime(s: &str) -> rusqlite::Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, DATETIME_FORMAT).map_err(conversion_failure)
}

/// Format an order date for SQLite storage.
pub fn format_datetime(dt: &NaiveDateTime) -> String {
    dt.format(DATETIME_FORMAT).to_string()
}
