//! Folding joined rows back into nested records.
//!
//! A to-many join repeats the parent columns on every child row. These
//! functions collapse such rows into one record per root id, independent of
//! whichever query produced them.

use std::collections::HashMap;
use std::hash::Hash;

use super::dto::{OrderFlatDto, OrderItemQueryDto, OrderQueryDto};

/// Groups rows by root key.
///
/// `split` turns a row into its root part and its child part. The root part
/// of the first row seen for a key becomes the output root; later root parts
/// for the same key are dropped. Output roots keep first-appearance order
/// and children keep row order. Nothing is sorted.
pub fn group_by_root<T, K, R, C>(
    rows: impl IntoIterator<Item = T>,
    key: impl Fn(&T) -> K,
    split: impl Fn(T) -> (R, C),
) -> Vec<(R, Vec<C>)>
where
    K: Eq + Hash,
{
    let mut positions: HashMap<K, usize> = HashMap::new();
    let mut grouped: Vec<(R, Vec<C>)> = Vec::new();

    for row in rows {
        let row_key = key(&row);
        let (root, child) = split(row);

        match positions.get(&row_key) {
            Some(&index) => grouped[index].1.push(child),
            None => {
                positions.insert(row_key, grouped.len());
                grouped.push((root, vec![child]));
            }
        }
    }

    grouped
}

/// Collapses flat order rows into one `OrderQueryDto` per order.
pub fn group_flat_orders(rows: Vec<OrderFlatDto>) -> Vec<OrderQueryDto> {
    group_by_root(
        rows,
        |row| row.order_id,
        |row| {
            let item = OrderItemQueryDto {
                order_id: row.order_id,
                item_name: row.item_name,
                order_price: row.order_price,
                count: row.count,
            };
            let order = OrderQueryDto {
                order_id: row.order_id,
                name: row.name,
                order_date: row.order_date,
                order_status: row.order_status,
                address: row.address,
                order_items: Vec::new(),
            };
            (order, item)
        },
    )
    .into_iter()
    .map(|(mut order, items)| {
        order.order_items = items;
        order
    })
    .collect()
}

/// Indexes item rows by their order id, keeping row order within each order.
pub fn items_by_order_id(
    items: Vec<OrderItemQueryDto>,
) -> HashMap<i64, Vec<OrderItemQueryDto>> {
    let mut map: HashMap<i64, Vec<OrderItemQueryDto>> = HashMap::new();
    for item in items {
        map.entry(item.order_id).or_default().push(item);
    }
    map
}
