//! SQLite schema definitions and SQL query constants.
//!
//! All SQL used by the SQLite repository lives here as plain data.

/// SQL statement to create all tables.
pub const CREATE_TABLES: &str = r#"
CREATE TABLE IF NOT EXISTS members (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    city TEXT NOT NULL,
    street TEXT NOT NULL,
    zipcode TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS items (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    price INTEGER NOT NULL,
    stock_quantity INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS deliveries (
    id INTEGER PRIMARY KEY,
    city TEXT NOT NULL,
    street TEXT NOT NULL,
    zipcode TEXT NOT NULL,
    status TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS orders (
    id INTEGER PRIMARY KEY,
    member_id INTEGER NOT NULL,
    delivery_id INTEGER NOT NULL UNIQUE,
    status TEXT NOT NULL,
    order_date TEXT NOT NULL,
    FOREIGN KEY (member_id) REFERENCES members(id),
    FOREIGN KEY (delivery_id) REFERENCES deliveries(id)
);

CREATE TABLE IF NOT EXISTS order_items (
    id INTEGER PRIMARY KEY,
    order_id INTEGER NOT NULL,
    item_id INTEGER NOT NULL,
    order_price INTEGER NOT NULL,
    count INTEGER NOT NULL,
    FOREIGN KEY (order_id) REFERENCES orders(id) ON DELETE CASCADE,
    FOREIGN KEY (item_id) REFERENCES items(id)
);

CREATE INDEX IF NOT EXISTS idx_orders_member_id ON orders(member_id);
CREATE INDEX IF NOT EXISTS idx_order_items_order_id ON order_items(order_id);
"#;

pub const PRAGMA_FOREIGN_KEYS: &str = "PRAGMA foreign_keys = ON;";

// Inserts
pub const INSERT_MEMBER: &str = r#"
INSERT INTO members (id, name, city, street, zipcode)
VALUES (?1, ?2, ?3, ?4, ?5)
"#;

pub const INSERT_ITEM: &str = r#"
INSERT INTO items (id, name, price, stock_quantity)
VALUES (?1, ?2, ?3, ?4)
"#;

pub const INSERT_DELIVERY: &str = r#"
INSERT INTO deliveries (id, city, street, zipcode, status)
VALUES (?1, ?2, ?3, ?4, ?5)
"#;

pub const INSERT_ORDER: &str = r#"
INSERT INTO orders (id, member_id, delivery_id, status, order_date)
VALUES (?1, ?2, ?3, ?4, ?5)
"#;

pub const INSERT_ORDER_ITEM: &str = r#"
INSERT INTO order_items (id, order_id, item_id, order_price, count)
VALUES (?1, ?2, ?3, ?4, ?5)
"#;

pub const COUNT_ROWS: &str = r#"
SELECT (SELECT COUNT(*) FROM orders)
     + (SELECT COUNT(*) FROM members)
     + (SELECT COUNT(*) FROM items)
"#;

// Root and per-row association lookups
pub const SELECT_ORDERS_BY_SEARCH: &str = r#"
SELECT o.id, o.member_id, o.delivery_id, o.status, o.order_date
FROM orders o
INNER JOIN members m ON m.id = o.member_id
WHERE (?1 IS NULL OR o.status = ?1)
  AND (?2 IS NULL OR instr(m.name, ?2) > 0)
ORDER BY o.id ASC
LIMIT ?3
"#;

pub const SELECT_MEMBER_BY_ID: &str = r#"
SELECT id, name, city, street, zipcode
FROM members
WHERE id = ?1
"#;

pub const SELECT_DELIVERY_BY_ID: &str = r#"
SELECT id, city, street, zipcode, status
FROM deliveries
WHERE id = ?1
"#;

pub const SELECT_ORDER_ITEMS_BY_ORDER: &str = r#"
SELECT id, order_id, item_id, order_price, count
FROM order_items
WHERE order_id = ?1
ORDER BY id ASC
"#;

pub const SELECT_ITEM_BY_ID: &str = r#"
SELECT id, name, price, stock_quantity
FROM items
WHERE id = ?1
"#;

// To-one joins
pub const SELECT_ORDERS_WITH_MEMBER_DELIVERY: &str = r#"
SELECT o.id, o.status, o.order_date,
       m.id, m.name, m.city, m.street, m.zipcode,
       d.id, d.city, d.street, d.zipcode, d.status
FROM orders o
INNER JOIN members m ON m.id = o.member_id
INNER JOIN deliveries d ON d.id = o.delivery_id
ORDER BY o.id ASC
LIMIT ?1 OFFSET ?2
"#;

/// Prefix of the batched order-line query; the `IN` list is appended at
/// runtime with [`in_clause`].
pub const SELECT_ORDER_ITEMS_WITH_ITEM_IN: &str = r#"
SELECT oi.order_id, oi.id, oi.order_price, oi.count,
       i.id, i.name, i.price, i.stock_quantity
FROM order_items oi
INNER JOIN items i ON i.id = oi.item_id
WHERE oi.order_id IN
"#;

pub const ORDER_ITEMS_ORDER_BY: &str = " ORDER BY oi.order_id ASC, oi.id ASC";

// Collection join
pub const SELECT_ORDERS_WITH_ITEMS: &str = r#"
SELECT o.id, o.status, o.order_date,
       m.id, m.name, m.city, m.street, m.zipcode,
       d.id, d.city, d.street, d.zipcode, d.status,
       oi.id, oi.order_price, oi.count,
       i.id, i.name, i.price, i.stock_quantity
FROM orders o
INNER JOIN members m ON m.id = o.member_id
INNER JOIN deliveries d ON d.id = o.delivery_id
INNER JOIN order_items oi ON oi.order_id = o.id
INNER JOIN items i ON i.id = oi.item_id
ORDER BY o.id ASC, oi.id ASC
"#;

// Projections
pub const SELECT_SIMPLE_ORDER_DTOS: &str = r#"
SELECT o.id, m.name, o.order_date, o.status, d.city, d.street, d.zipcode
FROM orders o
INNER JOIN members m ON m.id = o.member_id
INNER JOIN deliveries d ON d.id = o.delivery_id
ORDER BY o.id ASC
"#;

pub const SELECT_ORDER_ITEM_QUERY_DTOS: &str = r#"
SELECT oi.order_id, i.name, oi.order_price, oi.count
FROM order_items oi
INNER JOIN items i ON i.id = oi.item_id
WHERE oi.order_id = ?1
ORDER BY oi.id ASC
"#;

/// Prefix of the projected order-line query; see [`in_clause`].
pub const SELECT_ORDER_ITEM_QUERY_DTOS_IN: &str = r#"
SELECT oi.order_id, i.name, oi.order_price, oi.count
FROM order_items oi
INNER JOIN items i ON i.id = oi.item_id
WHERE oi.order_id IN
"#;

pub const SELECT_ORDER_FLAT_DTOS: &str = r#"
SELECT o.id, m.name, o.order_date, o.status, d.city, d.street, d.zipcode,
       i.name, oi.order_price, oi.count
FROM orders o
INNER JOIN members m ON m.id = o.member_id
INNER JOIN deliveries d ON d.id = o.delivery_id
INNER JOIN order_items oi ON oi.order_id = o.id
INNER JOIN items i ON i.id = oi.item_id
ORDER BY o.id ASC, oi.id ASC
"#;

/// Builds `(?1, ?2, ..., ?n)` for an `IN` list of `n` parameters.
pub fn in_clause(n: usize) -> String {
    let placeholders: Vec<String> = (1..=n).map(|i| format!("?{i}")).collect();
    format!(" ({})", placeholders.join(", "))
}

/// Full SQL for a prefix ending in `IN`, `n` parameters, and a trailing clause.
pub fn with_in_list(prefix: &str, n: usize, suffix: &str) -> String {
    format!("{}{}{}", prefix.trim_end(), in_clause(n), suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_tables_is_valid_sql() {
        assert!(CREATE_TABLES.contains("CREATE TABLE IF NOT EXISTS members"));
        assert!(CREATE_TABLES.contains("CREATE TABLE IF NOT EXISTS items"));
        assert!(CREATE_TABLES.contains("CREATE TABLE IF NOT EXISTS deliveries"));
        assert!(CREATE_TABLES.contains("CREATE TABLE IF NOT EXISTS orders"));
        assert!(CREATE_TABLES.contains("CREATE TABLE IF NOT EXISTS order_items"));
    }

    #[test]
    fn test_in_clause() {
        assert_eq!(in_clause(1), " (?1)");
        assert_eq!(in_clause(3), " (?1, ?2, ?3)");
    }

    #[test]
    fn test_with_in_list() {
        let sql = with_in_list(SELECT_ORDER_ITEMS_WITH_ITEM_IN, 2, ORDER_ITEMS_ORDER_BY);
        assert!(sql.ends_with("WHERE oi.order_id IN (?1, ?2) ORDER BY oi.order_id ASC, oi.id ASC"));
    }

    #[test]
    fn test_collection_queries_join_every_table() {
        for sql in [SELECT_ORDERS_WITH_ITEMS, SELECT_ORDER_FLAT_DTOS] {
            assert!(sql.contains("JOIN members"));
            assert!(sql.contains("JOIN deliveries"));
            assert!(sql.contains("JOIN order_items"));
            assert!(sql.contains("JOIN items"));
        }
    }

    #[test]
    fn test_paginable_root_query_has_limit_and_offset() {
        assert!(SELECT_ORDERS_WITH_MEMBER_DELIVERY.contains("LIMIT ?1 OFFSET ?2"));
        assert!(!SELECT_ORDER_FLAT_DTOS.contains("LIMIT"));
    }
}
