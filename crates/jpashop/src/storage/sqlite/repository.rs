//! SQLite repository implementation.
//!
//! Implements the order repository traits from `jpashop_core::storage`. Every
//! trait method runs exactly one SQL statement, so the count a
//! [`ReadSession`](jpashop_core::query::ReadSession) reports is the number of
//! round trips to the database. The exception is an `IN` list longer than
//! [`MAX_IN_LIST_LEN`], which runs one statement per chunk; the loaders never
//! pass one.

use async_trait::async_trait;
use rusqlite::params_from_iter;
use tokio_rusqlite::Connection;

use jpashop_core::order::{
    group_by_root, Dataset, Delivery, Item, Member, Order, OrderFlatDto, OrderItem,
    OrderItemQueryDto, OrderItemRecord, OrderQueryDto, OrderRecord, OrderSearch, SimpleOrderDto,
    MAX_SEARCH_RESULTS,
};
use jpashop_core::query::MAX_IN_LIST_LEN;
use jpashop_core::storage::{
    DatasetRepository, OrderQueryRepository, OrderRepository, Page, RepositoryError, Result,
};

use super::conversions::{
    format_datetime, row_to_delivery, row_to_item, row_to_member, row_to_order_and_line,
    row_to_order_flat_dto, row_to_order_item_query_dto, row_to_order_item_record,
    row_to_order_item_with_item, row_to_order_query_dto, row_to_order_record,
    row_to_order_with_member_delivery, row_to_simple_order_dto,
};
use super::error::map_tokio_rusqlite_error;
use super::schema;

/// Helper to wrap rusqlite errors for tokio_rusqlite closures.
fn wrap_err(e: rusqlite::Error) -> tokio_rusqlite::Error {
    tokio_rusqlite::Error::Rusqlite(e)
}

/// SQLite-based repository implementation.
pub struct SqliteRepository {
    conn: Connection,
}

impl SqliteRepository {
    /// Opens (or creates) a file-based database and ensures the schema exists.
    pub async fn new(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;

        Self::init_schema(&conn).await?;

        Ok(Self { conn })
    }

    /// Creates a new repository with an in-memory database.
    pub async fn new_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;

        Self::init_schema(&conn).await?;

        Ok(Self { conn })
    }

    async fn init_schema(conn: &Connection) -> Result<()> {
        conn.call(|conn| {
            conn.execute_batch(schema::PRAGMA_FOREIGN_KEYS)
                .map_err(wrap_err)?;
            conn.execute_batch(schema::CREATE_TABLES)
                .map_err(wrap_err)?;
            Ok(())
        })
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))
    }

    async fn find_by_id<T, F>(
        &self,
        sql: &'static str,
        id: i64,
        entity_type: &'static str,
        convert: F,
    ) -> Result<Option<T>>
    where
        T: Send + 'static,
        F: FnOnce(&rusqlite::Row) -> rusqlite::Result<T> + Send + 'static,
    {
        self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare(sql).map_err(wrap_err)?;
                match stmt.query_row([id], convert) {
                    Ok(row) => Ok(Some(row)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(wrap_err(e)),
                }
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, entity_type))
    }

    /// Runs `sql` with an `IN` list over `ids`, one statement per chunk of at
    /// most [`MAX_IN_LIST_LEN`] ids; returns nothing without a round trip when
    /// `ids` is empty.
    async fn query_in<T, F>(
        &self,
        prefix: &'static str,
        suffix: &'static str,
        ids: &[i64],
        entity_type: &'static str,
        convert: F,
    ) -> Result<Vec<T>>
    where
        T: Send + 'static,
        F: FnMut(&rusqlite::Row) -> rusqlite::Result<T> + Send + 'static,
    {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let ids = ids.to_vec();

        self.conn
            .call(move |conn| {
                let mut convert = convert;
                let mut out = Vec::new();
                for chunk in ids.chunks(MAX_IN_LIST_LEN) {
                    let sql = schema::with_in_list(prefix, chunk.len(), suffix);
                    let mut stmt = conn.prepare(&sql).map_err(wrap_err)?;
                    let rows = stmt
                        .query_map(params_from_iter(chunk.iter()), &mut convert)
                        .map_err(wrap_err)?;
                    for row in rows {
                        out.push(row.map_err(wrap_err)?);
                    }
                }
                Ok(out)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, entity_type))
    }

    async fn query_all<T, F>(
        &self,
        sql: &'static str,
        entity_type: &'static str,
        convert: F,
    ) -> Result<Vec<T>>
    where
        T: Send + 'static,
        F: FnMut(&rusqlite::Row) -> rusqlite::Result<T> + Send + 'static,
    {
        self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare(sql).map_err(wrap_err)?;
                let rows = stmt.query_map([], convert).map_err(wrap_err)?;
                rows.collect::<rusqlite::Result<Vec<_>>>().map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, entity_type))
    }
}

// ============================================================================
// OrderRepository implementation
// ============================================================================

#[async_trait]
impl OrderRepository for SqliteRepository {
    async fn find_orders(&self, search: &OrderSearch) -> Result<Vec<OrderRecord>> {
        let status = search.order_status.map(|s| s.as_str().to_string());
        let name = search.member_name_filter().map(str::to_string);
        let limit = MAX_SEARCH_RESULTS as i64;

        self.conn
            .call(move |conn| {
                let mut stmt = conn
                    .prepare(schema::SELECT_ORDERS_BY_SEARCH)
                    .map_err(wrap_err)?;
                let rows = stmt
                    .query_map(rusqlite::params![status, name, limit], row_to_order_record)
                    .map_err(wrap_err)?;
                rows.collect::<rusqlite::Result<Vec<_>>>().map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Order"))
    }

    async fn find_member(&self, id: i64) -> Result<Option<Member>> {
        self.find_by_id(schema::SELECT_MEMBER_BY_ID, id, "Member", row_to_member)
            .await
    }

    async fn find_delivery(&self, id: i64) -> Result<Option<Delivery>> {
        self.find_by_id(schema::SELECT_DELIVERY_BY_ID, id, "Delivery", row_to_delivery)
            .await
    }

    async fn find_order_items(&self, order_id: i64) -> Result<Vec<OrderItemRecord>> {
        self.conn
            .call(move |conn| {
                let mut stmt = conn
                    .prepare(schema::SELECT_ORDER_ITEMS_BY_ORDER)
                    .map_err(wrap_err)?;
                let rows = stmt
                    .query_map([order_id], row_to_order_item_record)
                    .map_err(wrap_err)?;
                rows.collect::<rusqlite::Result<Vec<_>>>().map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "OrderItem"))
    }

    async fn find_item(&self, id: i64) -> Result<Option<Item>> {
        self.find_by_id(schema::SELECT_ITEM_BY_ID, id, "Item", row_to_item)
            .await
    }

    async fn find_orders_with_member_delivery(&self, page: Page) -> Result<Vec<Order>> {
        let limit = page.sql_limit();
        let offset = page.sql_offset();

        self.conn
            .call(move |conn| {
                let mut stmt = conn
                    .prepare(schema::SELECT_ORDERS_WITH_MEMBER_DELIVERY)
                    .map_err(wrap_err)?;
                let rows = stmt
                    .query_map([limit, offset], row_to_order_with_member_delivery)
                    .map_err(wrap_err)?;
                rows.collect::<rusqlite::Result<Vec<_>>>().map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Order"))
    }

    async fn find_order_items_with_item(&self, order_ids: &[i64]) -> Result<Vec<(i64, OrderItem)>> {
        self.query_in(
            schema::SELECT_ORDER_ITEMS_WITH_ITEM_IN,
            schema::ORDER_ITEMS_ORDER_BY,
            order_ids,
            "OrderItem",
            row_to_order_item_with_item,
        )
        .await
    }

    async fn find_orders_with_items(&self) -> Result<Vec<Order>> {
        let rows = self
            .query_all(schema::SELECT_ORDERS_WITH_ITEMS, "Order", row_to_order_and_line)
            .await?;

        // One row per line; fold back to one aggregate per order.
        Ok(group_by_root(rows, |(order, _)| order.id, |row| row)
            .into_iter()
            .map(|(mut order, lines)| {
                order.order_items = lines;
                order
            })
            .collect())
    }
}

// ============================================================================
// OrderQueryRepository implementation
// ============================================================================

#[async_trait]
impl OrderQueryRepository for SqliteRepository {
    async fn find_simple_order_dtos(&self) -> Result<Vec<SimpleOrderDto>> {
        self.query_all(
            schema::SELECT_SIMPLE_ORDER_DTOS,
            "Order",
            row_to_simple_order_dto,
        )
        .await
    }

    async fn find_order_query_dtos(&self) -> Result<Vec<OrderQueryDto>> {
        self.query_all(
            schema::SELECT_SIMPLE_ORDER_DTOS,
            "Order",
            row_to_order_query_dto,
        )
        .await
    }

    async fn find_order_item_query_dtos(&self, order_id: i64) -> Result<Vec<OrderItemQueryDto>> {
        self.conn
            .call(move |conn| {
                let mut stmt = conn
                    .prepare(schema::SELECT_ORDER_ITEM_QUERY_DTOS)
                    .map_err(wrap_err)?;
                let rows = stmt
                    .query_map([order_id], row_to_order_item_query_dto)
                    .map_err(wrap_err)?;
                rows.collect::<rusqlite::Result<Vec<_>>>().map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "OrderItem"))
    }

    async fn find_order_item_query_dtos_in(
        &self,
        order_ids: &[i64],
    ) -> Result<Vec<OrderItemQueryDto>> {
        self.query_in(
            schema::SELECT_ORDER_ITEM_QUERY_DTOS_IN,
            schema::ORDER_ITEMS_ORDER_BY,
            order_ids,
            "OrderItem",
            row_to_order_item_query_dto,
        )
        .await
    }

    async fn find_order_flat_dtos(&self) -> Result<Vec<OrderFlatDto>> {
        self.query_all(schema::SELECT_ORDER_FLAT_DTOS, "Order", row_to_order_flat_dto)
            .await
    }
}

// ============================================================================
// DatasetRepository implementation
// ============================================================================

#[async_trait]
impl DatasetRepository for SqliteRepository {
    async fn is_empty(&self) -> Result<bool> {
        self.conn
            .call(|conn| {
                let count: i64 = conn
                    .query_row(schema::COUNT_ROWS, [], |row| row.get(0))
                    .map_err(wrap_err)?;
                Ok(count == 0)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Dataset"))
    }

    async fn insert_dataset(&self, dataset: &Dataset) -> Result<()> {
        let dataset = dataset.clone();

        self.conn
            .call(move |conn| {
                let tx = conn.transaction().map_err(wrap_err)?;

                for m in &dataset.members {
                    tx.execute(
                        schema::INSERT_MEMBER,
                        rusqlite::params![
                            m.id,
                            m.name,
                            m.address.city,
                            m.address.street,
                            m.address.zipcode
                        ],
                    )
                    .map_err(wrap_err)?;
                }
                for i in &dataset.items {
                    tx.execute(
                        schema::INSERT_ITEM,
                        rusqlite::params![i.id, i.name, i.price, i.stock_quantity],
                    )
                    .map_err(wrap_err)?;
                }
                for d in &dataset.deliveries {
                    tx.execute(
                        schema::INSERT_DELIVERY,
                        rusqlite::params![
                            d.id,
                            d.address.city,
                            d.address.street,
                            d.address.zipcode,
                            d.status.as_str()
                        ],
                    )
                    .map_err(wrap_err)?;
                }
                for o in &dataset.orders {
                    tx.execute(
                        schema::INSERT_ORDER,
                        rusqlite::params![
                            o.id,
                            o.member_id,
                            o.delivery_id,
                            o.status.as_str(),
                            format_datetime(&o.order_date)
                        ],
                    )
                    .map_err(wrap_err)?;
                }
                for l in &dataset.order_items {
                    tx.execute(
                        schema::INSERT_ORDER_ITEM,
                        rusqlite::params![l.id, l.order_id, l.item_id, l.order_price, l.count],
                    )
                    .map_err(wrap_err)?;
                }

                // Dropping the transaction without commit rolls everything back.
                tx.commit().map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Dataset"))
    }
}
