//! One loader per fetch strategy.
//!
//! Loaders return fully materialized data: once a loader returns, nothing
//! reachable from its result needs the repository again. Shaping into
//! response records happens afterwards on plain values.

use std::collections::HashMap;

use crate::order::{
    group_flat_orders, items_by_order_id, Delivery, Item, Member, Order, OrderItem,
    OrderQueryDto, OrderSearch, SimpleOrderDto,
};
use crate::storage::{OrderQueryRepository, OrderRepository, Page, RepositoryError, Result};

use super::batch::{batches, MAX_IN_LIST_LEN};

/// Identity map for one traversal: each distinct association row is loaded
/// at most once.
#[derive(Debug, Default)]
struct LoadContext {
    members: HashMap<i64, Member>,
    deliveries: HashMap<i64, Delivery>,
    items: HashMap<i64, Item>,
}

impl LoadContext {
    async fn member<R>(&mut self, repo: &R, id: i64) -> Result<Member>
    where
        R: OrderRepository + ?Sized,
    {
        if let Some(member) = self.members.get(&id) {
            return Ok(member.clone());
        }
        let member = repo
            .find_member(id)
            .await?
            .ok_or_else(|| RepositoryError::missing("Member", id))?;
        self.members.insert(id, member.clone());
        Ok(member)
    }

    async fn delivery<R>(&mut self, repo: &R, id: i64) -> Result<Delivery>
    where
        R: OrderRepository + ?Sized,
    {
        if let Some(delivery) = self.deliveries.get(&id) {
            return Ok(delivery.clone());
        }
        let delivery = repo
            .find_delivery(id)
            .await?
            .ok_or_else(|| RepositoryError::missing("Delivery", id))?;
        self.deliveries.insert(id, delivery.clone());
        Ok(delivery)
    }

    async fn item<R>(&mut self, repo: &R, id: i64) -> Result<Item>
    where
        R: OrderRepository + ?Sized,
    {
        if let Some(item) = self.items.get(&id) {
            return Ok(item.clone());
        }
        let item = repo
            .find_item(id)
            .await?
            .ok_or_else(|| RepositoryError::missing("Item", id))?;
        self.items.insert(id, item.clone());
        Ok(item)
    }
}

/// Loads roots, then walks every association row by row.
///
/// Costs one root query plus one query per distinct member, delivery and
/// item, plus one order-line query per order when `with_items` is set.
pub async fn load_orders_per_row<R>(
    repo: &R,
    search: &OrderSearch,
    with_items: bool,
) -> Result<Vec<Order>>
where
    R: OrderRepository + ?Sized,
{
    let records = repo.find_orders(search).await?;
    let mut ctx = LoadContext::default();
    let mut orders = Vec::with_capacity(records.len());

    for record in records {
        let member = ctx.member(repo, record.member_id).await?;
        let delivery = ctx.delivery(repo, record.delivery_id).await?;

        let mut order_items = Vec::new();
        if with_items {
            for line in repo.find_order_items(record.id).await? {
                let item = ctx.item(repo, line.item_id).await?;
                order_items.push(OrderItem::new(line.id, item, line.order_price, line.count));
            }
        }

        orders.push(Order {
            id: record.id,
            member,
            delivery,
            order_items,
            status: record.status,
            order_date: record.order_date,
        });
    }

    Ok(orders)
}

/// Loads roots with member and delivery joined in. Collections stay empty.
pub async fn load_orders_with_member_delivery<R>(repo: &R, page: Page) -> Result<Vec<Order>>
where
    R: OrderRepository + ?Sized,
{
    repo.find_orders_with_member_delivery(page).await
}

/// Loads roots with to-one associations joined, then order lines in `IN`
/// batches of at most `batch_size` order ids.
///
/// Issues at most `1 + ceil(roots / batch_size)` queries, with `batch_size`
/// capped at [`MAX_IN_LIST_LEN`].
pub async fn load_orders_batched<R>(repo: &R, page: Page, batch_size: usize) -> Result<Vec<Order>>
where
    R: OrderRepository + ?Sized,
{
    let mut orders = repo.find_orders_with_member_delivery(page).await?;
    let ids: Vec<i64> = orders.iter().map(|o| o.id).collect();

    let mut lines: HashMap<i64, Vec<OrderItem>> = HashMap::new();
    for batch in batches(&ids, batch_size) {
        for (order_id, order_item) in repo.find_order_items_with_item(batch).await? {
            lines.entry(order_id).or_default().push(order_item);
        }
    }

    for order in &mut orders {
        order.order_items = lines.remove(&order.id).unwrap_or_default();
    }

    tracing::debug!(
        roots = orders.len(),
        batch_size,
        "Loaded order lines in batches"
    );

    Ok(orders)
}

/// Loads every order with all associations in a single joined query.
///
/// Not paginable: the join yields one row per order line.
pub async fn load_orders_collection_join<R>(repo: &R) -> Result<Vec<Order>>
where
    R: OrderRepository + ?Sized,
{
    repo.find_orders_with_items().await
}

pub async fn load_simple_order_dtos<Q>(repo: &Q) -> Result<Vec<SimpleOrderDto>>
where
    Q: OrderQueryRepository + ?Sized,
{
    repo.find_simple_order_dtos().await
}

/// Projects roots, then projects the lines of each order with its own query.
pub async fn load_order_query_dtos_per_order<Q>(repo: &Q) -> Result<Vec<OrderQueryDto>>
where
    Q: OrderQueryRepository + ?Sized,
{
    let mut orders = repo.find_order_query_dtos().await?;
    for order in &mut orders {
        order.order_items = repo.find_order_item_query_dtos(order.order_id).await?;
    }
    Ok(orders)
}

/// Projects roots, then the lines of all of them with one `IN` query per
/// chunk of at most [`MAX_IN_LIST_LEN`] order ids.
pub async fn load_order_query_dtos_in<Q>(repo: &Q) -> Result<Vec<OrderQueryDto>>
where
    Q: OrderQueryRepository + ?Sized,
{
    let mut orders = repo.find_order_query_dtos().await?;
    if orders.is_empty() {
        return Ok(orders);
    }

    let ids: Vec<i64> = orders.iter().map(|o| o.order_id).collect();
    let mut lines = Vec::new();
    for chunk in batches(&ids, MAX_IN_LIST_LEN) {
        lines.extend(repo.find_order_item_query_dtos_in(chunk).await?);
    }
    let mut by_order = items_by_order_id(lines);

    for order in &mut orders {
        order.order_items = by_order.remove(&order.order_id).unwrap_or_default();
    }
    Ok(orders)
}

/// Projects the full join as flat rows and folds them by order id.
///
/// One query, not paginable. Orders without lines do not appear.
pub async fn load_order_query_dtos_flat<Q>(repo: &Q) -> Result<Vec<OrderQueryDto>>
where
    Q: OrderQueryRepository + ?Sized,
{
    let rows = repo.find_order_flat_dtos().await?;
    Ok(group_flat_orders(rows))
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Arc;

    use super::*;
    use crate::order::{orders_to_dto, orders_to_simple};
    use crate::query::batch::max_batched_queries;
    use crate::query::fixture::FixtureStore;
    use crate::query::ReadSession;

    type OrderTuple = (i64, String, String, String);
    type ItemTuple = (String, i64, i64);

    fn session(store: FixtureStore) -> ReadSession {
        let store = Arc::new(store);
        ReadSession::new(store.clone(), store)
    }

    fn simple_tuples(dtos: &[SimpleOrderDto]) -> HashSet<OrderTuple> {
        dtos.iter()
            .map(|d| {
                (
                    d.order_id,
                    d.name.clone(),
                    d.address.city.clone(),
                    format!("{}@{}", d.order_status, d.order_date),
                )
            })
            .collect()
    }

    fn item_sets_from_orders(orders: &[Order]) -> HashMap<i64, HashSet<ItemTuple>> {
        orders
            .iter()
            .map(|o| {
                let items = o
                    .order_items
                    .iter()
                    .map(|i| (i.item().name.clone(), i.order_price(), i.count()))
                    .collect();
                (o.id, items)
            })
            .collect()
    }

    fn item_sets_from_queries(orders: &[OrderQueryDto]) -> HashMap<i64, HashSet<ItemTuple>> {
        orders
            .iter()
            .map(|o| {
                let items = o
                    .order_items
                    .iter()
                    .map(|i| (i.item_name.clone(), i.order_price, i.count))
                    .collect();
                (o.order_id, items)
            })
            .collect()
    }

    #[tokio::test]
    async fn test_per_row_costs_one_query_per_distinct_association() {
        let session = session(FixtureStore::demo());

        let orders = load_orders_per_row(&session, &OrderSearch::default(), true)
            .await
            .unwrap();

        assert_eq!(orders.len(), 2);
        // 1 root + 2 members + 2 deliveries + 2 line queries + 4 items
        assert_eq!(session.queries_issued(), 11);
    }

    #[tokio::test]
    async fn test_per_row_without_items_skips_collections() {
        let session = session(FixtureStore::demo());

        let orders = load_orders_per_row(&session, &OrderSearch::default(), false)
            .await
            .unwrap();

        assert!(orders.iter().all(|o| o.order_items.is_empty()));
        assert_eq!(session.queries_issued(), 5);
    }

    #[tokio::test]
    async fn test_per_row_loads_shared_member_once() {
        let session = session(FixtureStore::one_member_three_orders());

        let orders = load_orders_per_row(&session, &OrderSearch::default(), false)
            .await
            .unwrap();

        assert_eq!(orders.len(), 3);
        // 1 root + 1 member + 3 deliveries
        assert_eq!(session.queries_issued(), 5);
    }

    #[tokio::test]
    async fn test_per_row_missing_member_is_not_found() {
        let session = session(FixtureStore::demo().without_members());

        let err = load_orders_per_row(&session, &OrderSearch::default(), false)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            RepositoryError::NotFound {
                entity_type: "Member",
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_batched_respects_query_bound() {
        for batch_size in [1, 2, 3, 100] {
            let session = session(FixtureStore::many_orders(7));

            let orders = load_orders_batched(&session, Page::all(), batch_size)
                .await
                .unwrap();

            assert_eq!(orders.len(), 7);
            assert!(orders.iter().all(|o| o.order_items.len() == 2));
            assert!(session.queries_issued() <= max_batched_queries(7, batch_size));
        }
    }

    #[tokio::test]
    async fn test_batched_honours_page() {
        let session = session(FixtureStore::many_orders(7));

        let orders = load_orders_batched(&session, Page::new(2, 3).unwrap(), 100)
            .await
            .unwrap();

        let ids: Vec<i64> = orders.iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![3, 4, 5]);
        assert_eq!(session.queries_issued(), 2);
    }

    #[tokio::test]
    async fn test_batched_with_no_roots_issues_one_query() {
        let session = session(FixtureStore::empty());

        let orders = load_orders_batched(&session, Page::all(), 100).await.unwrap();

        assert!(orders.is_empty());
        assert_eq!(session.queries_issued(), 1);
    }

    #[tokio::test]
    async fn test_collection_join_is_one_query() {
        let session = session(FixtureStore::demo());

        let orders = load_orders_collection_join(&session).await.unwrap();

        assert_eq!(orders.len(), 2);
        assert_eq!(session.queries_issued(), 1);
    }

    #[tokio::test]
    async fn test_projection_query_counts() {
        let per_order = session(FixtureStore::demo());
        load_order_query_dtos_per_order(&per_order).await.unwrap();
        assert_eq!(per_order.queries_issued(), 3);

        let in_query = session(FixtureStore::demo());
        load_order_query_dtos_in(&in_query).await.unwrap();
        assert_eq!(in_query.queries_issued(), 2);

        let flat = session(FixtureStore::demo());
        load_order_query_dtos_flat(&flat).await.unwrap();
        assert_eq!(flat.queries_issued(), 1);
    }

    #[tokio::test]
    async fn test_all_strategies_agree_on_order_tuples() {
        let store = Arc::new(FixtureStore::demo());
        let search = OrderSearch::default();

        let per_row = orders_to_simple(&load_orders_per_row(store.as_ref(), &search, false).await.unwrap());
        let joined = orders_to_simple(
            &load_orders_with_member_delivery(store.as_ref(), Page::all())
                .await
                .unwrap(),
        );
        let collection = orders_to_simple(&load_orders_collection_join(store.as_ref()).await.unwrap());
        let projected = load_simple_order_dtos(store.as_ref()).await.unwrap();

        let expected = simple_tuples(&projected);
        assert_eq!(expected.len(), 2);
        assert_eq!(simple_tuples(&per_row), expected);
        assert_eq!(simple_tuples(&joined), expected);
        assert_eq!(simple_tuples(&collection), expected);
    }

    #[tokio::test]
    async fn test_all_strategies_agree_on_item_sets() {
        let store = Arc::new(FixtureStore::two_item_example());
        let search = OrderSearch::default();

        let reference = item_sets_from_orders(
            &load_orders_per_row(store.as_ref(), &search, true).await.unwrap(),
        );
        let expected: HashSet<ItemTuple> =
            HashSet::from([("A".to_string(), 100, 2), ("B".to_string(), 200, 1)]);
        assert_eq!(reference.values().next(), Some(&expected));

        let batched = load_orders_batched(store.as_ref(), Page::all(), 100).await.unwrap();
        assert_eq!(item_sets_from_orders(&batched), reference);

        let joined = load_orders_collection_join(store.as_ref()).await.unwrap();
        assert_eq!(item_sets_from_orders(&joined), reference);
        assert_eq!(orders_to_dto(&joined)[0].order_items.len(), 2);

        for projected in [
            load_order_query_dtos_per_order(store.as_ref()).await.unwrap(),
            load_order_query_dtos_in(store.as_ref()).await.unwrap(),
            load_order_query_dtos_flat(store.as_ref()).await.unwrap(),
        ] {
            assert_eq!(item_sets_from_queries(&projected), reference);
        }
    }

    #[tokio::test]
    async fn test_failures_surface_without_retry() {
        let session = session(FixtureStore::failing());

        let err = load_orders_batched(&session, Page::all(), 100).await.unwrap_err();

        assert!(matches!(err, RepositoryError::QueryFailed(_)));
        assert_eq!(session.queries_issued(), 1);
    }
}
