//! Order listings including order lines.
//!
//! v1 to v3.1 load entities and shape them; v4 to v6 select DTOs directly.

use axum::{extract::State, response::IntoResponse, Json};

use jpashop_core::order::{orders_to_detail, orders_to_dto, OrderSearch};
use jpashop_core::query::{
    load_order_query_dtos_flat, load_order_query_dtos_in, load_order_query_dtos_per_order,
    load_orders_batched, load_orders_collection_join, load_orders_per_row, FetchStrategy,
};

use jpashop_core::storage::Page;

use super::query_count_header;
use crate::{handlers::AppError, state::AppState};

/// GET /api/v1/orders - full aggregates, every association walked row by row.
pub async fn orders_v1(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let session = state.session();
    let orders = load_orders_per_row(&session, &OrderSearch::default(), true).await?;
    let body = orders_to_detail(&orders, true);

    let headers = query_count_header(
        "v1/orders",
        FetchStrategy::PerRowTraversal,
        &session,
        body.len(),
    );
    Ok((headers, Json(body)))
}

/// GET /api/v2/orders - DTOs, every association walked row by row.
pub async fn orders_v2(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let session = state.session();
    let orders = load_orders_per_row(&session, &OrderSearch::default(), true).await?;
    let body = orders_to_dto(&orders);

    let headers = query_count_header(
        "v2/orders",
        FetchStrategy::PerRowTraversal,
        &session,
        body.len(),
    );
    Ok((headers, Json(body)))
}

/// GET /api/v3/orders - DTOs from one query joining every table.
pub async fn orders_v3(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let session = state.session();
    let orders = load_orders_collection_join(&session).await?;
    let body = orders_to_dto(&orders);

    let headers = query_count_header(
        "v3/orders",
        FetchStrategy::CollectionJoin,
        &session,
        body.len(),
    );
    Ok((headers, Json(body)))
}

/// GET /api/v3.1/orders - DTOs, to-one join then lines in batches.
///
/// The loader accepts a page; the endpoint always asks for every order.
pub async fn orders_v3_1(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let session = state.session();
    let orders = load_orders_batched(&session, Page::all(), state.batch_fetch_size).await?;
    let body = orders_to_dto(&orders);

    let headers = query_count_header(
        "v3.1/orders",
        FetchStrategy::ToOneJoinBatched,
        &session,
        body.len(),
    );
    Ok((headers, Json(body)))
}

/// GET /api/v4/orders - projected roots, then one line query per order.
pub async fn orders_v4(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let session = state.session();
    let body = load_order_query_dtos_per_order(&session).await?;

    let headers = query_count_header("v4/orders", FetchStrategy::Projection, &session, body.len());
    Ok((headers, Json(body)))
}

/// GET /api/v5/orders - projected roots, then all lines with one `IN` query.
pub async fn orders_v5(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let session = state.session();
    let body = load_order_query_dtos_in(&session).await?;

    let headers = query_count_header("v5/orders", FetchStrategy::Projection, &session, body.len());
    Ok((headers, Json(body)))
}

/// GET /api/v6/orders - one flat projected join folded by order id. Not paginable.
pub async fn orders_v6(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let session = state.session();
    let body = load_order_query_dtos_flat(&session).await?;

    let headers = query_count_header("v6/orders", FetchStrategy::Projection, &session, body.len());
    Ok((headers, Json(body)))
}
