//! Order listings that only need the to-one associations.
//!
//! Each version loads the same orders with a different strategy so the
//! `x-query-count` header can be compared across them.

use axum::{extract::State, response::IntoResponse, Json};

use jpashop_core::order::{orders_to_detail, orders_to_simple, OrderSearch};
use jpashop_core::query::{
    load_orders_per_row, load_orders_with_member_delivery, load_simple_order_dtos, FetchStrategy,
};
use jpashop_core::storage::Page;

use super::query_count_header;
use crate::{handlers::AppError, state::AppState};

/// GET /api/v1/simple-orders - full aggregates without lines, walked row by row.
pub async fn simple_orders_v1(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let session = state.session();
    let orders = load_orders_per_row(&session, &OrderSearch::default(), false).await?;
    let body = orders_to_detail(&orders, false);

    let headers = query_count_header(
        "v1/simple-orders",
        FetchStrategy::PerRowTraversal,
        &session,
        body.len(),
    );
    Ok((headers, Json(body)))
}

/// GET /api/v2/simple-orders - DTOs, walked row by row.
pub async fn simple_orders_v2(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let session = state.session();
    let orders = load_orders_per_row(&session, &OrderSearch::default(), false).await?;
    let body = orders_to_simple(&orders);

    let headers = query_count_header(
        "v2/simple-orders",
        FetchStrategy::PerRowTraversal,
        &session,
        body.len(),
    );
    Ok((headers, Json(body)))
}

/// GET /api/v3/simple-orders - DTOs, member and delivery joined in one query.
pub async fn simple_orders_v3(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let session = state.session();
    let orders = load_orders_with_member_delivery(&session, Page::all()).await?;
    let body = orders_to_simple(&orders);

    let headers = query_count_header(
        "v3/simple-orders",
        FetchStrategy::ToOneJoinBatched,
        &session,
        body.len(),
    );
    Ok((headers, Json(body)))
}

/// GET /api/v4/simple-orders - DTOs selected directly by the query.
pub async fn simple_orders_v4(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let session = state.session();
    let body = load_simple_order_dtos(&session).await?;

    let headers = query_count_header(
        "v4/simple-orders",
        FetchStrategy::Projection,
        &session,
        body.len(),
    );
    Ok((headers, Json(body)))
}

