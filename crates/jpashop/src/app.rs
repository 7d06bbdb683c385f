use std::time::Duration;

use axum::{
    http::{header, Method, StatusCode},
    routing::get,
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::{
    handlers::{
        health::{healthz, livez},
        orders::{orders_v1, orders_v2, orders_v3, orders_v3_1, orders_v4, orders_v5, orders_v6},
        simple_orders::{simple_orders_v1, simple_orders_v2, simple_orders_v3, simple_orders_v4},
        QUERY_COUNT_HEADER,
    },
    state::AppState,
};

/// Create the application router with all routes and middleware.
pub fn create_app(state: AppState, request_timeout: Duration) -> Router {
    // Read-only API; the query count header is exposed so browsers can compare strategies
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET])
        .allow_headers([header::CONTENT_TYPE])
        .expose_headers([QUERY_COUNT_HEADER]);

    let api_routes = Router::new()
        // To-one associations only
        .route("/v1/simple-orders", get(simple_orders_v1))
        .route("/v2/simple-orders", get(simple_orders_v2))
        .route("/v3/simple-orders", get(simple_orders_v3))
        .route("/v4/simple-orders", get(simple_orders_v4))
        // With order lines
        .route("/v1/orders", get(orders_v1))
        .route("/v2/orders", get(orders_v2))
        .route("/v3/orders", get(orders_v3))
        .route("/v3.1/orders", get(orders_v3_1))
        .route("/v4/orders", get(orders_v4))
        .route("/v5/orders", get(orders_v5))
        .route("/v6/orders", get(orders_v6))
        .layer(cors);

    Router::new()
        .route("/livez", get(livez))
        .route("/healthz", get(healthz))
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ))
        .with_state(state)
}
