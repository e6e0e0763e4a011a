//! Order API module

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", order_routes())
}

fn order_routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list_purchases).post(handler::create))
        .route("/sales", get(handler::list_sales))
        .route("/{id}", get(handler::get_by_id))
        .route(
            "/{id}/payments",
            get(handler::list_payments).post(handler::initiate_payment),
        )
        .route("/{id}/complete", post(handler::complete))
        .route("/{id}/cancel", post(handler::cancel))
}
