//! Verification API module

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/verifications", verification_routes())
}

fn verification_routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list_mine).post(handler::submit))
        .route("/pending", get(handler::list_pending))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/review", post(handler::review))
}
