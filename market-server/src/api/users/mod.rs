//! User API module

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/users", user_routes())
}

fn user_routes() -> Router<ServerState> {
    Router::new()
        .route("/", post(handler::create))
        .route("/me", get(handler::me))
        .route("/{id}", get(handler::get_by_id))
}
